use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Comment;
use crate::refs::Ref;

/// A fan theory. Comments are stored as references into the `comments`
/// collection, unlike `News` which embeds them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Theory {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<Ref<Comment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Character, Replica};
    use crate::refs::Ref;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_names_are_camel_case() {
        let now = Utc::now();
        let character = Character {
            id: "chr-1".into(),
            external_id: 42,
            episodes: vec![Ref::unresolved("epi-1")],
            replicas: vec![Replica {
                content: "line".into(),
                character: Some(Ref::unresolved("chr-1")),
                episode: None,
                created_at: now,
                updated_at: now,
            }],
            comments: vec![],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["externalId"], 42);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["episodes"][0], "epi-1");
        assert_eq!(json["replicas"][0]["character"], "chr-1");
    }

    #[test]
    fn comment_parent_serializes_as_null_when_absent() {
        let now = Utc::now();
        let comment = Comment {
            id: "cmt-1".into(),
            content: "first".into(),
            author: "usr-1".into(),
            parent: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["parent"], serde_json::Value::Null);
    }

    #[test]
    fn missing_arrays_default_to_empty() {
        let json = serde_json::json!({
            "id": "thr-1",
            "title": "t",
            "content": "c",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        });
        let theory: Theory = serde_json::from_value(json).unwrap();
        assert!(theory.comments.is_empty());
    }

    #[test]
    fn generated_schema_requires_content_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(Theory)).unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"title"));
        assert!(required.contains(&"content"));
    }
}
