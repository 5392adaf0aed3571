//! Entity structs for all Canon domain objects.
//!
//! Each entity maps to a collection in the document store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation. Wire names are camelCase to preserve the existing stored
//! contract (`externalId`, `createdAt`, `updatedAt`).

mod character;
mod comment;
mod episode;
mod news;
mod theory;

pub use character::{Character, Replica};
pub use comment::Comment;
pub use episode::Episode;
pub use news::News;
pub use theory::Theory;
