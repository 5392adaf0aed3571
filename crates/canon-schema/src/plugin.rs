//! Schema plugins as pure transforms.
//!
//! A plugin is a function `SchemaBinding -> SchemaBinding`, composed
//! explicitly at registration time:
//!
//! ```
//! use canon_core::entities::Comment;
//! use canon_core::ids::PREFIX_COMMENT;
//! use canon_schema::{ExpireOptions, SchemaBinding, expire, to_json};
//!
//! let binding = SchemaBinding::of::<Comment>("comment", "comments", PREFIX_COMMENT)
//!     .unwrap()
//!     .apply(to_json)
//!     .apply(expire(ExpireOptions { expires: 60 }));
//! assert_eq!(binding.expire_after_secs(), Some(60));
//! ```

use crate::binding::SchemaBinding;

/// Options for the [`expire`] plugin.
#[derive(Debug, Clone, Copy)]
pub struct ExpireOptions {
    /// Seconds after the `expiration` timestamp at which a document becomes
    /// eligible for removal by the store's background sweep.
    pub expires: u64,
}

/// Normalize every outbound representation of the binding's documents:
/// internal store fields are stripped and the virtual `id` field is exposed.
/// Purely a presentation transform; stored data is unaffected.
#[must_use]
pub fn to_json(binding: SchemaBinding) -> SchemaBinding {
    binding.with_normalized_output()
}

/// Attach a time-to-live to the binding. Documents gain an `expiration`
/// date-time field (defaulted to insert time by the store) and are removed
/// by the background sweep once `expires` seconds have elapsed past it.
/// Removal is eventual, not exact-time.
pub fn expire(options: ExpireOptions) -> impl FnOnce(SchemaBinding) -> SchemaBinding {
    move |binding| binding.with_expiration(options.expires)
}
