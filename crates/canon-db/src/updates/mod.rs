//! Update builder types for partial entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields are serialized into the patch merged over the stored document;
//! everything else is left untouched.

pub mod character;
pub mod comment;
pub mod episode;
pub mod news;
pub mod theory;
