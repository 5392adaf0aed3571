//! Typed per-entity repositories, implemented as `impl CanonService`.
//!
//! Each repo builds field payloads for the generic document operations in
//! `service`, parses envelopes back into canon-core entities, and provides
//! the explicit population step for reference fields.

pub mod character;
pub mod comment;
pub mod episode;
pub mod news;
pub mod theory;
