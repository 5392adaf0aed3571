//! # canon-schema
//!
//! JSON Schema registry, plugins, and output normalization for Canon.
//!
//! This crate provides:
//! - `SchemaRegistry`: central store of all record schemas and their
//!   collection bindings, with fail-fast duplicate detection
//! - `SchemaBinding`: immutable shape descriptor consumed by the store
//! - Schema plugins as pure transforms (`to_json`, `expire`), composed
//!   explicitly at registration time
//! - `serialize::normalize`: outbound JSON normalization (internal store
//!   fields stripped, virtual `id` exposed)
//!
//! ## Architecture
//!
//! Entity types are defined in `canon-core` with `#[derive(JsonSchema)]`.
//! This crate imports those types and provides the registry, validation, and
//! presentation layer. `canon-db` depends on it for insert-time validation
//! and collection layout.

mod binding;
mod error;
mod plugin;
mod registry;
pub mod serialize;

pub use binding::SchemaBinding;
pub use error::SchemaError;
pub use plugin::{ExpireOptions, expire, to_json};
pub use registry::SchemaRegistry;
