//! # canon-core
//!
//! Core types for the Canon persistence layer.
//!
//! This crate provides the foundational types shared across all Canon crates:
//! - Entity structs for all domain objects (characters, episodes, comments, news, theories)
//! - The `Ref<T>` reference sum type (raw identifier vs. populated record)
//! - Entity-type enum
//! - ID prefix constants

pub mod entities;
pub mod enums;
pub mod ids;
pub mod refs;
