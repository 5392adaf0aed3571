//! ID prefix constants.
//!
//! Every stored document gets a prefixed identifier, e.g. `cmt-a3f8b2c1`.
//! The random part is generated by the store (see `canon-db`).

pub const PREFIX_CHARACTER: &str = "chr";
pub const PREFIX_EPISODE: &str = "epi";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_NEWS: &str = "nws";
pub const PREFIX_THEORY: &str = "thr";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: [&str; 5] = [
    PREFIX_CHARACTER,
    PREFIX_EPISODE,
    PREFIX_COMMENT,
    PREFIX_NEWS,
    PREFIX_THEORY,
];
