//! CLI subcommand implementations.

pub mod clear_cache;
pub mod rank;
pub mod search;
