//! CLI command implementations.

pub mod collect;
pub mod enrich;
