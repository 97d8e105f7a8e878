//! CLI command implementations.

pub mod dump;
pub mod stat;
