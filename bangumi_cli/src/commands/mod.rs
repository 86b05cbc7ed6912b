//! CLI subcommand implementations.

pub mod archive;
pub mod monthly_best;
pub mod ranking;
pub mod scan;
