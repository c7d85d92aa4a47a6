//! CLI subcommands.

pub mod analyze;
pub mod batch;
pub mod compare;
pub mod config;
pub mod extract;
