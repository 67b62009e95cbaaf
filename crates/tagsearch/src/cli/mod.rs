//! Subcommand implementations.

pub mod build;
pub mod config;
pub mod index;
pub mod serve;
