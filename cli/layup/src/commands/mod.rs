//! Subcommand implementations.

pub mod audit;
pub mod playbook;
pub mod resolve;
