//! Subcommand handlers.

pub mod cleanup;
pub mod config_cmd;
pub mod run;
