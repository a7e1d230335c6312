//! Inbound adapters (driving side): the CLI.

pub mod cli;
