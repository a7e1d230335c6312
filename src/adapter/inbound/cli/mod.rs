//! Command-line interface: command definitions, output helpers, and the
//! command dispatcher.

pub mod command;
pub mod output;
pub mod run;

pub use command::{Cli, Commands};
pub use run::execute;
