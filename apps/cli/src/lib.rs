//! llmux CLI: send one conversation turn to any configured backend and
//! stream the reply to the terminal.

pub use cmd::{ChatArgs, Cli, Command};

pub mod cmd;
pub mod config;
