//! CLI argument parsing and subcommand dispatch.

use crate::config::CliConfig;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use compact_str::CompactString;
use std::path::PathBuf;

pub mod chat;

/// Talk to any configured LLM backend.
#[derive(Parser, Debug)]
#[command(name = "llmux", about = "Talk to any configured LLM backend")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to llmux.toml.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Provider entry to use, by name.
    #[arg(long, global = true)]
    pub provider: Option<CompactString>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one message and print the reply.
    Chat(ChatArgs),
    /// List configured providers.
    Providers,
}

/// Arguments of `llmux chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message content.
    pub prompt: String,

    /// System prompt.
    #[arg(long, default_value = "")]
    pub system: String,

    /// Force a call to this tool (name or internal name).
    #[arg(long)]
    pub tool: Option<String>,

    /// Attach an image file.
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Wait for the whole reply instead of streaming it.
    #[arg(long)]
    pub no_stream: bool,
}

impl Cli {
    /// Run the selected subcommand.
    pub async fn run(self) -> Result<()> {
        let config = CliConfig::resolve(self.config.as_deref())?;
        match self.command {
            Command::Chat(args) => chat::run(&config, self.provider.as_deref(), args).await,
            Command::Providers => {
                for entry in &config.providers {
                    let endpoint = entry
                        .base_url
                        .as_deref()
                        .unwrap_or(entry.backend.default_endpoint());
                    println!(
                        "{}\t{}\t{}\t{endpoint}",
                        entry.name, entry.backend, entry.model
                    );
                }
                Ok(())
            }
        }
    }
}
