//! Tests for CLI argument parsing.

use clap::Parser;
use llmux_cli::{Cli, Command};

#[test]
fn cli_parse_chat() {
    let cli = Cli::parse_from(["llmux", "chat", "hello world"]);
    match cli.command {
        Command::Chat(args) => {
            assert_eq!(args.prompt, "hello world");
            assert!(args.system.is_empty());
            assert!(args.tool.is_none());
            assert!(!args.no_stream);
        }
        _ => panic!("expected Chat command"),
    }
}

#[test]
fn cli_parse_chat_options() {
    let cli = Cli::parse_from([
        "llmux",
        "chat",
        "--system",
        "be brief",
        "--tool",
        "colour-scheme",
        "--image",
        "shot.png",
        "--no-stream",
        "pick colours",
    ]);
    match cli.command {
        Command::Chat(args) => {
            assert_eq!(args.system, "be brief");
            assert_eq!(args.tool.as_deref(), Some("colour-scheme"));
            assert_eq!(
                args.image.as_deref(),
                Some(std::path::Path::new("shot.png"))
            );
            assert!(args.no_stream);
            assert_eq!(args.prompt, "pick colours");
        }
        _ => panic!("expected Chat command"),
    }
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from([
        "llmux",
        "providers",
        "--config",
        "my.toml",
        "--provider",
        "fast",
    ]);
    assert!(matches!(cli.command, Command::Providers));
    assert_eq!(cli.config.as_deref(), Some("my.toml"));
    assert_eq!(cli.provider.as_deref(), Some("fast"));
}

#[test]
fn cli_parse_requires_prompt() {
    assert!(Cli::try_parse_from(["llmux", "chat"]).is_err());
}
