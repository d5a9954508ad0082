//! `llmux chat`: one request, streamed to stdout.

use crate::{ChatArgs, config::CliConfig};
use anyhow::{Context, Result, bail};
use llm::{
    CancellationToken, Client, Conversation, Image, Message, Observer, ToolManager, ToolSet,
};
use provider::ServiceResolver;
use std::{
    io::{self, Write},
    path::Path,
    sync::Arc,
};

/// Prints streamed text as it arrives.
///
/// Forced tool calls stream raw argument deltas, those are left to the
/// rendered block printed after the reply.
pub struct Printer<W> {
    out: W,
    echo: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, tool_forced: bool) -> Self {
        Self {
            out,
            echo: !tool_forced,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for Printer<W> {
    fn on_streaming_text_received(&mut self, text: &str) {
        if self.echo {
            let _ = self.out.write_all(text.as_bytes());
            let _ = self.out.flush();
        }
    }

    fn on_streaming_complete(&mut self) {
        if self.echo {
            let _ = writeln!(self.out);
        }
    }
}

pub async fn run(config: &CliConfig, provider: Option<&str>, args: ChatArgs) -> Result<()> {
    let entry = config.provider(provider)?;
    let selection = entry.selection();
    let tools = Arc::new(ToolSet::new(config.tools.clone()));
    let resolver = ServiceResolver::new(Client::new(), tools.clone());
    let service = resolver
        .resolve(&selection.backend)
        .with_context(|| format!("unknown backend {}", selection.backend))?;

    let mut message = Message::user(args.prompt);
    if let Some(path) = &args.image {
        message = message.with_image(load_image(path)?);
    }
    let conversation = Conversation::new(args.system).with_message(message);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let tool_ids: Vec<String> = args.tool.iter().cloned().collect();
    let streaming = !args.no_stream;
    let mut printer = Printer::new(io::stdout(), args.tool.is_some());
    let response = match service
        .fetch_response(
            &selection,
            &conversation,
            &tool_ids,
            streaming,
            &cancel,
            &mut printer,
        )
        .await
    {
        Ok(response) => response,
        Err(cancelled) => {
            eprintln!();
            tracing::info!(
                "cancelled after {} bytes of output",
                cancelled.partial.text().len()
            );
            return Ok(());
        }
    };

    if !response.is_success() {
        bail!("{}", response.text());
    }

    match args.tool.as_deref().and_then(|id| tools.tool(id)) {
        Some(tool) => print!("{}", tool.render_output(response.text())),
        None if !streaming => println!("{}", response.text()),
        None => {}
    }
    if let Some(next) = response.suggested_next_prompt() {
        println!("next: {next}");
    }

    let usage = response.usage();
    tracing::info!("tokens: {} in, {} out", usage.input, usage.output);
    Ok(())
}

fn load_image(path: &Path) -> Result<Image> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(Image::new(mime_type(path), data))
}

/// Mime type from the file extension.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
