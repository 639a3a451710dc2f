//! ollamachat - terminal chat entry point
//!
//! A thin consumer of the streaming pipeline: reads prompts from the
//! terminal and renders the reply token-by-token as fragments arrive.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use ollamachat::config::Config;
use ollamachat::streaming::OllamaClient;
use ollamachat::ChatService;

#[derive(Parser, Debug)]
#[command(name = "ollamachat", about = "Chat with a local Ollama model, streamed")]
struct Args {
    /// Ollama server URL (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Model to chat with (overrides config)
    #[arg(long, short)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;
    let url = args.url.unwrap_or(config.url);
    let model = args.model.unwrap_or(config.model);

    let client = OllamaClient::with_config(&url, &model)?;
    let service = ChatService::with_client(client);

    println!("{}", "ollamachat".bold());
    println!("Model: {}  Server: {}", model.cyan(), url.cyan());

    if !service.client().health_check().await {
        println!(
            "{}",
            "Warning: Ollama doesn't appear to be running. Start it with: ollama serve".yellow()
        );
    }
    println!("Type a message, or press Ctrl-D to exit.\n");

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(&"You › ".green().bold().to_string()) {
            Ok(line) => {
                let message = line.trim();
                if message.is_empty() {
                    // Blank input never reaches the pipeline
                    continue;
                }
                editor.add_history_entry(message)?;
                chat_turn(&service, message).await;
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Bye!".dimmed());
    Ok(())
}

/// One request/response exchange. Transport failures are rendered as a
/// replacement assistant message instead of ending the session.
async fn chat_turn(service: &ChatService, message: &str) {
    let spinner = typing_indicator();
    let mut streaming_started = false;

    let result = service
        .send_message_with(message, |update| {
            if !streaming_started && !update.delta.is_empty() {
                spinner.finish_and_clear();
                print!("{} ", "AI ›".blue().bold());
                streaming_started = true;
            }
            print!("{}", update.delta);
            let _ = std::io::stdout().flush();
        })
        .await;

    spinner.finish_and_clear();

    match result {
        Ok(_) => {
            if !streaming_started {
                println!("{} {}", "AI ›".blue().bold(), "(no response)".dimmed());
            } else {
                println!();
            }
        }
        Err(e) => {
            println!("{} {}", "AI ›".blue().bold(), e.user_message().red());
        }
    }
    println!();
}

fn typing_indicator() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap()
            .tick_strings(&["·  ", "·· ", "···", " ··", "  ·", "   "]),
    );
    spinner.set_message("thinking");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
