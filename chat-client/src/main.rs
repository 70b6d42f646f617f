//! `huntermatch-chat`: interactive terminal chat against a running HunterMatch API.

use std::process::ExitCode;
use std::sync::Arc;

use ai_llm_service::telemetry;
use chat_client::{ChatSession, ChatTransport, DEFAULT_CHAT_URL, HttpTransport, repl};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{Level, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "huntermatch-chat", version, about = "Chat with HunterMatch from the terminal")]
struct Cli {
    /// Chat endpoint URL
    #[arg(long, env = "HUNTERMATCH_URL", default_value = DEFAULT_CHAT_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(telemetry::layer())
        .with(telemetry::env_filter("warn", Level::WARN))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let transport = match HttpTransport::new(cli.url, cli.timeout) {
        Ok(t) => Arc::new(t) as Arc<dyn ChatTransport>,
        Err(e) => {
            error!(error = %e, "cannot create HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let mut session = ChatSession::new();
    let stdin = BufReader::new(tokio::io::stdin());
    match repl::run(&mut session, transport, stdin, &mut std::io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "chat loop failed");
            ExitCode::FAILURE
        }
    }
}
