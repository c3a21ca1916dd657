use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use globalbot_agents::{ChatInput, TravelAssistant};
use globalbot_catalog::{source_for, CatalogStore};
use globalbot_core::GREETING;
use globalbot_observability::{init_tracing, AppMetrics};

const TYPING_DELAY: Duration = Duration::from_millis(220);

#[derive(Debug, Parser)]
#[command(name = "globalbot")]
#[command(about = "Globalbot travel assistant CLI")]
struct Cli {
    /// JSON array of destination records; the bundled seed is used when unset.
    #[arg(long, env = "GLOBALBOT_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Chat,
    Ask {
        query: String,
        #[arg(long)]
        json: bool,
    },
    Prompts,
    Destinations {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        top: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("globalbot_cli");
    let cli = Cli::parse();

    let assistant = build_assistant(cli.catalog.as_ref())?;

    match cli.command {
        Command::Chat => run_chat(assistant).await?,
        Command::Ask { query, json } => {
            let resolution = assistant.answer(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("{}", resolution.text);
            }
        }
        Command::Prompts => {
            for prompt in assistant.quick_prompts() {
                println!("{prompt}");
            }
        }
        Command::Destinations { region, top } => {
            let snapshot = assistant.catalog().snapshot();
            let listed = if top {
                snapshot.ranked(region.as_deref())
            } else {
                snapshot.filtered(region.as_deref())
            };
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
    }

    Ok(())
}

async fn run_chat(assistant: TravelAssistant) -> Result<()> {
    let mut session_id: Option<String> = None;

    println!("{GREETING}");
    println!("Try one of:");
    for prompt in assistant.quick_prompts() {
        println!("  - {prompt}");
    }
    println!("type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        let Some(reply) = assistant.handle_chat(ChatInput {
            session_id: session_id.clone(),
            text: message.to_string(),
        }) else {
            continue;
        };
        session_id = Some(reply.session_id.clone());

        print!("Typing . . .");
        io::stdout().flush()?;
        tokio::time::sleep(TYPING_DELAY).await;
        print!("\r            \r");

        for line in &reply.lines {
            println!("{line}");
        }
        println!();
    }

    Ok(())
}

fn build_assistant(catalog: Option<&PathBuf>) -> Result<TravelAssistant> {
    let source = source_for(catalog.map(PathBuf::as_path));
    let store = CatalogStore::from_source(source.as_ref())
        .with_context(|| format!("failed loading catalog from {}", source.describe()))?;

    Ok(TravelAssistant::new(Arc::new(store), AppMetrics::shared()))
}
