//! CLI entry point for the cafeqa chat service.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cafeqa_core::Settings;
use cafeqa_graph::GraphStore;
use cafeqa_llm::LanguageModel;
use cafeqa_server::{http, Services};

const DEFAULT_CHECK_PROMPT: &str = "Contesta en 10 palabras: ¿qué es un pour-over?";

#[derive(Parser)]
#[command(name = "cafeqa")]
#[command(about = "Natural-language questions answered from a Neo4j coffee graph")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file prefix (default: cafeqa).
    #[arg(short, long, default_value = "cafeqa", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP chat service (default).
    Serve {
        /// Listen address; overrides `bind_addr`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Answer one question and print the result.
    Ask {
        /// The question, in natural language.
        question: String,
    },
    /// Print the live schema summary and description.
    Schema,
    /// Send one prompt to the model to check connectivity.
    LlmCheck {
        #[arg(long, default_value = DEFAULT_CHECK_PROMPT)]
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve { bind: None });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if matches!(command, Command::Serve { .. }) {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let settings = Settings::load(&cli.config)?;
    let services = Services::from_settings(settings)?;

    match command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| services.settings.bind_addr.clone());
            http::serve(services.app_state(), &addr).await?;
        }
        Command::Ask { question } => {
            let outcome = services.qa.ask(&question).await;
            println!("{}", outcome.answer_text());
            if !outcome.is_answered() {
                std::process::exit(1);
            }
        }
        Command::Schema => {
            let summary = services.graph.schema_summary().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            let schema = services.graph.graph_schema().await?;
            println!("{schema}");
        }
        Command::LlmCheck { prompt } => {
            let reply = services.llm.generate(&prompt).await?;
            println!("{}", reply.trim());
        }
    }

    Ok(())
}
