use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lawsquad::definitions;
use lawsquad::providers::GeminiProvider;
use lawsquad::{Config, ConsultError, ConsultationRequest, Coordinator, ModelRef};

#[derive(Parser)]
#[command(name = "lawsquad")]
#[command(about = "Multi-agent corporate formation advisory coordinator", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, help = "Path to a TOML config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Consult {
        #[arg(help = "Business context to analyze")]
        context: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?.merged_over_env(),
        None => Config::from_env(),
    };

    match cli.command {
        Commands::Consult { context } => consult(&config, context).await?,
    }

    Ok(())
}

async fn consult(config: &Config, context: String) -> Result<()> {
    let api_key = config
        .gemini_api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is not set"))?;

    let graph = match &config.model {
        Some(model) => definitions::squad_with_model(ModelRef::from(model.clone())),
        None => definitions::squad(),
    };

    let mut coordinator = Coordinator::new(graph, Arc::new(GeminiProvider::new(api_key)));
    if let Some(secs) = config.advisor_timeout_secs {
        coordinator = coordinator.with_advisor_timeout(Duration::from_secs(secs));
    }

    let mut context = context;
    loop {
        let request = ConsultationRequest::new(context.clone());
        match coordinator.synthesize(&request).await {
            Ok(plan) => {
                println!("{}", plan.render());
                return Ok(());
            }
            Err(ConsultError::AmbiguousContext { question }) => {
                println!("{}", question);
                print!("> ");
                std::io::stdout().flush()?;

                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if answer.trim().is_empty() {
                    anyhow::bail!("no additional context provided");
                }
                context.push(' ');
                context.push_str(answer.trim());
            }
            Err(e) => return Err(e.into()),
        }
    }
}
