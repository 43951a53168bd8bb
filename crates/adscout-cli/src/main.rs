mod analyze;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "adscout")]
#[command(about = "Extract advertising links and brands from a YouTube channel's recent videos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a channel's recent uploads and print the report.
    Analyze(analyze::AnalyzeArgs),
    /// List available OpenRouter model IDs.
    Models,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze::run(args).await,
        Commands::Models => analyze::list_models().await,
    }
}
