//! `analyze` and `models` command handlers.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use adscout_extract::{process_records, report_to_xlsx, LlmContext};
use adscout_openrouter::{default_models, OpenRouterClient};
use adscout_youtube::YoutubeClient;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Channel URL, e.g. https://www.youtube.com/@somehandle
    #[arg(long)]
    pub channel_url: String,

    /// Number of recent videos to analyze (1-50).
    #[arg(long, default_value_t = 10)]
    pub max_videos: usize,

    /// Worker pool size; defaults to ADSCOUT_CONCURRENCY.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Write the report to this .xlsx file in addition to printing it.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = adscout_core::load_app_config_from_env()?;

    let youtube_key = config
        .youtube_api_key
        .as_deref()
        .context("YOUTUBE_API_KEY is required for analyze")?;
    let youtube = YoutubeClient::new(youtube_key, config.request_timeout_secs)?;

    let records = youtube
        .recent_videos(&args.channel_url, args.max_videos.clamp(1, 50))
        .await?;

    let credentials = config.llm_credentials();
    if credentials.is_none() {
        tracing::warn!(
            "no OpenRouter credentials configured; brand extraction will return empty results"
        );
    }
    let llm_client = match &credentials {
        Some(creds) => Some(OpenRouterClient::new(
            &creds.api_key,
            config.request_timeout_secs,
        )?),
        None => None,
    };
    let llm = match (&llm_client, &credentials) {
        (Some(client), Some(creds)) => Some(LlmContext {
            client,
            model: &creds.model,
        }),
        _ => None,
    };

    let concurrency = args.concurrency.unwrap_or(config.concurrency);
    let Some(report) = process_records(records, llm, concurrency).await else {
        println!("no videos found for this channel");
        return Ok(());
    };

    for row in &report.rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.published_at, row.video_url, row.title, row.brand, row.link
        );
    }
    println!("{} rows", report.len());

    if let Some(path) = args.out {
        let bytes = report_to_xlsx(&report)?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

pub async fn list_models() -> anyhow::Result<()> {
    let config = adscout_core::load_app_config_from_env()?;
    let api_key = config.openrouter_api_key.clone().unwrap_or_default();
    let client = OpenRouterClient::new(&api_key, config.request_timeout_secs)?;

    let models = match client.list_models().await {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => {
            tracing::warn!("model listing returned no models; showing defaults");
            default_models()
        }
        Err(e) => {
            tracing::warn!(error = %e, "model listing failed; showing defaults");
            default_models()
        }
    };

    for model in models {
        println!("{model}");
    }
    Ok(())
}
