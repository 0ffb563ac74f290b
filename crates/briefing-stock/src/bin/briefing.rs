//! Stock briefing CLI
//!
//! Builds one report for the configured watchlist and mails it.
//!
//! # Usage
//!
//! ```bash
//! # Credentials and stage settings come from the environment or .env
//! export EMAIL_ADDRESS="me@gmail.com"
//! export EMAIL_PASSWORD="app-password"
//!
//! # Quote report, printed instead of mailed
//! cargo run --bin briefing -p briefing-stock -- --dry-run
//!
//! # English AI digest
//! cargo run --bin briefing -p briefing-stock -- --profile ai-digest --language en
//! ```

use anyhow::Context;
use briefing_stock::{BriefingConfig, BriefingPipeline, Language, Profile, ReportFormat};
use briefing_utils::{EnvSource, LogFormat, init_tracing, load_dotenv};
use clap::Parser;
use tracing::{debug, info};

const DEFAULT_LOG_FILTER: &str = "warn,briefing_stock=info";

#[derive(Debug, Parser)]
#[command(name = "briefing", version, about = "Build and mail the daily stock briefing")]
struct Cli {
    /// Stage preset: quote-report, ai-digest or translated
    #[arg(long)]
    profile: Option<Profile>,

    /// Report format: html or text
    #[arg(long)]
    format: Option<ReportFormat>,

    /// Report language: ko or en
    #[arg(long)]
    language: Option<String>,

    /// Print the report instead of mailing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    init_tracing(DEFAULT_LOG_FILTER, LogFormat::from_env());
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    let mut config = BriefingConfig::from_source(&EnvSource::Process, cli.profile)
        .context("failed to read configuration")?;
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(language) = cli.language.as_deref() {
        config.language = Language::from_code(language);
    }
    if cli.dry_run {
        config.dry_run = true;
    }
    config.validate().context("invalid configuration")?;

    info!(
        profile = %config.profile,
        format = %config.format,
        language = %config.language,
        dry_run = config.dry_run,
        "starting briefing"
    );

    let pipeline = BriefingPipeline::from_config(&config).context("failed to set up the pipeline")?;
    match pipeline.run().await.context("briefing run failed")? {
        Some(report) => info!(subject = %report.subject, "briefing complete"),
        None => info!("no active tickers, no report sent"),
    }

    Ok(())
}
