mod config;
mod error;
mod models;
mod money;
mod period;
mod render;
mod report;
mod service;
mod statistics;
mod usage;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::{config_path, ensure_initialized, get_bearer_token, load_config, set_bearer_token};
use error::AppError;
use render::TagRenderer;
use service::ReportService;
use statistics::VkPlaySource;
use std::path::Path;

#[derive(Debug, Parser)]
#[command(name = "akt-report")]
#[command(about = "Monthly server usage certificate (акт выполненных работ) generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the config directory and a default config.toml.
    Init,
    /// Store the billing API bearer token in the OS keyring.
    SetToken { token: String },
    /// Fetch statistics and produce the certificate for the period.
    Generate {
        /// Run as if today were this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
        /// Compute and print totals without rendering or writing.
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_report_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AppError::Config(format!("Invalid --date '{input}'. Use YYYY-MM-DD.")))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            ensure_initialized()?;
            println!("Initialized config at {}", config_path()?.display());
        }
        Commands::SetToken { token } => {
            ensure_initialized()?;
            set_bearer_token(&token)?;
            println!("Bearer token stored.");
        }
        Commands::Generate { date, dry_run } => {
            ensure_initialized()?;
            let cfg = load_config()?;

            // Preconditions, checked before any network work.
            let token = get_bearer_token()?;
            if !dry_run && !Path::new(&cfg.template_path).exists() {
                return Err(AppError::Config(format!(
                    "template file {} not found",
                    cfg.template_path
                )));
            }

            let today = match date {
                Some(raw) => parse_report_date(&raw)?,
                None => Local::now().date_naive(),
            };

            let source = VkPlaySource::new(token, cfg.base_url.clone());
            let svc = ReportService::new()?;
            svc.generate(&cfg, &source, &TagRenderer, today, dry_run)
                .await?;
        }
    }

    Ok(())
}
