//! `daybook-feeds`: scheduled producers for the daybook journal.
//!
//! # Usage
//!
//! ```
//! daybook-feeds news
//! daybook-feeds prompts --date 2024-03-01 --dry-run
//! daybook-feeds --config ~/.config/daybook/feeds.toml news
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use daybook_core::date::{DEFAULT_TIMEZONE, today_in};
use daybook_feeds::{
  client::{Delivery, GatewayClient},
  config::ConfigFile,
  digest::{self, default_sections},
  news::NewsClient,
  prompts,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "daybook-feeds", about = "Post news and prompts to the daybook journal")]
struct Args {
  /// Path to a TOML config file (endpoint, news_api_key, timezone, sections).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// URL of the gateway's write endpoint.
  #[arg(long, env = "WRITE_TO_ENTRY_ENDPOINT")]
  endpoint: Option<String>,

  /// Zone in which "today" and "yesterday" are reckoned.
  #[arg(long, env = "DAYBOOK_TIMEZONE")]
  timezone: Option<Tz>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch the news digest and append each section to today's page.
  News {
    /// NewsAPI key.
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the requests instead of posting them.
    #[arg(long)]
    dry_run: bool,
  },
  /// Append the journaling prompts for a date.
  Prompts {
    /// Date to select prompts for (default: today).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the requests instead of posting them.
    #[arg(long)]
    dry_run: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => ConfigFile::load(path).context("loading config file")?,
    None => ConfigFile::default(),
  };

  // CLI flags override config file, which overrides defaults.
  let timezone = args.timezone.or(file_cfg.timezone).unwrap_or(DEFAULT_TIMEZONE);
  let endpoint = args.endpoint.or(file_cfg.endpoint);

  match args.command {
    Command::News { api_key, dry_run } => {
      let api_key = api_key
        .or(file_cfg.news_api_key)
        .ok_or_else(|| anyhow!("no NewsAPI key: pass --api-key or set NEWS_API_KEY"))?;
      let mut news = NewsClient::new(api_key, timezone).context("building news client")?;
      if let Some(base_url) = file_cfg.news_base_url {
        news = news.with_base_url(base_url);
      }
      let sections = if file_cfg.sections.is_empty() {
        default_sections()
      } else {
        file_cfg.sections
      };

      let delivery = delivery(endpoint, dry_run)?;
      digest::run(&news, &delivery, &sections)
        .await
        .context("news digest failed")?;
    }
    Command::Prompts { date, dry_run } => {
      let date = date.unwrap_or_else(|| today_in(timezone));
      let delivery = delivery(endpoint, dry_run)?;
      prompts::run(&delivery, date)
        .await
        .context("prompt delivery failed")?;
    }
  }

  Ok(())
}

fn delivery(endpoint: Option<String>, dry_run: bool) -> Result<Delivery> {
  if dry_run {
    return Ok(Delivery::DryRun);
  }
  let endpoint = endpoint
    .ok_or_else(|| anyhow!("no write endpoint: pass --endpoint or set WRITE_TO_ENTRY_ENDPOINT"))?;
  Ok(Delivery::Post(GatewayClient::new(endpoint).context("building gateway client")?))
}
