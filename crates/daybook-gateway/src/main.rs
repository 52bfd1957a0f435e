//! daybook-gateway server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `DAYBOOK_*`
//! environment variables, then serves the write endpoint over HTTP. Without
//! a `[notion]` section the journal lives in memory and is lost on exit.
//!
//! Nested keys use a double underscore in the environment, for example
//! `DAYBOOK_NOTION__API_KEY`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use daybook_core::{memory::MemoryStore, store::JournalStore};
use daybook_gateway::{AppState, ServerConfig};
use daybook_notion::NotionStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Daybook write gateway")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("DAYBOOK")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match server_cfg.notion.clone() {
    Some(notion) => {
      info!(database_id = %notion.database_id, "using notion journal");
      let store = NotionStore::new(notion).context("failed to build notion client")?;
      serve(Arc::new(store), &server_cfg).await
    }
    None => {
      warn!("no [notion] section configured; journal is held in memory");
      serve(Arc::new(MemoryStore::new()), &server_cfg).await
    }
  }
}

async fn serve<S>(store: Arc<S>, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: JournalStore + 'static,
{
  let app = daybook_gateway::router(AppState::new(store, cfg.timezone));
  let address = format!("{}:{}", cfg.host, cfg.port);

  info!(timezone = %cfg.timezone, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
