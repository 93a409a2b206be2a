//! lazone server binary.
//!
//! Reads `lazone.toml` (or the path specified with `--config`), opens the
//! configured article store, and then either serves the read API over HTTP,
//! serves it as an AWS Lambda function, or runs one NewsAPI ingestion pass.
//!
//! ```text
//! lazone serve              # default
//! lazone lambda
//! lazone ingest
//! ```

mod newsapi;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use lazone_api::{ApiState, api_router};
use lazone_core::store::ArticleStore;
use lazone_store_dynamo::DynamoStore;
use lazone_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use newsapi::NewsApiClient;
use settings::{Backend, Settings, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "LaZone climate article service")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lazone.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
  /// Serve the read API over HTTP.
  Serve,
  /// Serve the read API as an AWS Lambda function.
  Lambda,
  /// Fetch articles from NewsAPI and write them to the store.
  Ingest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = cli.command.unwrap_or(Command::Serve);
  let settings = Settings::load(&cli.config)?;

  match settings.backend.clone() {
    Backend::Sqlite { path, key_attribute } => {
      let path = expand_tilde(&path);
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?
        .with_key_attribute(key_attribute);
      run(command, &settings, store).await
    }
    Backend::Dynamodb { table } => {
      tracing::info!(%table, "using dynamodb table");
      run(command, &settings, DynamoStore::connect(table).await).await
    }
  }
}

async fn run<S>(command: Command, settings: &Settings, store: S) -> anyhow::Result<()>
where
  S: ArticleStore + 'static,
{
  match command {
    Command::Serve => serve(settings, store).await,
    Command::Lambda => {
      let app = api_router(state(settings, store));
      lambda_http::run(app)
        .await
        .map_err(|e| anyhow::anyhow!("lambda runtime error: {e}"))
    }
    Command::Ingest => ingest(settings, &store).await,
  }
}

fn state<S>(settings: &Settings, store: S) -> ApiState<S> {
  ApiState::new(Arc::new(store)).with_max_items(settings.max_items)
}

async fn serve<S>(settings: &Settings, store: S) -> anyhow::Result<()>
where
  S: ArticleStore + 'static,
{
  let app = api_router(state(settings, store));
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

async fn ingest<S: ArticleStore>(settings: &Settings, store: &S) -> anyhow::Result<()> {
  let Some(config) = settings.newsapi.clone() else {
    bail!("`[newsapi]` section missing from configuration");
  };

  let articles = NewsApiClient::new(config)?
    .fetch()
    .await
    .context("failed to fetch articles from NewsAPI")?;

  let summary = newsapi::ingest(store, articles).await;
  if summary.written == 0 && summary.failed > 0 {
    bail!("no articles could be written ({} failures)", summary.failed);
  }
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
