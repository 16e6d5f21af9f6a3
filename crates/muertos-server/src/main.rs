//! muertos-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP under `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use muertos_ai::{
  Completions, anthropic::AnthropicClient, openai::OpenAiClient,
};
use muertos_api::{AppState, TokenMetadataClient};
use muertos_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Muertos world server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// `MUERTOS_*` environment.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,

  /// Which completion provider to construct: `anthropic` or `openai`.
  #[serde(default = "default_provider")]
  provider:          String,
  anthropic_api_key: Option<String>,
  openai_api_key:    Option<String>,
  /// Optional model override for the chosen provider.
  model:             Option<String>,

  /// Content-addressed gateway serving the token metadata documents.
  #[serde(default = "default_ipfs_gateway")]
  ipfs_gateway: String,
  /// CID of the metadata directory on the gateway.
  #[serde(default)]
  metadata_cid: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("muertos.db") }
fn default_provider() -> String { "anthropic".to_string() }
fn default_ipfs_gateway() -> String { "https://ipfs.io/ipfs".to_string() }

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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MUERTOS"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let completions = build_completions(&server_cfg)?;
  tracing::info!("Completion provider: {}", completions.provider_name());

  // Build application state.
  let state = AppState {
    store:       Arc::new(store),
    completions: Arc::new(completions),
    metadata:    Arc::new(TokenMetadataClient::new(
      server_cfg.ipfs_gateway.clone(),
      server_cfg.metadata_cid.clone(),
    )),
  };

  let app = axum::Router::new()
    .nest("/api", muertos_api::api_router(state))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Construct the configured completion provider, preferring an explicit
/// config key over the provider's environment variable.
fn build_completions(cfg: &ServerConfig) -> anyhow::Result<Completions> {
  let completions = match cfg.provider.as_str() {
    "anthropic" => {
      let client = match &cfg.anthropic_api_key {
        Some(key) => AnthropicClient::new(key),
        None => AnthropicClient::from_env()
          .context("anthropic_api_key not configured")?,
      };
      match &cfg.model {
        Some(model) => Completions::Anthropic(client.with_model(model)),
        None => Completions::Anthropic(client),
      }
    }
    "openai" => {
      let client = match &cfg.openai_api_key {
        Some(key) => OpenAiClient::new(key),
        None => {
          OpenAiClient::from_env().context("openai_api_key not configured")?
        }
      };
      match &cfg.model {
        Some(model) => Completions::OpenAi(client.with_model(model)),
        None => Completions::OpenAi(client),
      }
    }
    other => anyhow::bail!("unknown completion provider: {other:?}"),
  };
  Ok(completions)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
