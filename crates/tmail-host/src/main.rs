//! tmail-host: accepts messages over HTTP, assigns content-derived ids,
//! enforces lineage, and hands them to a store.
//!
//! ```bash
//! # In-memory store on :8080
//! tmail-host
//!
//! # Durable store, JSON logs
//! PORT=9000 TMAIL_DB=/var/lib/tmail/messages.db TMAIL_LOG_FORMAT=json tmail-host
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tmail_host::{run_server, HostConfig, LogFormat, DEFAULT_PORT};
use tmail_kernel::Ingestor;
use tmail_store::{MemoryStore, SqliteStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = HostConfig::parse();
    init_tracing(config.log_format);

    if config.port.is_none() {
        tracing::info!("Defaulting to port {}", DEFAULT_PORT);
    }

    match &config.db {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("opening message store at {}", path.display()))?;
            tracing::info!(path = %path.display(), "using SQLite message store");
            run_server(&config, Ingestor::with_store(Arc::new(store))).await?;
        }
        None => {
            tracing::warn!("TMAIL_DB not set, messages are kept in memory only");
            run_server(&config, Ingestor::with_store(Arc::new(MemoryStore::new()))).await?;
        }
    }

    Ok(())
}

/// `RUST_LOG` filters; `--log-format json` switches to machine-parseable output.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tmail=info,tower_http=info".into());

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
