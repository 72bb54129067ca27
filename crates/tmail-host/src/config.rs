//! Process configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Port used when neither `--port` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Largest accepted request body, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 1_000_000;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// tmail-host command line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "tmail-host", version, about = "tmail message ingestion gateway")]
pub struct HostConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind.
    #[arg(long, env = "TMAIL_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "TMAIL_MAX_MESSAGE_SIZE", default_value_t = MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// SQLite database path. Messages are kept in memory when unset.
    #[arg(long, env = "TMAIL_DB")]
    pub db: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "TMAIL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl HostConfig {
    /// The port to listen on, falling back to [`DEFAULT_PORT`].
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// The `host:port` listen address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: None,
            bind: "0.0.0.0".to_string(),
            max_message_size: MAX_MESSAGE_SIZE,
            db: None,
            log_format: LogFormat::Text,
        }
    }
}
