//! # tmail-host
//!
//! HTTP binding for the tmail ingestion core.
//!
//! ```text
//!   POST /tmail/v1 ──▶ admission checks ──▶ WireMessage ──▶ Ingestor::ingest
//!                     (method, length,      (JSON)           │
//!                      type, size)                           ▼
//!                                                  201 / 200 / 4xx / 503
//! ```
//!
//! The host owns everything transport-shaped: size limits, content types,
//! JSON field names and status codes. Identity and lineage decisions belong
//! to `tmail-kernel`.

pub mod api;
pub mod config;

pub use api::{create_router, run_server, AppState};
pub use config::{HostConfig, LogFormat, DEFAULT_PORT, MAX_MESSAGE_SIZE};
