//! Error types.
//!
//! Only failures that can stop a record (or a run) live here. A missing anchor
//! or a missing approval step is not an error: it degrades to a placeholder
//! and is recorded on the field or slot it affected.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceKind;

/// HTTP transport failures, shared by the document fetcher and the ticket client.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

impl NetError {
    /// Worth another attempt: timeouts, connection faults, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            NetError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            NetError::Status { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

/// Failure to fetch a document. Absence is not one of these.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("pdftotext failed on {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum TicketError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing credentials: environment variable {0} is not set")]
    Credentials(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("unrecognized source kind: {0}")]
    UnknownKind(String),

    #[error("{kind} documents cannot be read from {found} content")]
    ContentMismatch { kind: SourceKind, found: &'static str },
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("row {row} is outside tab {tab} ({len} rows)")]
    RowOutOfRange { tab: String, row: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("key {key} matches {} rows: {rows:?}", .rows.len())]
    DuplicateKey { key: String, rows: Vec<usize> },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Error, Debug)]
pub enum EnumerateError {
    #[error("no numeric key in tab {tab} and no configured start id")]
    NoStart { tab: String },

    #[error("last key {last} in tab {tab} has no successor")]
    KeyExhausted { tab: String, last: u64 },

    #[error("{count} consecutive fetch failures, last at id {id}: {source}")]
    TooManyFailures { id: u64, count: usize, source: SourceError },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] io::Error),

    #[error("cannot parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that can abort a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
