// src/error.rs
//! Error taxonomy.
//!
//! Two tiers:
//! - [`SkipReason`] (and the [`FetchError`] / [`MalformedDate`] it wraps) aborts a
//!   single calendar month. The driver logs it, counts it, and moves on.
//! - [`Error`] is fatal for the whole run. Anything touching the persisted
//!   dataset lands here, as do configuration and chart failures.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure of the external fetch primitive.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("transport error for {url}: {reason}")]
    Transport { url: String, reason: String },
    #[error("offline mode and {url} is not cached")]
    Offline { url: String },
}

/// Text that does not follow the `DDMMMYY` bulletin date grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse date '{raw}'")]
pub struct MalformedDate {
    pub raw: String,
}

/// Why a calendar month was dropped from this run.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("failed to download: {0}")]
    Fetch(#[from] FetchError),
    #[error("priority date cell not found (page layout mismatch)")]
    FieldNotFound,
    #[error(transparent)]
    MalformedDate(#[from] MalformedDate),
}

impl SkipReason {
    /// Short stable label, used for summary counters.
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::Fetch(_) => SkipKind::Fetch,
            SkipReason::FieldNotFound => SkipKind::FieldNotFound,
            SkipReason::MalformedDate(_) => SkipKind::MalformedDate,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipKind {
    Fetch,
    FieldNotFound,
    MalformedDate,
}

/// Fatal errors. Any of these aborts the run with a non-zero exit.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed reading dataset {}: {source}", path.display())]
    DatasetRead { path: PathBuf, source: io::Error },
    #[error("failed writing dataset {}: {source}", path.display())]
    DatasetWrite { path: PathBuf, source: io::Error },
    #[error("corrupt dataset {} (line {line}): {reason}", path.display())]
    CorruptDataset { path: PathBuf, line: usize, reason: String },
    #[error("failed rendering chart {}: {reason}", path.display())]
    Chart { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Config(String),
}
