// src/error.rs

use thiserror::Error;

/// Failures that abort a cache run.
///
/// Everything here propagates to the binary, which prints it and exits
/// non-zero. Per-row problems in the pivot table are not errors; they are
/// logged and the row is skipped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CMS answered with HTTP {status}")]
    Status { status: u16 },

    #[error("malformed CMS response: {0}")]
    Malformed(String),

    #[error("CMS returned an error: {0}")]
    Remote(String),

    #[error("CMS response has no '{0}' field")]
    MissingField(&'static str),

    #[error("pivot header has no '{0}' column")]
    MissingStoreColumn(&'static str),
}
