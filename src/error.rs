//! Typed failures for the per-artifact and per-entry stages.
//!
//! Neither kind aborts a run: the pipeline logs them and records a skip.

use std::path::PathBuf;

use thiserror::Error;

/// The archive could not be read, or its index document is unusable.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt archive {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("malformed index document: {0}")]
    Index(#[from] serde_json::Error),

    #[error("index document is not a JSON object")]
    IndexNotObject,
}

/// A single index entry could not be sliced out of the text blob.
#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("{library}: range {start}+{length} exceeds blob length {blob_len}")]
    OutOfRange {
        library: String,
        start: usize,
        length: usize,
        blob_len: usize,
    },

    #[error("{library}: {detail}")]
    Malformed { library: String, detail: String },
}
