//! Error types for telegrup
//!
//! `UploadError` describes why a single file could not be uploaded. It is
//! either fatal for the whole batch or recorded next to the file, depending
//! on the skip policy. `Error` is what the library hands back to `main`.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for batch and rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one file's upload attempt.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The local file could not be opened
    #[error("open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The remote call did not complete before the deadline
    #[error("upload timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, DNS or I/O failure while talking to the service
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-200 status
    #[error("request error: {status}, message: {body:?}")]
    Status { status: String, body: String },

    /// The 200 response body was not the expected JSON array
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service returned some other number of paths than one
    #[error("unexpected number of results: {0}")]
    UnexpectedResultCount(usize),
}

impl UploadError {
    /// Create a status error from the response status line and body text
    pub fn status(status: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
            body: body.into(),
        }
    }
}

// Rendered in JSON output as `{"message": "..."}`.
impl Serialize for UploadError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UploadError", 1)?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Errors surfaced to the command line.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither positional files nor a list file were given
    #[error("no files provided")]
    NoFiles,

    /// The list file could not be read
    #[error("reading list file {path}: {source}")]
    ListFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The list file had no usable lines
    #[error("no data discovered in {0}")]
    EmptyList(String),

    /// A file failed and the batch was aborted
    #[error("error uploading file {number}: {path} : {source}")]
    Batch {
        /// 1-based position of the failed file
        number: usize,
        path: String,
        #[source]
        source: UploadError,
    },

    /// Writing the results failed
    #[error("writing results: {0}")]
    Write(#[from] std::io::Error),

    /// Serialising the results failed
    #[error("encoding results: {0}")]
    Encode(#[from] serde_json::Error),

    /// The HTTP client could not be built
    #[error("building http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl Error {
    /// Whether the error comes from resolving the input file list
    pub fn is_file_list(&self) -> bool {
        matches!(
            self,
            Self::NoFiles | Self::ListFile { .. } | Self::EmptyList(_)
        )
    }
}
