//! Sequential batch upload
//!
//! Files are uploaded one at a time, each under its own deadline. A failure
//! either aborts the batch or is recorded against the file, depending on
//! [`UploadOptions::skip_on_error`].

use crate::api::Uploader;
use crate::error::{Error, Result, UploadError};
use serde::Serialize;
use std::fs::File;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default per-file timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// telegra.ph answers a single-file upload with a single path. The count is
// still checked because nothing enforces it.
const EXPECTED_RESULTS: usize = 1;

/// Batch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Record failures and carry on instead of aborting the batch
    pub skip_on_error: bool,
    /// Deadline for each single file, counted from the start of its upload
    pub timeout: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            skip_on_error: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Outcome of one file's upload.
#[derive(Debug, Serialize)]
pub struct UploadRecord {
    /// Position of the file in the input list
    #[serde(rename = "num")]
    pub index: usize,
    /// Remote path, empty when the upload failed
    pub path: String,
    pub error: Option<UploadError>,
}

impl UploadRecord {
    pub fn success(index: usize, path: impl Into<String>) -> Self {
        Self {
            index,
            path: path.into(),
            error: None,
        }
    }

    pub fn failure(index: usize, error: UploadError) -> Self {
        Self {
            index,
            path: String::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Upload a single file and return its remote path.
///
/// The file is closed before this returns, whatever the outcome.
pub fn upload_one<U: Uploader + ?Sized>(
    uploader: &U,
    path: &str,
    timeout: Duration,
) -> std::result::Result<String, UploadError> {
    let deadline = Instant::now() + timeout;

    let file = File::open(path).map_err(|source| UploadError::Open {
        path: path.to_string(),
        source,
    })?;

    let mut result = uploader.upload(Box::new(file), deadline)?;
    if result.len() != EXPECTED_RESULTS {
        return Err(UploadError::UnexpectedResultCount(result.len()));
    }
    Ok(result.remove(0).src)
}

/// Upload `files` in order, returning one record per file.
///
/// Without `skip_on_error` the first failure aborts the batch and no records
/// are returned.
pub fn upload_bunch<U, S>(
    uploader: &U,
    files: &[S],
    opts: &UploadOptions,
) -> Result<Vec<UploadRecord>>
where
    U: Uploader + ?Sized,
    S: AsRef<str>,
{
    let mut records = Vec::with_capacity(files.len());

    for (index, filename) in files.iter().enumerate() {
        let filename = filename.as_ref();
        debug!(index, file = filename, "uploading");

        match upload_one(uploader, filename, opts.timeout) {
            Ok(path) => {
                debug!(index, file = filename, remote = %path, "uploaded");
                records.push(UploadRecord::success(index, path));
            }
            Err(source) => {
                if !opts.skip_on_error {
                    return Err(Error::Batch {
                        number: index + 1,
                        path: filename.to_string(),
                        source,
                    });
                }
                warn!(
                    "SKIPPED: error uploading file {}: {} : {}",
                    index + 1,
                    filename,
                    source
                );
                records.push(UploadRecord::failure(index, source));
            }
        }
    }
    Ok(records)
}
