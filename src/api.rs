// API client module: a small blocking HTTP client that talks to the
// telegra.ph upload endpoint. One POST per file, nothing else; the batch
// logic lives in `upload`.

use crate::error::UploadError;
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::debug;

/// Root of the telegra.ph service. Remote paths are relative to it.
pub const BASE_URL: &str = "https://telegra.ph";

/// Upload endpoint used when `TELEGRUP_UPLOAD_URL` is not set.
pub const DEFAULT_UPLOAD_URL: &str = "https://telegra.ph/upload";

/// Environment variable overriding the upload endpoint.
pub const UPLOAD_URL_ENV: &str = "TELEGRUP_UPLOAD_URL";

const FORM_FIELD: &str = "blob";
const FORM_FILENAME: &str = "filename";

/// The relative path to an uploaded file on the telegra.ph service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub src: String,
}

/// Response of the upload endpoint.
pub type UploadResult = Vec<RemoteFile>;

/// Something that can push a byte stream to the remote service.
///
/// The call must give up once `deadline` has passed.
pub trait Uploader {
    fn upload(
        &self,
        body: Box<dyn Read + Send>,
        deadline: Instant,
    ) -> Result<UploadResult, UploadError>;
}

impl<F> Uploader for F
where
    F: Fn(Box<dyn Read + Send>, Instant) -> Result<UploadResult, UploadError>,
{
    fn upload(
        &self,
        body: Box<dyn Read + Send>,
        deadline: Instant,
    ) -> Result<UploadResult, UploadError> {
        self(body, deadline)
    }
}

/// Blocking client for the telegra.ph upload endpoint.
#[derive(Clone)]
pub struct TelegraphClient {
    client: Client,
    endpoint: String,
}

impl TelegraphClient {
    /// Create a client posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(TelegraphClient {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a client configured from `TELEGRUP_UPLOAD_URL` or fall back
    /// to the public endpoint.
    pub fn from_env() -> Result<Self, reqwest::Error> {
        let endpoint =
            std::env::var(UPLOAD_URL_ENV).unwrap_or_else(|_| DEFAULT_UPLOAD_URL.into());
        Self::new(endpoint)
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Uploader for TelegraphClient {
    /// Send `body` as the `blob` part of a multipart form. The remaining
    /// time until `deadline` bounds the whole request, body read included.
    fn upload(
        &self,
        body: Box<dyn Read + Send>,
        deadline: Instant,
    ) -> Result<UploadResult, UploadError> {
        let timeout = deadline.saturating_duration_since(Instant::now());
        if timeout.is_zero() {
            return Err(UploadError::Timeout(Duration::ZERO));
        }

        let part = multipart::Part::reader(body).file_name(FORM_FILENAME);
        let form = multipart::Form::new().part(FORM_FIELD, part);

        debug!(endpoint = %self.endpoint, ?timeout, "posting upload");
        let res = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .timeout(timeout)
            .send()
            .map_err(|e| transport_error(e, timeout))?;

        let status = res.status();
        let txt = res.text().map_err(|e| transport_error(e, timeout))?;
        if status != StatusCode::OK {
            return Err(UploadError::status(status.to_string(), txt));
        }

        let result: UploadResult = serde_json::from_str(&txt)?;
        debug!(results = result.len(), "upload accepted");
        Ok(result)
    }
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> UploadError {
    if err.is_timeout() {
        UploadError::Timeout(timeout)
    } else {
        UploadError::Transport(err)
    }
}
