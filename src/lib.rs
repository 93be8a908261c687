// Library root
// -----------
// This crate exposes the pieces of the `telegrup` uploader. The binary
// (`main.rs`) wires them together.
//
// Module responsibilities:
// - `api`: the telegra.ph upload endpoint client and the `Uploader` seam.
// - `upload`: one-file upload step and the sequential batch around it.
// - `ui`: result rendering (text or JSON) and the upload spinner.
// - `config`: command line flags and input file list resolution.
// - `error`: error types shared by the above.
pub mod api;
pub mod config;
pub mod error;
pub mod ui;
pub mod upload;

pub use error::{Error, Result, UploadError};
