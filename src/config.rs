//! Command line configuration
//!
//! Parses the flags into explicit [`UploadOptions`] and [`OutputFormat`]
//! values and resolves the list of files to upload.

use crate::error::{Error, Result};
use crate::ui::OutputFormat;
use crate::upload::UploadOptions;
use clap::Parser;
use std::fs;
use std::time::Duration;

/// Upload files to telegra.ph.
#[derive(Parser, Debug)]
#[command(name = "telegrup")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Files to upload
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Read the list of files from a text file, one file per line
    #[arg(short, long, value_name = "FILE")]
    pub list: Option<String>,

    /// Skip failed uploads
    #[arg(short, long)]
    pub skip: bool,

    /// Be quiet (errors are printed anyway)
    #[arg(short, long)]
    pub quiet: bool,

    /// Single file upload timeout, e.g. 60s, 1m30s, 500ms
    #[arg(short, long, default_value = "60s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> UploadOptions {
        UploadOptions {
            skip_on_error: self.skip,
            timeout: self.timeout,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Files to upload, from the arguments or the list file.
    pub fn file_list(&self) -> Result<Vec<String>> {
        file_list(&self.files, self.list.as_deref())
    }
}

/// Resolve the input files. Positional `files` win over `list_file`.
///
/// Lines of the list file are trimmed; blank lines are skipped.
pub fn file_list(files: &[String], list_file: Option<&str>) -> Result<Vec<String>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    let Some(list_file) = list_file.filter(|l| !l.is_empty()) else {
        return Err(Error::NoFiles);
    };

    let data = fs::read_to_string(list_file).map_err(|source| Error::ListFile {
        path: list_file.to_string(),
        source,
    })?;
    let files: Vec<String> = data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    if files.is_empty() {
        return Err(Error::EmptyList(list_file.to_string()));
    }
    Ok(files)
}

/// Parse a duration such as `60s`, `1m30s`, `250ms`, `2h` or a bare number
/// of seconds.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration".into());
    }
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| format!("missing unit in duration {s:?}"))?;
        if digits == 0 {
            return Err(format!("invalid duration {s:?}"));
        }
        let value: f64 = rest[..digits]
            .parse()
            .map_err(|_| format!("invalid number in duration {s:?}"))?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let secs = match &rest[..unit_len] {
            "ms" => value / 1000.0,
            "s" => value,
            "m" => value * 60.0,
            "h" => value * 3600.0,
            unit => return Err(format!("unknown unit {unit:?} in duration {s:?}")),
        };
        rest = &rest[unit_len..];
        total = Duration::try_from_secs_f64(secs)
            .ok()
            .and_then(|d| total.checked_add(d))
            .ok_or_else(|| format!("duration {s:?} out of range"))?;
    }
    Ok(total)
}
