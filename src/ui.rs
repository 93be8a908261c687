// UI layer: prints the upload results and shows a spinner while a file is
// in flight. The spinner wraps any `Uploader`, so the batch code never
// knows about the terminal.

use crate::api::{UploadResult, Uploader, BASE_URL};
use crate::error::{Error, Result, UploadError};
use crate::upload::UploadRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{Read, Write};
use std::time::{Duration, Instant};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per file
    #[default]
    Text,
    /// A JSON array of records
    Json,
}

/// Print `results` to `w` in the requested format.
///
/// Failed records are written without a trailing newline.
pub fn print_results<W: Write>(
    w: &mut W,
    results: &[UploadRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, results).map_err(|e| {
                if e.is_io() {
                    Error::Write(e.into())
                } else {
                    Error::Encode(e)
                }
            })?;
            writeln!(w)?;
        }
        OutputFormat::Text => {
            for res in results {
                match &res.error {
                    Some(err) => write!(w, "{:2}: ERROR: {}", res.index, err)?,
                    None => writeln!(w, "{:2}: OK: {}{}", res.index, BASE_URL, res.path)?,
                }
            }
        }
    }
    Ok(())
}

/// Uploader decorator showing a spinner for the duration of each call.
pub struct WithSpinner<U> {
    inner: U,
    style: ProgressStyle,
}

impl<U: Uploader> WithSpinner<U> {
    pub fn new(inner: U) -> Self {
        // `{spinner} {msg}` is a fixed, valid template
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        Self { inner, style }
    }
}

impl<U: Uploader> Uploader for WithSpinner<U> {
    fn upload(
        &self,
        body: Box<dyn Read + Send>,
        deadline: Instant,
    ) -> std::result::Result<UploadResult, UploadError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(self.style.clone());
        spinner.set_message("Uploading...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.inner.upload(body, deadline);
        spinner.finish_and_clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteFile;

    fn render(results: &[UploadRecord], format: OutputFormat) -> String {
        let mut buf = Vec::new();
        print_results(&mut buf, results, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn failure(index: usize, msg: &str) -> UploadRecord {
        UploadRecord::failure(index, UploadError::status("500 Internal Server Error", msg))
    }

    #[test]
    fn text_success_line() {
        let out = render(&[UploadRecord::success(42, "/file/path")], OutputFormat::Text);
        assert_eq!(out, "42: OK: https://telegra.ph/file/path\n");
    }

    #[test]
    fn text_pads_index_to_two_columns() {
        let out = render(&[UploadRecord::success(7, "/file/path")], OutputFormat::Text);
        assert_eq!(out, " 7: OK: https://telegra.ph/file/path\n");
    }

    #[test]
    fn text_error_line_has_no_newline() {
        let err = UploadError::Open {
            path: "a.jpg".into(),
            source: std::io::Error::other("too many bits in your bytes"),
        };
        let out = render(&[UploadRecord::failure(42, err)], OutputFormat::Text);
        assert_eq!(out, "42: ERROR: open a.jpg: too many bits in your bytes");
    }

    #[test]
    fn text_error_runs_into_next_line() {
        let records = [
            UploadRecord::success(0, "/file/a"),
            failure(1, "down"),
            UploadRecord::success(2, "/file/c"),
        ];
        let out = render(&records, OutputFormat::Text);
        assert_eq!(
            out,
            " 0: OK: https://telegra.ph/file/a\n \
             1: ERROR: request error: 500 Internal Server Error, message: \"down\" \
             2: OK: https://telegra.ph/file/c\n"
        );
    }

    #[test]
    fn json_keeps_fields_and_order() {
        let mut with_both = failure(42, "boo boo");
        with_both.path = "/file/path".into();
        let records = [with_both, UploadRecord::success(43, "/file/other")];

        let out = render(&records, OutputFormat::Json);
        assert!(out.ends_with("]\n"));
        assert!(out.contains("\n  {\n    \"num\": 42,"));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["num"], 42);
        assert_eq!(items[0]["path"], "/file/path");
        let msg = items[0]["error"]["message"].as_str().unwrap();
        assert!(msg.contains("boo boo"));
        assert_eq!(items[1]["num"], 43);
        assert!(items[1]["error"].is_null());
    }

    #[test]
    fn json_round_trip_preserves_records() {
        let records = [
            UploadRecord::success(0, "/file/a.jpg"),
            failure(1, "nope"),
            UploadRecord::failure(2, UploadError::UnexpectedResultCount(0)),
        ];
        let out = render(&records, OutputFormat::Json);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();

        for (orig, back) in records.iter().zip(&parsed) {
            assert_eq!(back["num"], orig.index);
            assert_eq!(back["path"], orig.path.as_str());
            match &orig.error {
                Some(err) => assert_eq!(back["error"]["message"], err.to_string()),
                None => assert!(back["error"].is_null()),
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let records = [UploadRecord::success(0, "/file/a"), failure(1, "x")];
        for format in [OutputFormat::Text, OutputFormat::Json] {
            assert_eq!(render(&records, format), render(&records, format));
        }
    }

    #[test]
    fn empty_results_render_nothing_or_empty_array() {
        assert_eq!(render(&[], OutputFormat::Text), "");
        assert_eq!(render(&[], OutputFormat::Json), "[]\n");
    }

    #[test]
    fn write_failure_propagates() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let records = [UploadRecord::success(0, "/a")];
        for format in [OutputFormat::Text, OutputFormat::Json] {
            let err = print_results(&mut Closed, &records, format).unwrap_err();
            assert!(matches!(err, Error::Write(_)), "got {err:?}");
        }
    }

    #[test]
    fn spinner_passes_results_through() {
        type Outcome = std::result::Result<UploadResult, UploadError>;
        let inner = |_: Box<dyn Read + Send>, _: Instant| -> Outcome {
            Ok(vec![RemoteFile { src: "/file/s".into() }])
        };
        let spinner = WithSpinner::new(inner);
        let result = spinner
            .upload(Box::new(std::io::empty()), Instant::now() + Duration::from_secs(1))
            .unwrap();
        assert_eq!(result[0].src, "/file/s");
    }
}
