//! Error types for the qrphone library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScanError`]: **Fatal.** The image never reached the pipeline, or the
//!   pipeline could not run at all (missing file, rejected upload, bytes that
//!   are not an image, failed download). Returned as `Err(ScanError)` from
//!   the intake entry points in [`crate::scan`].
//!
//! * [`ParseFailure`]: **Non-fatal.** The pipeline ran, found a phone-shaped
//!   token, but the numbering-plan parser rejected it. Surfaces to callers
//!   as [`crate::output::Outcome::NotFound`] with reason `unparseable`.
//!
//! "No QR code" and "no phone number in the payload" are not errors at all;
//! they are ordinary [`crate::output::NotFoundReason`] values.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the qrphone library.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input is not usable as an image source.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// An upload arrived without a filename.
    #[error("No selected file")]
    NoFileSelected,

    /// The filename extension is not in the configured whitelist.
    #[error("Invalid file format. Please upload a valid image.")]
    UnsupportedFormat { filename: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The bytes could not be decoded as a raster image.
    #[error("Could not read image '{source_name}': {detail}")]
    ImageLoad { source_name: String, detail: String },

    /// Decoding did not finish within `decode_timeout_secs`.
    #[error("QR decode timed out after {secs}s")]
    DecodeTimeout { secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not materialise an upload inside the upload directory.
    #[error("Failed to store upload in '{dir}': {source}")]
    UploadWriteFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A phone-shaped token that the numbering-plan parser refused.
///
/// Carried in the `failure` field of [`crate::output::Outcome::NotFound`],
/// so it shows up in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ParseFailure {
    /// Wrong length, unknown calling code, missing `+` prefix, or not a number.
    #[error("Error parsing phone number '{token}': {detail}")]
    Unparseable { token: String, detail: String },
}
