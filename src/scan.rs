//! Scan entry points: run the pipeline on an image and return its outcome.
//!
//! ## Layers
//!
//! [`scan`] is the core chain and is infallible: every image ends in an
//! [`Outcome`]. The remaining functions are intake glue around it. They
//! obtain an [`ImageHandle`] from a path, an upload or a URL, and are the
//! only places a [`ScanError`] can come from.
//!
//! ## Why an async wrapper?
//!
//! Decoding is CPU-bound and has no internal suspension points, so the core
//! stays synchronous. [`scan_input`] moves it onto tokio's blocking pool,
//! which is also where an optional timeout can bound decode latency on
//! adversarial images without the stages knowing anything about it.

use crate::config::IntakeConfig;
use crate::error::ScanError;
use crate::output::{NotFoundReason, Outcome};
use crate::pipeline::decode::{self, ImageHandle};
use crate::pipeline::{extract, input, resolve};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Run decode → extract → resolve on an image.
pub fn scan(image: &ImageHandle) -> Outcome {
    let start = Instant::now();
    let decoded = decode::decode(image);
    debug!(
        "Decode finished in {}ms: {}",
        start.elapsed().as_millis(),
        if decoded.is_some() { "symbol found" } else { "no symbol" }
    );

    match decoded {
        None => Outcome::not_found(NotFoundReason::NoQr, None),
        Some(text) => scan_text(Some(&text)),
    }
}

/// Run extract → resolve on already-decoded QR text.
///
/// `None` means no QR payload was available and maps to
/// [`NotFoundReason::NoQr`].
pub fn scan_text(text: Option<&str>) -> Outcome {
    let Some(text) = text else {
        return Outcome::not_found(NotFoundReason::NoQr, None);
    };

    let Some(token) = extract::extract_token(Some(text)) else {
        debug!("No phone-shaped token in {} chars of payload", text.len());
        return Outcome::not_found(NotFoundReason::NoToken, Some(text));
    };
    debug!("Extracted token '{}'", token);

    match resolve::resolve(token) {
        Ok(number) => Outcome::Resolved {
            phone_token: token.to_string(),
            number,
        },
        Err(failure) => {
            debug!("{}", failure);
            Outcome::unparseable(failure, text)
        }
    }
}

/// Load an image file and scan it.
///
/// The file's format is sniffed from its content; the extension whitelist
/// is not applied here (see [`scan_input`] and [`scan_upload`]).
pub fn scan_file(path: impl AsRef<Path>) -> Result<Outcome, ScanError> {
    let image = ImageHandle::open(path.as_ref())?;
    Ok(scan(&image))
}

/// Scan an uploaded image.
///
/// Applies the intake checks (filename present, whitelisted extension,
/// size limit), materialises the bytes as a uniquely named file inside
/// `config.upload_dir`, and scans it. The file is removed before this
/// function returns, successful or not.
pub fn scan_upload(
    filename: &str,
    bytes: &[u8],
    config: &IntakeConfig,
) -> Result<Outcome, ScanError> {
    if filename.trim().is_empty() {
        return Err(ScanError::NoFileSelected);
    }
    if !input::is_allowed_file(filename, config) {
        return Err(ScanError::UnsupportedFormat {
            filename: filename.to_string(),
        });
    }
    if bytes.len() > config.max_upload_bytes {
        return Err(ScanError::InvalidInput {
            input: filename.to_string(),
            reason: format!(
                "upload is {} bytes, limit is {}",
                bytes.len(),
                config.max_upload_bytes
            ),
        });
    }

    let dir = upload_dir(config);
    std::fs::create_dir_all(&dir).map_err(|e| ScanError::UploadWriteFailed {
        dir: dir.clone(),
        source: e,
    })?;

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{ext}"))
        .tempfile_in(&dir)
        .map_err(|e| ScanError::UploadWriteFailed {
            dir: dir.clone(),
            source: e,
        })?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| ScanError::UploadWriteFailed {
            dir: dir.clone(),
            source: e,
        })?;
    debug!(
        "Stored upload '{}' ({} bytes) at {}",
        filename,
        bytes.len(),
        tmp.path().display()
    );

    // `tmp` is dropped (and the file deleted) when this returns
    let outcome = scan_file(tmp.path())?;
    info!("Upload '{}' → {}", filename, describe(&outcome));
    Ok(outcome)
}

/// Scan a local image path or HTTP/HTTPS URL.
///
/// # Errors
/// Returns `Err(ScanError)` only for intake failures (missing file,
/// rejected extension, failed download, unreadable image) or when
/// `config.decode_timeout_secs` expires. "No QR code" and "no phone
/// number" are `Ok(Outcome::NotFound { .. })`.
///
/// # Cancellation
/// A decode timeout only stops waiting. The blocking task cannot be
/// interrupted and keeps running on tokio's blocking pool until it finishes.
/// For URL input the downloaded file is deleted as soon as this returns, so
/// the detached task may then fail to read it; its result is discarded
/// either way.
pub async fn scan_input(
    input_str: impl AsRef<str>,
    config: &IntakeConfig,
) -> Result<Outcome, ScanError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting scan: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config).await?;
    let path = resolved.path().to_path_buf();

    // ── Step 2: Decode → extract → resolve off the async workers ─────────
    let task = tokio::task::spawn_blocking(move || scan_file(&path));
    let joined = match config.decode_timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), task)
            .await
            .map_err(|_| ScanError::DecodeTimeout { secs })?,
        None => task.await,
    };
    let outcome =
        joined.map_err(|e| ScanError::Internal(format!("Scan task panicked: {}", e)))??;

    // Downloaded files live until here
    drop(resolved);

    info!(
        "Scan complete in {}ms: {}",
        total_start.elapsed().as_millis(),
        describe(&outcome)
    );
    Ok(outcome)
}

/// Synchronous wrapper around [`scan_input`].
///
/// Creates a temporary tokio runtime internally.
pub fn scan_sync(
    input_str: impl AsRef<str>,
    config: &IntakeConfig,
) -> Result<Outcome, ScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScanError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(scan_input(input_str, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn upload_dir(config: &IntakeConfig) -> PathBuf {
    config
        .upload_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir)
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Resolved { phone_token, number } => {
            format!("resolved {} (+{})", phone_token, number.calling_code)
        }
        Outcome::NotFound { reason, .. } => format!("not found ({})", reason),
    }
}
