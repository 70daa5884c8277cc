//! Input resolution: normalise a user-supplied path or URL to a local image.
//!
//! The decoder sniffs the real format from content and never looks at the
//! filename. The extension whitelist is checked here, before any bytes are
//! read, and applies to local paths and downloaded URLs alike.
//!
//! Downloads land in a `TempDir` owned by [`ResolvedInput`]; the file is
//! removed when the value is dropped.

use crate::config::IntakeConfig;
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input: either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; image downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until decoding completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the image file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Whether `filename` carries a whitelisted extension.
///
/// The name must contain a `.`; the text after the last one is compared
/// case-insensitively. `"archive.tar.png"` is allowed, `"png"` is not.
pub fn is_allowed_file(filename: &str, config: &IntakeConfig) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => config.allows_extension(ext),
        None => false,
    }
}

/// Resolve the input string to a local image file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(
    input: &str,
    config: &IntakeConfig,
) -> Result<ResolvedInput, ScanError> {
    if input.trim().is_empty() {
        return Err(ScanError::NoFileSelected);
    }
    if is_url(input) {
        download_url(input, config).await
    } else {
        resolve_local(input, config)
    }
}

/// Resolve a local file path, validating existence, permission and extension.
fn resolve_local(path_str: &str, config: &IntakeConfig) -> Result<ResolvedInput, ScanError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(ScanError::FileNotFound { path });
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_allowed_file(&filename, config) {
        return Err(ScanError::UnsupportedFormat { filename });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ScanError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ScanError::FileNotFound { path });
        }
    }

    debug!("Resolved local image: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, config: &IntakeConfig) -> Result<ResolvedInput, ScanError> {
    let timeout_secs = config.download_timeout_secs;
    let filename = extract_filename(url).ok_or_else(|| ScanError::InvalidInput {
        input: url.to_string(),
        reason: "URL path does not end in a file name".into(),
    })?;
    if !is_allowed_file(&filename, config) {
        return Err(ScanError::UnsupportedFormat { filename });
    }

    info!("Downloading image from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ScanError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ScanError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ScanError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ScanError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ScanError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() > config.max_upload_bytes {
        return Err(ScanError::InvalidInput {
            input: url.to_string(),
            reason: format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                config.max_upload_bytes
            ),
        });
    }

    let temp_dir = TempDir::new().map_err(|e| ScanError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| ScanError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last non-empty path segment of the URL, if it looks like a file name.
fn extract_filename(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() || !last.contains('.') {
        return None;
    }
    Some(last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/qr.png"));
        assert!(is_url("http://example.com/qr.png"));
        assert!(!is_url("/tmp/qr.png"));
        assert!(!is_url("qr.png"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_is_allowed_file() {
        let config = IntakeConfig::default();
        assert!(is_allowed_file("qr.png", &config));
        assert!(is_allowed_file("QR.JPEG", &config));
        assert!(is_allowed_file("scan.final.jpg", &config));
        assert!(!is_allowed_file("qr.gif", &config));
        assert!(!is_allowed_file("png", &config));
        assert!(!is_allowed_file("qr.", &config));
        assert!(!is_allowed_file("", &config));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename("https://example.com/codes/contact.png?x=1").as_deref(),
            Some("contact.png")
        );
        assert_eq!(extract_filename("https://example.com/codes/"), None);
        assert_eq!(extract_filename("https://example.com/download"), None);
    }

    #[tokio::test]
    async fn test_resolve_missing_local_file() {
        let err = resolve_input("/nonexistent/qr.png", &IntakeConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_rejects_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = resolve_input(path.to_str().unwrap(), &IntakeConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_resolve_empty_input() {
        let err = resolve_input("  ", &IntakeConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::NoFileSelected));
    }

    #[tokio::test]
    async fn test_url_with_disallowed_extension_is_rejected_before_download() {
        let err = resolve_input("https://example.invalid/file.pdf", &IntakeConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::UnsupportedFormat { .. }));
    }
}
