//! Configuration for the intake layer that feeds images into the pipeline.
//!
//! The pipeline stages themselves take no configuration: decode, extract and
//! resolve are pure functions of their input. Everything that varies per
//! deployment (which file types an upload may have, where uploads are
//! materialised, how long a download may take) lives in [`IntakeConfig`],
//! which callers build once and pass explicitly to the entry points in
//! [`crate::scan`].

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default filename whitelist for uploads.
pub const DEFAULT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Intake configuration.
///
/// Built via [`IntakeConfig::builder()`] or using [`IntakeConfig::default()`].
///
/// # Example
/// ```rust
/// use qrphone::IntakeConfig;
///
/// let config = IntakeConfig::builder()
///     .allowed_extensions(["png", "webp"])
///     .download_timeout_secs(10)
///     .build()
///     .unwrap();
/// assert!(config.allowed_extensions.contains(&"webp".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Lower-case file extensions (without the dot) an upload may carry.
    /// Default: `png`, `jpg`, `jpeg`.
    pub allowed_extensions: Vec<String>,

    /// Directory uploads are written to before decoding. Created on first
    /// use. `None` uses the system temp directory. Default: `None`.
    ///
    /// Files written here live only for the duration of one scan.
    pub upload_dir: Option<PathBuf>,

    /// Maximum accepted upload size in bytes. Default: 20 MiB.
    pub max_upload_bytes: usize,

    /// Download timeout for URL inputs in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Upper bound on the decode/extract/resolve chain when driven through
    /// the async entry points. `None` disables the bound. Default: `None`.
    pub decode_timeout_secs: Option<u64>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            upload_dir: None,
            max_upload_bytes: 20 * 1024 * 1024,
            download_timeout_secs: 30,
            decode_timeout_secs: None,
        }
    }
}

impl IntakeConfig {
    /// Create a new builder for `IntakeConfig`.
    pub fn builder() -> IntakeConfigBuilder {
        IntakeConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether `ext` (any case, no dot) is in the whitelist.
    pub fn allows_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|e| *e == ext)
    }
}

/// Builder for [`IntakeConfig`].
#[derive(Debug)]
pub struct IntakeConfigBuilder {
    config: IntakeConfig,
}

impl IntakeConfigBuilder {
    /// Replace the extension whitelist. Entries are lower-cased and a
    /// leading dot is tolerated (`".PNG"` becomes `"png"`).
    pub fn allowed_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts: Vec<String> = exts
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        exts.sort_unstable();
        exts.dedup();
        self.config.allowed_extensions = exts;
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = Some(dir.into());
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn decode_timeout_secs(mut self, secs: u64) -> Self {
        self.config.decode_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IntakeConfig, ScanError> {
        let c = &self.config;
        if c.allowed_extensions.is_empty() || c.allowed_extensions.iter().any(|e| e.is_empty()) {
            return Err(ScanError::InvalidConfig(
                "At least one non-empty file extension must be allowed".into(),
            ));
        }
        if let Some(bad) = c.allowed_extensions.iter().find(|e| e.contains('.')) {
            return Err(ScanError::InvalidConfig(format!(
                "Extension '{bad}' must not contain '.'"
            )));
        }
        if c.max_upload_bytes == 0 {
            return Err(ScanError::InvalidConfig(
                "Upload size limit must be ≥ 1 byte".into(),
            ));
        }
        if c.download_timeout_secs == 0 {
            return Err(ScanError::InvalidConfig(
                "Download timeout must be ≥ 1s".into(),
            ));
        }
        if c.decode_timeout_secs == Some(0) {
            return Err(ScanError::InvalidConfig(
                "Decode timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_whitelist_matches_common_image_types() {
        let c = IntakeConfig::default();
        assert!(c.allows_extension("png"));
        assert!(c.allows_extension("JPG"));
        assert!(c.allows_extension("jpeg"));
        assert!(!c.allows_extension("gif"));
    }

    #[test]
    fn builder_normalises_extensions() {
        let c = IntakeConfig::builder()
            .allowed_extensions([".PNG", "png", " Jpg "])
            .build()
            .unwrap();
        assert_eq!(c.allowed_extensions, vec!["jpg", "png"]);
    }

    #[test]
    fn builder_rejects_empty_whitelist() {
        let err = IntakeConfig::builder()
            .allowed_extensions(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_dotted_extension() {
        let err = IntakeConfig::builder()
            .allowed_extensions(["tar.gz"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("tar.gz"));
    }

    #[test]
    fn builder_rejects_zero_timeouts() {
        assert!(IntakeConfig::builder()
            .download_timeout_secs(0)
            .build()
            .is_err());
        assert!(IntakeConfig::builder()
            .decode_timeout_secs(0)
            .build()
            .is_err());
        assert!(IntakeConfig::builder().max_upload_bytes(0).build().is_err());
    }

    #[test]
    fn config_roundtrips_through_json() {
        let c = IntakeConfig::builder()
            .upload_dir("/tmp/uploads")
            .decode_timeout_secs(5)
            .build()
            .unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: IntakeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
