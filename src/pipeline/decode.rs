//! QR decoding: locate one QR symbol in a raster image and read its payload.
//!
//! ## Why luminance only?
//!
//! QR geometry is defined by dark/light contrast; colour carries no
//! information and only triples the pixel data the detector has to walk.
//! Every image is therefore flattened to 8-bit luma before it reaches
//! `rqrr`.
//!
//! ## First symbol wins
//!
//! Images carrying several symbols are not supported. Grids are tried in
//! detection order and the first one that decodes is the result; later
//! grids are ignored. A symbol that is found but fails its checksum is
//! treated exactly like no symbol at all.

use crate::error::ScanError;
use image::{DynamicImage, GrayImage};
use rqrr::PreparedImage;
use std::path::Path;
use tracing::debug;

/// Decodable pixel data, owned by the caller and read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    luma: GrayImage,
}

impl ImageHandle {
    /// Wrap an already-decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            luma: image.into_luma8(),
        }
    }

    /// Wrap a luminance buffer without conversion.
    pub fn from_luma(luma: GrayImage) -> Self {
        Self { luma }
    }

    /// Decode an encoded image (PNG, JPEG) held in memory.
    pub fn from_bytes(bytes: &[u8], source_name: &str) -> Result<Self, ScanError> {
        let image = image::load_from_memory(bytes).map_err(|e| ScanError::ImageLoad {
            source_name: source_name.to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self::from_image(image))
    }

    /// Open and decode an image file. The format is sniffed from content,
    /// not trusted from the extension.
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let reader = image::ImageReader::open(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    ScanError::PermissionDenied {
                        path: path.to_path_buf(),
                    }
                } else {
                    ScanError::FileNotFound {
                        path: path.to_path_buf(),
                    }
                }
            })?
            .with_guessed_format()
            .map_err(|e| ScanError::ImageLoad {
                source_name: path.display().to_string(),
                detail: e.to_string(),
            })?;

        let image = reader.decode().map_err(|e| ScanError::ImageLoad {
            source_name: path.display().to_string(),
            detail: e.to_string(),
        })?;

        debug!(
            "Loaded {} → {}x{} px",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(image))
    }

    pub fn width(&self) -> u32 {
        self.luma.width()
    }

    pub fn height(&self) -> u32 {
        self.luma.height()
    }

    pub fn luma(&self) -> &GrayImage {
        &self.luma
    }
}

/// Locate and decode the first QR symbol in `image`.
///
/// Returns `None` when no symbol is found, when every symbol fails to
/// decode, or when the payload is empty.
pub fn decode(image: &ImageHandle) -> Option<String> {
    let luma = image.luma();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    if w == 0 || h == 0 {
        return None;
    }

    let mut prepared =
        PreparedImage::prepare_from_greyscale(w, h, |x, y| luma.get_pixel(x as u32, y as u32).0[0]);
    let grids = prepared.detect_grids();
    debug!("Detected {} QR grid(s) in {}x{} image", grids.len(), w, h);

    for (i, grid) in grids.iter().enumerate() {
        match grid.decode() {
            Ok((_meta, content)) => {
                if content.is_empty() {
                    debug!("Grid {} decoded to an empty payload", i);
                    return None;
                }
                debug!("Grid {} decoded: {} chars", i, content.chars().count());
                return Some(content);
            }
            Err(e) => debug!("Grid {} failed to decode: {:?}", i, e),
        }
    }

    None
}
