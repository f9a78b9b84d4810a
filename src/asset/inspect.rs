//! Local image inspection.
//!
//! Sniffs a metadata image file's format from its content and records what
//! the head renderer needs: MIME type, dimensions and `sizes`.

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use super::mime;
use crate::debug;
use crate::metadata::{MetadataError, MetadataImage};

/// Static asset family a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetFamily {
    Icon,
    Apple,
    OpenGraph,
    Twitter,
}

impl AssetFamily {
    /// Icons advertise `sizes`; card images advertise `width`/`height` only.
    fn is_icon(self) -> bool {
        matches!(self, Self::Icon | Self::Apple)
    }

    fn accepts_raster(self, format: ImageFormat) -> bool {
        match self {
            Self::Icon => matches!(
                format,
                ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP | ImageFormat::Ico
            ),
            Self::Apple => matches!(format, ImageFormat::Png | ImageFormat::Jpeg),
            Self::OpenGraph | Self::Twitter => matches!(
                format,
                ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP
            ),
        }
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Icon => "icon",
            Self::Apple => "apple-icon",
            Self::OpenGraph => "opengraph-image",
            Self::Twitter => "twitter-image",
        })
    }
}

/// Inspect `path` and describe it as an asset served at `url`.
///
/// Blocking: reads and partially decodes the file.
pub fn inspect_image(
    path: &Path,
    url: impl Into<String>,
    family: AssetFamily,
) -> Result<MetadataImage, MetadataError> {
    let bytes = fs::read(path).map_err(|e| MetadataError::AssetIo(path.to_owned(), e))?;
    let invalid = |reason: String| MetadataError::InvalidImageFormat {
        path: path.to_owned(),
        reason,
    };

    let mut descriptor = MetadataImage::new(url);
    if looks_like_svg(&bytes) {
        if family != AssetFamily::Icon {
            return Err(invalid(format!("svg is not supported for {family}")));
        }
        descriptor.mime = Some(mime::types::SVG.to_owned());
        descriptor.sizes = Some("any".to_owned());
        debug!("asset"; "{} svg {}", family, path.display());
        return Ok(descriptor);
    }

    let format = image::guess_format(&bytes).map_err(|e| invalid(e.to_string()))?;
    if !family.accepts_raster(format) {
        return Err(invalid(format!("{format:?} is not supported for {family}")));
    }
    descriptor.mime = mime::from_format(format).map(str::to_owned);

    if format == ImageFormat::Ico {
        descriptor.sizes = Some("any".to_owned());
        debug!("asset"; "{} ico {}", family, path.display());
        return Ok(descriptor);
    }

    let (width, height) = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
        .into_dimensions()
        .map_err(|e| invalid(e.to_string()))?;
    descriptor.width = Some(width);
    descriptor.height = Some(height);
    if family.is_icon() {
        descriptor.sizes = Some(format!("{width}x{height}"));
    }

    debug!("asset"; "{} {}x{} {}", family, width, height, path.display());
    Ok(descriptor)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use tempfile::TempDir;

    const SVG: &str = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"></svg>"#;

    fn png(dir: &TempDir, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        RgbaImage::new(width, height).save(&path).unwrap();
        path
    }

    #[test]
    fn test_png_icon_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = png(&dir, "icon.png", 32, 16);

        let image = inspect_image(&path, "/icon.png", AssetFamily::Icon).unwrap();
        assert_eq!(image.url, "/icon.png");
        assert_eq!(image.mime.as_deref(), Some("image/png"));
        assert_eq!((image.width, image.height), (Some(32), Some(16)));
        assert_eq!(image.sizes.as_deref(), Some("32x16"));
    }

    #[test]
    fn test_card_image_has_no_sizes() {
        let dir = TempDir::new().unwrap();
        let path = png(&dir, "opengraph-image.png", 120, 63);

        let image = inspect_image(&path, "/og.png", AssetFamily::OpenGraph).unwrap();
        assert_eq!(image.width, Some(120));
        assert!(image.sizes.is_none());
    }

    #[test]
    fn test_format_sniffed_from_content() {
        let dir = TempDir::new().unwrap();
        let path = png(&dir, "real.png", 8, 8);
        let renamed = dir.path().join("icon.jpg");
        fs::rename(&path, &renamed).unwrap();

        let image = inspect_image(&renamed, "/icon.jpg", AssetFamily::Apple).unwrap();
        assert_eq!(image.mime.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_svg_icon_is_any_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.svg");
        fs::write(&path, SVG).unwrap();

        let image = inspect_image(&path, "/icon.svg", AssetFamily::Icon).unwrap();
        assert_eq!(image.mime.as_deref(), Some("image/svg+xml"));
        assert_eq!(image.sizes.as_deref(), Some("any"));
        assert!(image.width.is_none());
    }

    #[test]
    fn test_svg_rejected_for_apple_icon() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apple-icon.svg");
        fs::write(&path, SVG).unwrap();

        let err = inspect_image(&path, "/apple-icon.svg", AssetFamily::Apple).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidImageFormat { .. }));
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = inspect_image(&path, "/icon.png", AssetFamily::Icon).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidImageFormat { .. }));
        assert!(err.to_string().contains("icon.png"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = inspect_image(&dir.path().join("nope.png"), "/nope.png", AssetFamily::Icon)
            .unwrap_err();
        assert!(matches!(err, MetadataError::AssetIo(..)));
    }
}
