//! Image MIME types.

use std::path::Path;

use image::ImageFormat;

pub mod types {
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
}

/// Guess the MIME type of an image from its file extension.
pub fn from_path(path: &Path) -> Option<&'static str> {
    from_extension(path.extension().and_then(|e| e.to_str()))
}

/// Guess the MIME type of an image from an extension string.
pub fn from_extension(ext: Option<&str>) -> Option<&'static str> {
    let ext = ext?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "svg" => types::SVG,
        "ico" => types::ICO,
        "bmp" => types::BMP,
        _ => return None,
    })
}

/// MIME type of a decoded raster format.
pub fn from_format(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some(types::PNG),
        ImageFormat::Jpeg => Some(types::JPEG),
        ImageFormat::Gif => Some(types::GIF),
        ImageFormat::WebP => Some(types::WEBP),
        ImageFormat::Avif => Some(types::AVIF),
        ImageFormat::Ico => Some(types::ICO),
        ImageFormat::Bmp => Some(types::BMP),
        _ => None,
    }
}
