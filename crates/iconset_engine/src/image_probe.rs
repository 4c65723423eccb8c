use std::io::Cursor;

use image::ImageReader;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageProbeError {
    #[error("unrecognised image format")]
    UnknownFormat,
    #[error("failed to read image header: {0}")]
    Header(String),
}

/// Reads pixel dimensions from raw image bytes.
pub trait ImageDecoder: Send + Sync {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImageProbeError>;
}

/// Decoder backed by the `image` crate; only the header is parsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderImageDecoder;

impl ImageDecoder for HeaderImageDecoder {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32), ImageProbeError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| ImageProbeError::Header(err.to_string()))?;
        if reader.format().is_none() {
            return Err(ImageProbeError::UnknownFormat);
        }
        reader
            .into_dimensions()
            .map_err(|err| ImageProbeError::Header(err.to_string()))
    }
}

/// Effective width of a raster icon: the shorter side when not square.
pub fn effective_width(width: u32, height: u32) -> u32 {
    width.min(height)
}
