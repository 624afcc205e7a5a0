use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::QrCode;

#[derive(Debug)]
pub struct QrError {
    pub message: String,
}

impl std::fmt::Display for QrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for QrError {
    fn from(s: String) -> Self {
        QrError { message: s }
    }
}

/// Turns a text payload into a PNG image of its QR code.
pub trait QrEncoder: Send + Sync {
    fn encode_png(&self, payload: &str) -> Result<Vec<u8>, QrError>;
}

pub struct PngQrEncoder {
    min_size: u32,
}

impl PngQrEncoder {
    pub fn new(min_size: u32) -> Self {
        Self { min_size }
    }
}

impl Default for PngQrEncoder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode_png(&self, payload: &str) -> Result<Vec<u8>, QrError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| QrError::from(format!("QR encoding failed: {e}")))?;

        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.min_size, self.min_size)
            .build();

        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| QrError::from(format!("PNG encoding failed: {e}")))?;

        Ok(png.into_inner())
    }
}
