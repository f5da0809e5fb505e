//! Image byte rendering.
//!
//! Rendering is kept apart from color derivation: the default renderer ignores
//! the color and always emits the same 1×1 PNG, while [`SolidColorRenderer`]
//! actually paints the pixel.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};

use super::prompt::Color;
use crate::error::ImageError;

/// Fixed 1×1 RGBA PNG written by [`PlaceholderRenderer`].
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0xFC, 0xCF, 0xC0, 0xF0,
    0x1F, 0x00, 0x05, 0x05, 0x02, 0x00, 0x5F, 0xC8, 0xF1, 0xD2, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Turns a prompt color into encoded image bytes.
pub trait ImageRenderer: Send + Sync {
    /// Encode an image for `color`.
    fn render(&self, color: Color) -> Result<Bytes, ImageError>;
}

/// Renderer that always returns [`PLACEHOLDER_PNG`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl ImageRenderer for PlaceholderRenderer {
    fn render(&self, _color: Color) -> Result<Bytes, ImageError> {
        Ok(Bytes::from_static(PLACEHOLDER_PNG))
    }
}

/// Renderer producing a 1×1 PNG filled with the prompt color.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidColorRenderer;

impl ImageRenderer for SolidColorRenderer {
    fn render(&self, color: Color) -> Result<Bytes, ImageError> {
        let img = RgbImage::from_pixel(1, 1, Rgb(color.rgb()));

        let mut output = Vec::new();
        img.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
            .map_err(|e| ImageError::Encode {
                message: e.to_string(),
            })?;

        Ok(Bytes::from(output))
    }
}
