//! Prompt-derived values: color and filename.
//!
//! Both are computed over the UTF-16 code units of the prompt, so a character
//! outside the Basic Multilingual Plane counts as two units.

use std::fmt;

/// Modulus used to reduce the code-unit sum to a 24-bit color.
const COLOR_MODULUS: u64 = 0xFF_FFFF;

/// Maximum length of the sanitized prompt component of a filename.
pub const MAX_SANITIZED_LEN: usize = 50;

/// A 24-bit RGB color derived from a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Create a color from a packed `0xRRGGBB` value.
    pub fn from_u32(value: u32) -> Self {
        Self(value & 0xFF_FFFF)
    }

    /// The packed `0xRRGGBB` value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Six lowercase hex digits, zero padded.
    pub fn to_hex(&self) -> String {
        format!("{:06x}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Derive a color from a prompt by summing its UTF-16 code units.
pub fn prompt_color(prompt: &str) -> Color {
    let sum: u64 = prompt.encode_utf16().map(u64::from).sum();
    Color::from_u32((sum % COLOR_MODULUS) as u32)
}

/// Replace every non-alphanumeric code unit with `_` and truncate to 50 units.
///
/// The result is pure ASCII, so it is safe to embed in a filename.
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .encode_utf16()
        .take(MAX_SANITIZED_LEN)
        .map(|unit| match u8::try_from(unit) {
            Ok(b) if b.is_ascii_alphanumeric() => b as char,
            _ => '_',
        })
        .collect()
}

/// Build `<timestamp>_<sanitized>.png`.
pub fn image_filename(timestamp_millis: u64, sanitized: &str) -> String {
    format!("{}_{}.png", timestamp_millis, sanitized)
}
