//! Placeholder image generation.
//!
//! Nothing here synthesizes an image from text. A prompt is reduced to a
//! color and a filesystem-safe name, a 1×1 PNG is written to the image
//! directory, and the caller gets back the URL path it is served under.
//!
//! # Components
//!
//! - [`prompt_color`] / [`sanitize_prompt`]: pure functions of the prompt
//! - [`ImageRenderer`]: encodes the bytes ([`PlaceholderRenderer`] by default)
//! - [`ImageStore`]: writes files and enforces the retention limit

mod prompt;
mod renderer;
mod store;

pub use prompt::{image_filename, prompt_color, sanitize_prompt, Color, MAX_SANITIZED_LEN};
pub use renderer::{ImageRenderer, PlaceholderRenderer, SolidColorRenderer, PLACEHOLDER_PNG};
pub use store::{GeneratedImage, ImageStore, DEFAULT_MAX_IMAGES, IMAGES_URL_PREFIX};
