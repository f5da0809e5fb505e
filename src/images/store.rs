//! Generated image storage with bounded retention.
//!
//! Each generation writes one file into the image directory. Files are opened
//! with `create_new`, so an existing image is never overwritten: when two
//! requests for the same prompt land in the same millisecond the later one
//! moves its timestamp forward until the name is free.
//!
//! Written files are tracked in an LRU index. Once the index is full, the
//! oldest tracked file is deleted from disk. Files that existed before the
//! store was created are not tracked and never deleted.

use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::prompt::{image_filename, prompt_color, sanitize_prompt, Color};
use super::renderer::ImageRenderer;
use crate::clock::SharedClock;
use crate::error::ImageError;

/// Default number of generated images kept on disk.
pub const DEFAULT_MAX_IMAGES: usize = 1000;

/// URL prefix under which the image directory is served.
pub const IMAGES_URL_PREFIX: &str = "/images";

/// Upper bound on timestamp bumps while looking for a free filename.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Path the image is served under, e.g. `/images/1700000000000_a_cat.png`
    pub url_path: String,

    /// Name of the file inside the image directory
    pub filename: String,

    /// Color derived from the prompt
    pub color: Color,
}

/// Writes generated images and enforces the retention limit.
pub struct ImageStore {
    dir: PathBuf,
    renderer: Arc<dyn ImageRenderer>,
    clock: SharedClock,
    retained: Mutex<LruCache<String, ()>>,
}

impl ImageStore {
    /// Create a store writing into `dir` and keeping at most `max_images` files.
    ///
    /// A `max_images` of zero is treated as one.
    pub fn new(
        dir: impl Into<PathBuf>,
        renderer: Arc<dyn ImageRenderer>,
        clock: SharedClock,
        max_images: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(max_images).unwrap_or(NonZeroUsize::MIN);
        Self {
            dir: dir.into(),
            renderer,
            clock,
            retained: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Directory images are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if it does not exist.
    pub async fn ensure_dir(&self) -> Result<(), ImageError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Number of files currently tracked for retention.
    pub async fn retained(&self) -> usize {
        self.retained.lock().await.len()
    }

    /// Render and store an image for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageError> {
        let color = prompt_color(prompt);
        let bytes = self.renderer.render(color)?;
        let sanitized = sanitize_prompt(prompt);

        // Held across the write so name allocation and eviction stay ordered
        let mut retained = self.retained.lock().await;

        let mut timestamp = self.clock.now_millis();
        let mut attempts = 0;
        let filename = loop {
            let candidate = image_filename(timestamp, &sanitized);
            match write_new(&self.dir.join(&candidate), &bytes).await {
                Ok(()) => break candidate,
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    timestamp += 1;
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        if let Some((evicted, ())) = retained.push(filename.clone(), ()) {
            if evicted != filename {
                self.remove(&evicted).await;
            }
        }

        debug!(filename = %filename, color = %color, "Stored generated image");

        Ok(GeneratedImage {
            url_path: format!("{}/{}", IMAGES_URL_PREFIX, filename),
            filename,
            color,
        })
    }

    async fn remove(&self, filename: &str) {
        match fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => debug!(filename = %filename, "Evicted generated image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(filename = %filename, "Failed to evict generated image: {}", e),
        }
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}
