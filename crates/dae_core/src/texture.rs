//! Image id to texture path resolution.
//!
//! Texture files are not decoded here; the factory receives a path that is
//! known to exist and loads it however the engine prefers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::dom::Document;
use crate::factory::SceneFactory;
use crate::url::resolve_relative;

/// Per-document cache of resolved texture paths.
///
/// Misses are cached as `None` so a missing file is reported once.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, Option<PathBuf>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `image_id` against `document`, which was loaded from `document_path`.
    pub fn resolve<F: SceneFactory>(
        &mut self,
        document: &Document,
        document_path: &Path,
        image_id: &str,
        factory: &mut F,
    ) -> Option<PathBuf> {
        if image_id.is_empty() {
            return None;
        }

        if let Some(cached) = self.entries.get(image_id) {
            log::debug!("Texture cache hit: {}", image_id);
            return cached.clone();
        }

        let resolved = match document.image(image_id) {
            Some(image) => image.init_from.as_deref().and_then(|uri| {
                let path = resolve_relative(document_path, uri);
                if path.exists() {
                    Some(path)
                } else {
                    factory.log_error(
                        "TextureCache",
                        &format!("Image not found: {}", path.display()),
                    );
                    None
                }
            }),
            None => {
                log::warn!("Image '{}' is not in the image library", image_id);
                None
            }
        };

        self.entries.insert(image_id.to_string(), resolved.clone());
        resolved
    }

    /// Number of cached entries, hits and misses alike.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
