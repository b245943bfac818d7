//! Process-wide image cache.
//!
//! Sources are file paths or `data:` URLs. The first request for a source
//! spawns a loader thread; every later request shares the same slot. Results
//! stay cached for the life of the process unless evicted explicitly.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::thread;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::Mutex;
use tiny_skia::{ColorU8, Pixmap};

#[derive(Clone)]
pub enum ImageState {
    Loading,
    Ready(Arc<Pixmap>),
    Failed(String),
}

impl fmt::Debug for ImageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageState::Loading => f.write_str("Loading"),
            ImageState::Ready(p) => write!(f, "Ready({}x{})", p.width(), p.height()),
            ImageState::Failed(e) => write!(f, "Failed({e})"),
        }
    }
}

/// Shared load state of one source.
pub struct ImageSlot {
    source: String,
    state: Mutex<ImageState>,
}

impl ImageSlot {
    fn new(source: &str, state: ImageState) -> Self {
        Self {
            source: source.to_string(),
            state: Mutex::new(state),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> ImageState {
        self.state.lock().clone()
    }

    fn settle(&self, state: ImageState) {
        *self.state.lock() = state;
    }
}

impl fmt::Debug for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSlot")
            .field("source", &self.source)
            .field("state", &*self.state.lock())
            .finish()
    }
}

#[derive(Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, Arc<ImageSlot>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ImageCache {
        static CACHE: OnceLock<ImageCache> = OnceLock::new();
        CACHE.get_or_init(ImageCache::new)
    }

    /// Returns the slot for `source`, starting a background load on first use.
    pub fn request(&self, source: &str) -> Arc<ImageSlot> {
        let mut entries = self.entries.lock();
        if let Some(slot) = entries.get(source) {
            return Arc::clone(slot);
        }

        let slot = Arc::new(ImageSlot::new(source, ImageState::Loading));
        entries.insert(source.to_string(), Arc::clone(&slot));
        drop(entries);

        tracing::debug!("Loading image {}", display_source(source));
        let worker = Arc::clone(&slot);
        let spawned = thread::Builder::new()
            .name("inkframe-image".into())
            .spawn(move || {
                let state = match load_source(&worker.source) {
                    Ok(pixmap) => ImageState::Ready(Arc::new(pixmap)),
                    Err(e) => ImageState::Failed(e),
                };
                worker.settle(state);
            });
        if let Err(e) = spawned {
            slot.settle(ImageState::Failed(format!("failed to spawn loader: {e}")));
        }
        slot
    }

    /// Decodes `bytes` synchronously and stores the result under `source`.
    pub fn insert_encoded(&self, source: &str, bytes: &[u8]) -> Result<(), String> {
        let pixmap = decode(bytes)?;
        self.store(source, ImageState::Ready(Arc::new(pixmap)));
        Ok(())
    }

    /// Stores straight (non-premultiplied) RGBA8 pixels under `source`.
    pub fn insert_rgba(
        &self,
        source: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), String> {
        let pixmap = pixmap_from_rgba(width, height, rgba)?;
        self.store(source, ImageState::Ready(Arc::new(pixmap)));
        Ok(())
    }

    pub fn evict(&self, source: &str) -> bool {
        self.entries.lock().remove(source).is_some()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.lock().contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self, source: &str, state: ImageState) {
        let mut entries = self.entries.lock();
        match entries.get(source) {
            // Layers already holding the slot see the new state.
            Some(slot) => slot.settle(state),
            None => {
                entries.insert(source.to_string(), Arc::new(ImageSlot::new(source, state)));
            }
        }
    }
}

fn display_source(source: &str) -> &str {
    if source.starts_with("data:") {
        "<data url>"
    } else {
        source
    }
}

fn load_source(source: &str) -> Result<Pixmap, String> {
    if let Some(rest) = source.strip_prefix("data:") {
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| "malformed data url".to_string())?;
        if !meta.ends_with(";base64") {
            return Err("only base64 data urls are supported".into());
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("invalid base64 payload: {e}"))?;
        return decode(&bytes);
    }

    let path = Path::new(source);
    let image = image::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let rgba = image.to_rgba8();
    pixmap_from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
}

fn decode(bytes: &[u8]) -> Result<Pixmap, String> {
    let image = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let rgba = image.to_rgba8();
    pixmap_from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
}

pub(crate) fn pixmap_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Pixmap, String> {
    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| format!("invalid image size {width}x{height}"))?;
    if rgba.len() != pixmap.pixels().len() * 4 {
        return Err(format!(
            "expected {} bytes of rgba data, got {}",
            pixmap.pixels().len() * 4,
            rgba.len()
        ));
    }
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}
