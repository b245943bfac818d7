use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::image_cache::{ImageCache, ImageSlot, ImageState};

/// Raster layer backed by the shared [`ImageCache`].
#[derive(Debug, Clone)]
pub struct ImageLayer {
    source: String,
    slot: Option<Arc<ImageSlot>>,
    raster: Option<Arc<Pixmap>>,
    settled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ImageOutcome {
    Loaded { width: u32, height: u32 },
    Failed(String),
}

impl ImageLayer {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            slot: None,
            raster: None,
            settled: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Decoded pixels, once loading finished.
    pub fn raster(&self) -> Option<&Pixmap> {
        self.raster.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.raster.is_some()
    }

    pub(crate) fn set_source(&mut self, source: String) {
        *self = Self::new(source);
    }

    pub(crate) fn resolve(&mut self, cache: &ImageCache) {
        if self.slot.is_none() {
            self.slot = Some(cache.request(&self.source));
        }
    }

    /// Reports the load result once; `None` while loading or after reporting.
    pub(crate) fn poll(&mut self, cache: &ImageCache) -> Option<ImageOutcome> {
        if self.settled {
            return None;
        }
        self.resolve(cache);
        let state = self.slot.as_ref()?.state();
        match state {
            ImageState::Loading => None,
            ImageState::Ready(pixmap) => {
                self.settled = true;
                let outcome = ImageOutcome::Loaded {
                    width: pixmap.width(),
                    height: pixmap.height(),
                };
                self.raster = Some(pixmap);
                Some(outcome)
            }
            ImageState::Failed(e) => {
                self.settled = true;
                Some(ImageOutcome::Failed(e))
            }
        }
    }
}
