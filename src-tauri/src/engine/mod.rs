//! OCR engine domain.
//!
//! Defines the engine seam the rest of the app talks through, plus the
//! Tesseract backend behind it. External code should only use the types
//! and trait exported here.

mod tesseract;

pub use tesseract::TesseractEngine;

use std::path::Path;
use std::sync::Arc;

/// Pixel-space bounding box of a recognized span, origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    /// Smallest region covering both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = (self.left + self.width).max(other.left + other.width);
        let bottom = (self.top + self.height).max(other.top + other.height);
        Region {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// One recognized span: where it was, what it read, how confident.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OcrSpan {
    pub region: Region,
    pub text: String,
    pub confidence: f32,
}

/// Engine-side failures. These stay inside the engine/extraction layer;
/// the result pane only ever sees them stringified.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    #[error("could not load image: {0}")]
    ImageLoad(String),
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// The seam between the app and whichever OCR backend is installed.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier for logs.
    fn name(&self) -> &'static str;

    /// Recognize text in the image at `path`, returning spans in reading order.
    fn recognize(&self, path: &Path) -> Result<Vec<OcrSpan>, EngineError>;
}

/// Managed handle to the engine built at startup.
///
/// `None` records an initialization failure; every run checks it and bails
/// with the static unavailable message instead of retrying.
pub struct EngineState {
    engine: Option<Arc<dyn OcrEngine>>,
}

impl EngineState {
    /// Build the Tesseract backend once. A failure is logged and pinned for
    /// the lifetime of the process.
    pub fn initialize() -> Self {
        match TesseractEngine::new() {
            Ok(engine) => Self {
                engine: Some(Arc::new(engine)),
            },
            Err(e) => {
                log::error!("[OCR] Engine initialization failed: {}", e);
                Self { engine: None }
            }
        }
    }

    pub fn get(&self) -> Option<Arc<dyn OcrEngine>> {
        self.engine.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both_regions() {
        let a = Region {
            left: 10,
            top: 20,
            width: 30,
            height: 10,
        };
        let b = Region {
            left: 50,
            top: 15,
            width: 20,
            height: 10,
        };
        let u = a.union(&b);
        assert_eq!(u.left, 10);
        assert_eq!(u.top, 15);
        assert_eq!(u.width, 60); // 10..70
        assert_eq!(u.height, 15); // 15..30
    }

    #[test]
    fn union_with_contained_region_is_identity() {
        let outer = Region {
            left: 0,
            top: 0,
            width: 100,
            height: 100,
        };
        let inner = Region {
            left: 40,
            top: 40,
            width: 10,
            height: 10,
        };
        assert_eq!(outer.union(&inner), outer);
    }
}
