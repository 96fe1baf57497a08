//! Birdwatch Computer Vision Library
//!
//! Frame decoding, detector output decoding and the per-frame detection filter.

pub mod collection;
pub mod detection;
pub mod frame;
pub mod utils;

// Re-export commonly used types
pub use collection::{DetectionCollection, DetectionStats};
pub use detection::{ClassNames, DetectionFilter, FilterConfig, RawCandidate};
pub use frame::Frame;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;

    /// Black-box object detector: one frame in, raw candidate rows out.
    ///
    /// Rows follow the layout described in [`crate::detection::raw`].
    pub trait ObjectDetector {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Vec<f32>>>;
    }

    impl<D: ObjectDetector + ?Sized> ObjectDetector for Box<D> {
        fn detect(&mut self, frame: &Frame) -> Result<Vec<Vec<f32>>> {
            (**self).detect(frame)
        }
    }
}
