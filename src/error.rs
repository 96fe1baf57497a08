//! Per-frame failures

use thiserror::Error;

/// Why a frame was skipped. Never fatal: the loop moves on to the next frame
/// and the controller is not touched.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame acquisition failed: {0:#}")]
    Acquisition(anyhow::Error),
    #[error("frame decode failed: {0:#}")]
    Decode(anyhow::Error),
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
}
