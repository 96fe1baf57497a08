//! Network camera frame source

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Produces encoded frames (JPEG bytes)
pub trait FrameSource {
    fn fetch(&mut self) -> Result<Vec<u8>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn fetch(&mut self) -> Result<Vec<u8>> {
        (**self).fetch()
    }
}

/// Pulls still frames from the robot's HTTP snapshot endpoint
pub struct HttpCamera {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpCamera {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build camera HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FrameSource for HttpCamera {
    fn fetch(&mut self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("Failed to fetch frame from {}", self.url))?
            .error_for_status()
            .context("Camera returned an error status")?;

        let bytes = response.bytes().context("Failed to read frame body")?;
        debug!("fetched {} byte frame", bytes.len());
        Ok(bytes.to_vec())
    }
}
