//! Client for the remote inference service
//!
//! The service answers with `{"outputs": [[row, ...], ...]}`: one list of rows per
//! output layer. Values that are not numbers turn into NaN so the filter drops the
//! row instead of the whole frame failing.

use crate::config::{timeout, DetectorConfig, DetectorPayload};
use anyhow::{Context, Result};
use birdwatch_cv::traits::ObjectDetector;
use birdwatch_cv::utils::ImageUtils;
use birdwatch_cv::Frame;
use reqwest::blocking::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

pub struct HttpDetector {
    client: reqwest::blocking::Client,
    url: String,
    payload: DetectorPayload,
    input_size: u32,
}

impl HttpDetector {
    pub fn new(config: &DetectorConfig, input_size: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout(config.timeout))
            .build()
            .context("Failed to build detector HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            payload: config.payload,
            input_size,
        })
    }

    fn body(&self, frame: &Frame) -> (&'static str, Vec<u8>) {
        match self.payload {
            DetectorPayload::Jpeg => ("image/jpeg", frame.encoded.clone()),
            DetectorPayload::Blob => {
                let blob = ImageUtils::to_blob(&frame.image, self.input_size);
                let bytes = blob.iter().flat_map(|v| v.to_le_bytes()).collect();
                ("application/octet-stream", bytes)
            }
        }
    }

    fn request(&self, frame: &Frame) -> RequestBuilder {
        let (content_type, body) = self.body(frame);

        self.client
            .post(&self.url)
            .query(&[("size", self.input_size)])
            .header(CONTENT_TYPE, content_type)
            .body(body)
    }
}

impl ObjectDetector for HttpDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Vec<f32>>> {
        let text = self
            .request(frame)
            .send()
            .with_context(|| format!("Failed to reach detector at {}", self.url))?
            .error_for_status()
            .context("Detector returned an error status")?
            .text()
            .context("Failed to read detector response")?;

        let rows = parse_outputs(&text)?;
        debug!("detector returned {} candidate rows", rows.len());
        Ok(rows)
    }
}

/// Flatten the per-layer outputs into one list of rows
pub fn parse_outputs(text: &str) -> Result<Vec<Vec<f32>>> {
    let value: Value = serde_json::from_str(text).context("Detector response is not JSON")?;
    let layers = value
        .get("outputs")
        .and_then(Value::as_array)
        .context("Detector response has no \"outputs\" array")?;

    let rows = layers
        .iter()
        .filter_map(Value::as_array)
        .flatten()
        .map(|row| match row.as_array() {
            Some(values) => values
                .iter()
                .map(|v| v.as_f64().map_or(f32::NAN, |f| f as f32))
                .collect(),
            None => Vec::new(),
        })
        .collect();

    Ok(rows)
}
