//! Per-frame detection collections and non-maximum suppression
//!
//! Core abstraction for holding and pruning the detections of a single frame.

use crate::utils::nms::greedy_nms;
use birdwatch_core::{BBox, Detection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collection of detections with batch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionCollection {
    detections: Vec<Detection>,
}

impl DetectionCollection {
    /// Create new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vector of detections
    pub fn from_vec(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Add a detection to the collection
    pub fn push(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    /// Extend with another collection
    pub fn extend(&mut self, other: DetectionCollection) {
        self.detections.extend(other.detections);
    }

    /// Get detections as slice
    pub fn as_slice(&self) -> &[Detection] {
        &self.detections
    }

    /// Get number of detections
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// True if any detection carries `label`
    pub fn contains_label(&self, label: &str) -> bool {
        self.detections.iter().any(|d| d.is(label))
    }

    /// Sort by confidence (descending), ties keep their current order
    pub fn sort_by_confidence(&mut self) {
        self.detections
            .sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    }

    /// Keep detections scoring strictly above `threshold`
    pub fn filter_by_confidence(mut self, threshold: f32) -> Self {
        self.detections.retain(|d| d.confidence > threshold);
        self
    }

    /// Apply class-agnostic non-maximum suppression.
    ///
    /// The result is ordered by descending confidence.
    pub fn apply_nms(self, threshold: f32) -> Self {
        if self.detections.is_empty() {
            return self;
        }

        let boxes: Vec<BBox> = self.detections.iter().map(|d| d.bbox).collect();
        let scores: Vec<f32> = self.detections.iter().map(|d| d.confidence).collect();
        let keep = greedy_nms(&boxes, &scores, threshold);

        let mut slots: Vec<Option<Detection>> = self.detections.into_iter().map(Some).collect();
        keep.into_iter()
            .filter_map(|i| slots[i].take())
            .collect()
    }

    /// Apply class-aware NMS (NMS within each label)
    pub fn apply_class_nms(self, threshold: f32) -> Self {
        let mut label_groups: BTreeMap<String, Vec<Detection>> = BTreeMap::new();

        // Group by label
        for detection in self.detections {
            label_groups
                .entry(detection.label.clone())
                .or_default()
                .push(detection);
        }

        // Apply NMS to each label separately
        let mut result = DetectionCollection::new();
        for (_, detections) in label_groups {
            result.extend(DetectionCollection::from_vec(detections).apply_nms(threshold));
        }

        result.sort_by_confidence();
        result
    }

    /// Get statistics
    pub fn stats(&self) -> DetectionStats {
        let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_confidence = 0.0;
        let mut max_confidence: f32 = 0.0;
        let mut min_confidence = f32::INFINITY;

        for detection in &self.detections {
            *label_counts.entry(detection.label.clone()).or_insert(0) += 1;
            total_confidence += detection.confidence;
            max_confidence = max_confidence.max(detection.confidence);
            min_confidence = min_confidence.min(detection.confidence);
        }

        let avg_confidence = if self.detections.is_empty() {
            0.0
        } else {
            total_confidence / self.detections.len() as f32
        };

        DetectionStats {
            total_detections: self.detections.len(),
            label_counts,
            avg_confidence,
            max_confidence,
            min_confidence: if min_confidence == f32::INFINITY { 0.0 } else { min_confidence },
        }
    }

    /// Convert to iterator
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }
}

impl IntoIterator for DetectionCollection {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.into_iter()
    }
}

impl FromIterator<Detection> for DetectionCollection {
    fn from_iter<T: IntoIterator<Item = Detection>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Statistics about a collection of detections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionStats {
    pub total_detections: usize,
    pub label_counts: BTreeMap<String, usize>,
    pub avg_confidence: f32,
    pub max_confidence: f32,
    pub min_confidence: f32,
}
