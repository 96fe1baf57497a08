//! Turns raw detector rows into thresholded, suppressed detections

use super::classes::ClassNames;
use super::config::FilterConfig;
use super::raw::RawCandidate;
use crate::collection::DetectionCollection;
use crate::Result;
use birdwatch_core::Detection;
use tracing::debug;

/// Pure per-frame detection filter.
///
/// Output is ordered by descending confidence, ties in input order, so the same
/// rows always produce the same list. Malformed rows are skipped.
#[derive(Debug, Clone)]
pub struct DetectionFilter {
    config: FilterConfig,
    classes: ClassNames,
}

impl DetectionFilter {
    /// Create a filter, loading the class table named in the config if any
    pub fn new(config: FilterConfig) -> Result<Self> {
        let classes = match &config.class_names_file {
            Some(path) => ClassNames::load(path)?,
            None => ClassNames::coco(),
        };
        Self::with_classes(config, classes)
    }

    pub fn with_classes(config: FilterConfig, classes: ClassNames) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, classes })
    }

    /// Decode, threshold and suppress the raw rows of one `width` x `height` frame
    pub fn filter(&self, rows: &[Vec<f32>], width: u32, height: u32) -> DetectionCollection {
        self.refine(self.decode(rows, width, height))
    }

    /// Decode rows into labelled pixel-space detections above the confidence threshold
    pub fn decode(&self, rows: &[Vec<f32>], width: u32, height: u32) -> DetectionCollection {
        #[cfg(feature = "parallel")]
        let detections: Vec<Detection> = {
            use rayon::prelude::*;
            rows.par_iter()
                .filter_map(|row| self.decode_row(row, width, height))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let detections: Vec<Detection> = rows
            .iter()
            .filter_map(|row| self.decode_row(row, width, height))
            .collect();

        DetectionCollection::from_vec(detections)
    }

    /// Threshold and suppress already-decoded detections. Idempotent.
    pub fn refine(&self, detections: DetectionCollection) -> DetectionCollection {
        let kept = detections.filter_by_confidence(self.config.confidence_threshold);

        if self.config.class_aware_nms {
            kept.apply_class_nms(self.config.nms_threshold)
        } else {
            kept.apply_nms(self.config.nms_threshold)
        }
    }

    fn decode_row(&self, row: &[f32], width: u32, height: u32) -> Option<Detection> {
        let Some(candidate) = RawCandidate::parse(row) else {
            debug!("skipping malformed detector row of length {}", row.len());
            return None;
        };

        let (class_id, score) = candidate.best_class();
        if score <= self.config.confidence_threshold {
            return None;
        }

        let Some(label) = self.classes.get(class_id) else {
            debug!("skipping unknown class id {}", class_id);
            return None;
        };

        Some(Detection::new(label, score, candidate.to_bbox(width, height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdwatch_core::BBox;

    const BIRD: usize = 14;
    const CAT: usize = 15;

    /// Row with a single non-zero class score
    fn row(cx: f32, cy: f32, w: f32, h: f32, class_id: usize, score: f32) -> Vec<f32> {
        let mut row = vec![cx, cy, w, h, 1.0];
        let mut scores = vec![0.0; 80];
        scores[class_id] = score;
        row.extend(scores);
        row
    }

    fn filter() -> DetectionFilter {
        DetectionFilter::new(FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_overlapping_birds_keep_strongest() {
        // 200x200 frame: boxes (0,0,50,50) and (0,0,100,50), IoU 0.5
        let rows = vec![
            row(0.125, 0.125, 0.25, 0.25, BIRD, 0.6),
            row(0.25, 0.125, 0.5, 0.25, BIRD, 0.9),
        ];

        let result = filter().filter(&rows, 200, 200);
        assert_eq!(result.len(), 1);
        let kept = &result.as_slice()[0];
        assert_eq!(kept.label, "bird");
        assert_eq!(kept.confidence, 0.9);
        assert_eq!(kept.bbox, BBox::new(0, 0, 100, 50));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let rows = vec![
            row(0.2, 0.2, 0.1, 0.1, BIRD, 0.5),
            row(0.8, 0.8, 0.1, 0.1, CAT, 0.75),
        ];

        let result = filter().filter(&rows, 100, 100);
        assert_eq!(result.len(), 1);
        assert!(result.contains_label("cat"));
    }

    #[test]
    fn test_refiltering_is_idempotent() {
        let rows = vec![
            row(0.1, 0.1, 0.1, 0.1, BIRD, 0.9),
            row(0.12, 0.1, 0.1, 0.1, BIRD, 0.8),
            row(0.5, 0.5, 0.2, 0.2, CAT, 0.7),
            row(0.9, 0.9, 0.1, 0.1, BIRD, 0.7),
        ];
        let f = filter();

        let once = f.filter(&rows, 320, 240);
        let twice = f.refine(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_output_is_sorted_and_stable() {
        let rows = vec![
            row(0.1, 0.1, 0.05, 0.05, CAT, 0.6),
            row(0.5, 0.5, 0.05, 0.05, BIRD, 0.9),
            row(0.9, 0.9, 0.05, 0.05, BIRD, 0.6),
        ];

        let result = filter().filter(&rows, 400, 400);
        let order: Vec<(&str, f32)> = result
            .iter()
            .map(|d| (d.label.as_str(), d.confidence))
            .collect();
        assert_eq!(order, vec![("bird", 0.9), ("cat", 0.6), ("bird", 0.6)]);
    }

    #[test]
    fn test_malformed_rows_are_ignored() {
        let rows = vec![
            vec![],
            vec![0.5, 0.5],
            vec![0.5, f32::NAN, 0.1, 0.1, 1.0, 0.9],
            row(0.5, 0.5, 0.1, 0.1, BIRD, 0.9),
        ];

        let result = filter().filter(&rows, 100, 100);
        assert_eq!(result.len(), 1);
        assert!(result.contains_label("bird"));
    }

    #[test]
    fn test_extreme_boxes_are_dropped_before_nms() {
        let rows = vec![
            row(1e9, 0.5, 1e9, 0.1, BIRD, 0.95),
            row(0.5, 0.5, 0.1, 0.1, BIRD, 0.9),
        ];

        let result = filter().filter(&rows, 640, 480);
        assert_eq!(result.len(), 1);
        assert_eq!(result.as_slice()[0].confidence, 0.9);
    }

    #[test]
    fn test_unknown_class_is_ignored() {
        let classes = ClassNames::from_text("bird\n");
        let f = DetectionFilter::with_classes(FilterConfig::default(), classes).unwrap();
        let rows = vec![vec![0.5, 0.5, 0.1, 0.1, 1.0, 0.1, 0.95]];

        assert!(f.filter(&rows, 100, 100).is_empty());
    }

    #[test]
    fn test_class_aware_nms_keeps_overlapping_labels() {
        let config = FilterConfig {
            class_aware_nms: true,
            ..Default::default()
        };
        let f = DetectionFilter::new(config).unwrap();
        let rows = vec![
            row(0.5, 0.5, 0.2, 0.2, BIRD, 0.9),
            row(0.5, 0.5, 0.2, 0.2, CAT, 0.8),
        ];

        assert_eq!(f.filter(&rows, 100, 100).len(), 2);
        assert_eq!(filter().filter(&rows, 100, 100).len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FilterConfig {
            confidence_threshold: -0.1,
            ..Default::default()
        };
        assert!(DetectionFilter::new(config).is_err());
    }
}
