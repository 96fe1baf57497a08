//! Detections and their pixel-space bounding boxes

use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates, `(x, y)` being the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BBox {
    /// Create a new bounding box
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Calculate area of the bounding box
    pub fn area(&self) -> f32 {
        (self.width.max(0) as i64 * self.height.max(0) as i64) as f32
    }

    /// Right and bottom edges, widened so extreme boxes cannot overflow
    fn far_edges(&self) -> (i64, i64) {
        (
            self.x as i64 + self.width as i64,
            self.y as i64 + self.height as i64,
        )
    }

    /// Calculate intersection over union (IoU) with another box
    pub fn iou(&self, other: &BBox) -> f32 {
        let (self_right, self_bottom) = self.far_edges();
        let (other_right, other_bottom) = other.far_edges();
        let x1 = self.x.max(other.x) as i64;
        let y1 = self.y.max(other.y) as i64;
        let x2 = self_right.min(other_right);
        let y2 = self_bottom.min(other_bottom);

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = ((x2 - x1) as f64 * (y2 - y1) as f64) as f32;
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }

    /// Check if this box overlaps with another beyond `threshold` IoU
    pub fn overlaps(&self, other: &BBox, threshold: f32) -> bool {
        self.iou(other) > threshold
    }
}

/// One recognized object instance in a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    /// True when this detection carries the given class label
    pub fn is(&self, label: &str) -> bool {
        self.label == label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_iou() {
        let box1 = BBox::new(0, 0, 10, 10);
        let box2 = BBox::new(5, 5, 10, 10);

        let iou = box1.iou(&box2);
        assert!(iou > 0.0 && iou < 1.0);
        assert!((iou - 25.0 / 175.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_is_symmetric_and_bounded() {
        let a = BBox::new(0, 0, 20, 10);
        let b = BBox::new(0, 0, 10, 10);
        assert_eq!(a.iou(&b), b.iou(&a));
        assert!((a.iou(&b) - 0.5).abs() < 1e-6);
        assert_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_disjoint_and_degenerate_boxes() {
        let a = BBox::new(0, 0, 10, 10);
        assert_eq!(a.iou(&BBox::new(10, 0, 10, 10)), 0.0);
        assert_eq!(BBox::new(3, 3, 0, 0).iou(&BBox::new(3, 3, 0, 0)), 0.0);
        assert!(!a.overlaps(&BBox::new(50, 50, 5, 5), 0.0));
    }

    #[test]
    fn test_iou_of_saturated_boxes_does_not_overflow() {
        let huge = BBox::new(i32::MAX - 10, 0, i32::MAX, 100);
        let normal = BBox::new(0, 0, 50, 50);

        assert_eq!(huge.iou(&normal), 0.0);
        assert_eq!(normal.iou(&huge), 0.0);
        let self_iou = huge.iou(&huge);
        assert!((self_iou - 1.0).abs() < 1e-3);
    }
}
