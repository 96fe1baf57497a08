//! Class-name table mapping detector class ids to labels

use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;

const COCO_NAMES: [&str; 80] = [
    "person", "bicycle", "car", "motorbike", "aeroplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "sofa", "pottedplant", "bed",
    "diningtable", "toilet", "tvmonitor", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];

/// Ordered class labels; index is the detector's class id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::coco()
    }
}

impl ClassNames {
    /// The 80 COCO classes in darknet order
    pub fn coco() -> Self {
        Self {
            names: COCO_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parse one label per line; trailing blank lines are ignored
    pub fn from_text(text: &str) -> Self {
        let names = text
            .trim_end_matches(['\n', '\r'])
            .lines()
            .map(|line| line.trim().to_string())
            .collect();
        Self { names }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read class names: {:?}", path.as_ref()))?;

        let names = Self::from_text(&text);
        anyhow::ensure!(!names.is_empty(), "No class names in {:?}", path.as_ref());
        Ok(names)
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
