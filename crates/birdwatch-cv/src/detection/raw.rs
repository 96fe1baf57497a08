//! Raw detector output rows
//!
//! Each row is `[cx, cy, w, h, objectness, score_0, .., score_k]` with the box
//! normalized to the frame. Objectness is carried but not used for scoring.

use birdwatch_core::BBox;

/// Box fields plus objectness
const HEADER_LEN: usize = 5;

/// Normalized box coordinates outside this range are treated as garbage
const COORD_RANGE: std::ops::RangeInclusive<f32> = -1.0..=2.0;

/// One parsed candidate row
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandidate<'a> {
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
    pub objectness: f32,
    pub scores: &'a [f32],
}

impl<'a> RawCandidate<'a> {
    /// Parse a row, returning `None` for anything malformed
    pub fn parse(row: &'a [f32]) -> Option<Self> {
        if row.len() <= HEADER_LEN || row.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let (head, scores) = row.split_at(HEADER_LEN);
        if head[2] <= 0.0 || head[3] <= 0.0 || !head[..4].iter().all(|v| COORD_RANGE.contains(v)) {
            return None;
        }

        Some(Self {
            cx: head[0],
            cy: head[1],
            w: head[2],
            h: head[3],
            objectness: head[4],
            scores,
        })
    }

    /// Class id and score of the best class; the lowest id wins a tie
    pub fn best_class(&self) -> (usize, f32) {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (id, score)| {
                if score > best.1 { (id, score) } else { best }
            })
    }

    /// Denormalize into a pixel box for a `width` x `height` frame
    pub fn to_bbox(&self, width: u32, height: u32) -> BBox {
        let (fw, fh) = (width as f32, height as f32);
        let w = (self.w * fw) as i32;
        let h = (self.h * fh) as i32;
        let x = (self.cx * fw - w as f32 / 2.0) as i32;
        let y = (self.cy * fh - h as f32 / 2.0) as i32;
        BBox::new(x, y, w, h)
    }
}
