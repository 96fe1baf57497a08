//! Non-maximum suppression

use birdwatch_core::BBox;

/// Greedy non-maximum suppression.
///
/// Visits boxes by descending score (ties keep input order) and keeps a box only
/// if its IoU with every box kept so far is at most `threshold`. Returns the kept
/// indices in visiting order.
pub fn greedy_nms(boxes: &[BBox], scores: &[f32], threshold: f32) -> Vec<usize> {
    let n = boxes.len().min(scores.len());
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut keep: Vec<usize> = Vec::new();
    for i in order {
        if keep.iter().all(|&k| !boxes[k].overlaps(&boxes[i], threshold)) {
            keep.push(i);
        }
    }

    keep
}
