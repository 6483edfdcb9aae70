use std::cmp::Ordering;

use crate::win_prob::win_pct;

/// Orders team indices from first place down: win percentage, then points
/// for, both descending. Equal teams keep their input order.
pub fn rank_order(wins: &[u32], losses: &[u32], ties: &[u32], points_for: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..wins.len()).collect();
    order.sort_by(|&a, &b| {
        let pa = win_pct(wins[a], losses[a], ties[a]);
        let pb = win_pct(wins[b], losses[b], ties[b]);
        pb.partial_cmp(&pa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                points_for[b]
                    .partial_cmp(&points_for[a])
                    .unwrap_or(Ordering::Equal)
            })
    });
    order
}
