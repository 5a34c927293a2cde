//! Weighted random choice over an ordered list.
use rand::Rng as RngCore;

use crate::prop::PropEntry;
use crate::sampling::rand01;

/// Picks an index proportionally to `weights` using a single draw in `[0, 1]`.
///
/// The draw is scaled by the total weight and the first index whose cumulative weight reaches
/// it wins, so ties go to the earlier entry. Raw weights that are not finite and positive are
/// excluded and never drawn while any weight is positive. When none is positive the last
/// index is returned; an empty slice yields `None`.
///
/// Deck entries never hit the exclusion: [`PropEntry`] turns non-positive weights into `1.0`
/// at construction, so [`pick_weighted`] treats a zero-weight entry as weight 1.
pub fn pick_weighted_index(weights: &[f32], draw01: f32) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let sanitized = |w: f32| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f32 = weights.iter().copied().map(sanitized).sum();
    if total <= 0.0 {
        return Some(weights.len() - 1);
    }

    let target = draw01.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, w) in weights.iter().copied().map(sanitized).enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = Some(i);
        if cumulative >= target {
            return Some(i);
        }
    }

    // Rounding left the target just above the accumulated sum.
    last_positive
}

/// Draws one entry from `entries` proportionally to [`PropEntry::weight`].
pub fn pick_weighted<'a>(entries: &[&'a PropEntry], rng: &mut dyn RngCore) -> Option<&'a PropEntry> {
    let weights: Vec<f32> = entries.iter().map(|e| e.weight()).collect();
    let draw = rand01(rng);
    pick_weighted_index(&weights, draw).map(|i| entries[i])
}
