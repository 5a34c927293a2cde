//! Candidate point sampling inside a rectangular placement area.
//!
//! Points are produced in area-local coordinates centered on the origin, the same convention
//! [`crate::placement::PlacementArea`] uses for its extent.
use mint::Vector2;
use rand::Rng as RngCore;

pub mod uniform_random;

pub use uniform_random::UniformRandomSampling;

/// Trait for candidate sampling. Returns `None` when the extent holds no points.
pub trait PositionSampling {
    fn sample(&self, extent: Vector2<f32>, rng: &mut dyn RngCore) -> Option<Vector2<f32>>;
}

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// ensuring bounds are strictly inside a domain.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}
