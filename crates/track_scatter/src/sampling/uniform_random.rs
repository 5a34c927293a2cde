//! Uniform random point sampling.
use mint::Vector2;
use rand::Rng as RngCore;

use crate::sampling::{next_down, rand01, PositionSampling};

/// Uniform i.i.d. random sampling over a rectangular area, optionally shrunk by a margin.
#[derive(Debug, Clone, Default)]
pub struct UniformRandomSampling {
    /// Distance kept clear of every edge.
    pub margin: f32,
}

impl UniformRandomSampling {
    pub fn new() -> Self {
        Self { margin: 0.0 }
    }

    /// Sample only points at least `margin` away from the edges.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin.max(0.0);
        self
    }
}

impl PositionSampling for UniformRandomSampling {
    fn sample(&self, extent: Vector2<f32>, rng: &mut dyn RngCore) -> Option<Vector2<f32>> {
        let w = extent.x - 2.0 * self.margin;
        let h = extent.y - 2.0 * self.margin;

        if w <= 0.0 || h <= 0.0 {
            return None;
        }

        let half_w = w * 0.5;
        let half_h = h * 0.5;
        // Keep strictly inside right/top edges.
        let max_x = next_down(half_w);
        let max_y = next_down(half_h);

        let u = rand01(rng);
        let v = rand01(rng);
        let x = (u * w - half_w).clamp(-half_w, max_x);
        let y = (v * h - half_h).clamp(-half_h, max_y);

        Some(Vector2 { x, y })
    }
}
