use glam::Vec3;
use rayon::prelude::*;

/// Color assigned to the lowest clamped points (blue).
pub const RAMP_LOW: [f32; 3] = [0.0, 0.0, 1.0];
/// Color assigned to the highest clamped points (red).
pub const RAMP_HIGH: [f32; 3] = [1.0, 0.0, 0.0];

/// Axis-aligned bounds of the converted point set, reported to the
/// caller for floor/camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CloudBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl CloudBounds {
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// A decoded, decimated point cloud in render space. `colors` is the
/// live buffer the selection engine repaints; take a copy before
/// handing it out if the original ramp is still needed.
#[derive(Debug, Clone, Default)]
pub struct DecodedCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub bounds: CloudBounds,
}

impl DecodedCloud {
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let bounds = CloudBounds::from_points(&positions);
        let colors = height_ramp_colors(&positions);
        Self {
            positions,
            colors,
            bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Blue-to-red ramp over the vertical (render Y) component, clamped to
/// the 1st/99th percentile so a few outlier returns cannot crush the
/// visible dynamic range. Degenerate spans fall back to the midpoint
/// color instead of dividing by zero.
pub fn height_ramp_colors(positions: &[Vec3]) -> Vec<[f32; 3]> {
    if positions.is_empty() {
        return Vec::new();
    }

    let mut heights: Vec<f32> = positions.iter().map(|p| p.y).collect();
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = heights.len();
    let lo = heights[percentile_index(n, 0.01)];
    let hi = heights[percentile_index(n, 0.99)];

    positions
        .par_iter()
        .map(|p| {
            let ratio = if hi > lo {
                ((p.y - lo) / (hi - lo)).clamp(0.0, 1.0)
            } else {
                0.5
            };
            ramp_color(ratio)
        })
        .collect()
}

fn percentile_index(n: usize, q: f32) -> usize {
    ((n as f32 * q) as usize).min(n - 1)
}

fn ramp_color(ratio: f32) -> [f32; 3] {
    [
        RAMP_LOW[0] + (RAMP_HIGH[0] - RAMP_LOW[0]) * ratio,
        RAMP_LOW[1] + (RAMP_HIGH[1] - RAMP_LOW[1]) * ratio,
        RAMP_LOW[2] + (RAMP_HIGH[2] - RAMP_LOW[2]) * ratio,
    ]
}
