use std::collections::HashSet;

use glam::{Affine3A, Vec3};

use crate::obb::{fit_yaw_obb, FittedObb};

pub const SELECTED_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
pub const HOVERED_COLOR: [f32; 3] = [1.0, 0.5, 0.0];
pub const DEFAULT_BRUSH_RADIUS: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushState {
    #[default]
    Idle,
    Brushing,
}

/// Brush-based point selection over a decimated cloud. While brushing,
/// points near the marker accumulate into the selected set (selection
/// only ever grows until it is committed or cleared); finishing fits a
/// yaw-only OBB around everything selected.
///
/// The engine owns a snapshot of the original ramp colors and rewrites
/// the live color buffer in full on every update: selected points are
/// green, hovered-but-unselected orange, everything else its original
/// color. The three states are mutually exclusive.
pub struct BrushEngine {
    state: BrushState,
    pub brush_radius: f32,
    hovered: HashSet<usize>,
    selected: HashSet<usize>,
    original_colors: Vec<[f32; 3]>,
}

impl BrushEngine {
    pub fn new(original_colors: Vec<[f32; 3]>) -> Self {
        Self {
            state: BrushState::Idle,
            brush_radius: DEFAULT_BRUSH_RADIUS,
            hovered: HashSet::new(),
            selected: HashSet::new(),
            original_colors,
        }
    }

    pub fn with_radius(original_colors: Vec<[f32; 3]>, brush_radius: f32) -> Self {
        Self {
            brush_radius,
            ..Self::new(original_colors)
        }
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn is_brushing(&self) -> bool {
        self.state == BrushState::Brushing
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Pointer-down. Brushing only starts when the pointer is not
    /// hovering an existing box.
    pub fn press_start(&mut self, hovering_box: bool) {
        if self.state == BrushState::Idle && !hovering_box {
            self.state = BrushState::Brushing;
        }
    }

    /// Pointer-up: stop accumulating but keep the selection for a later
    /// finish or further brushing strokes.
    pub fn press_end(&mut self) {
        self.state = BrushState::Idle;
    }

    /// Per-frame proximity scan: points within the brush radius of the
    /// marker become the hovered set; while brushing they are unioned
    /// into the selection. Repaints the whole color buffer.
    pub fn update_hover(
        &mut self,
        marker: Vec3,
        positions: &[Vec3],
        cloud_transform: &Affine3A,
        colors: &mut [[f32; 3]],
    ) {
        let radius_sq = self.brush_radius * self.brush_radius;
        self.hovered.clear();
        for (i, p) in positions.iter().enumerate() {
            let world = cloud_transform.transform_point3(*p);
            if world.distance_squared(marker) < radius_sq {
                self.hovered.insert(i);
            }
        }
        if self.state == BrushState::Brushing {
            self.selected.extend(self.hovered.iter().copied());
        }
        self.repaint(colors);
    }

    /// Commit the accumulated selection: fit a yaw-only OBB around the
    /// world positions of all selected points, then reset. An empty
    /// selection is a no-op that still resets the brushing state.
    pub fn finish(
        &mut self,
        positions: &[Vec3],
        cloud_transform: &Affine3A,
        colors: &mut [[f32; 3]],
    ) -> Option<FittedObb> {
        self.state = BrushState::Idle;
        self.hovered.clear();

        let fit = if self.selected.is_empty() {
            None
        } else {
            let world_points: Vec<Vec3> = self
                .selected
                .iter()
                .filter_map(|&i| positions.get(i))
                .map(|p| cloud_transform.transform_point3(*p))
                .collect();
            Some(fit_yaw_obb(&world_points))
        };

        self.selected.clear();
        self.repaint(colors);
        fit
    }

    /// External cancel: drop all selection state and restore colors.
    pub fn cancel(&mut self, colors: &mut [[f32; 3]]) {
        self.state = BrushState::Idle;
        self.hovered.clear();
        self.selected.clear();
        self.repaint(colors);
    }

    // Full rewrite keeps the three-way state consistent; no incremental
    // diffing.
    fn repaint(&self, colors: &mut [[f32; 3]]) {
        let n = colors.len().min(self.original_colors.len());
        for i in 0..n {
            colors[i] = if self.selected.contains(&i) {
                SELECTED_COLOR
            } else if self.hovered.contains(&i) {
                HOVERED_COLOR
            } else {
                self.original_colors[i]
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_cloud(n: usize) -> (Vec<Vec3>, Vec<[f32; 3]>) {
        let positions: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let colors = vec![[0.1, 0.2, 0.3]; n];
        (positions, colors)
    }

    #[test]
    fn hover_highlights_without_selecting_when_idle() {
        let (positions, originals) = line_cloud(5);
        let mut colors = originals.clone();
        let mut engine = BrushEngine::with_radius(originals.clone(), 0.5);

        engine.update_hover(Vec3::ZERO, &positions, &Affine3A::IDENTITY, &mut colors);
        assert_eq!(colors[0], HOVERED_COLOR);
        assert_eq!(colors[1], originals[1]);
        assert_eq!(engine.selected_count(), 0);
    }

    #[test]
    fn brushing_accumulates_monotonically() {
        let (positions, originals) = line_cloud(5);
        let mut colors = originals.clone();
        let mut engine = BrushEngine::with_radius(originals.clone(), 0.5);

        engine.press_start(false);
        assert!(engine.is_brushing());

        engine.update_hover(Vec3::ZERO, &positions, &Affine3A::IDENTITY, &mut colors);
        assert_eq!(engine.selected_count(), 1);

        // Moving the brush keeps earlier picks selected.
        engine.update_hover(
            Vec3::new(2.0, 0.0, 0.0),
            &positions,
            &Affine3A::IDENTITY,
            &mut colors,
        );
        assert_eq!(engine.selected_count(), 2);
        assert_eq!(colors[0], SELECTED_COLOR);
        assert_eq!(colors[2], SELECTED_COLOR);

        // Releasing the trigger keeps the selection.
        engine.press_end();
        assert_eq!(engine.selected_count(), 2);
    }

    #[test]
    fn press_start_is_blocked_while_hovering_a_box() {
        let (_, originals) = line_cloud(3);
        let mut engine = BrushEngine::new(originals);
        engine.press_start(true);
        assert!(!engine.is_brushing());
    }

    #[test]
    fn finish_fits_a_box_containing_the_selection() {
        let (positions, originals) = line_cloud(5);
        let mut colors = originals.clone();
        let mut engine = BrushEngine::with_radius(originals.clone(), 10.0);

        engine.press_start(false);
        engine.update_hover(Vec3::ZERO, &positions, &Affine3A::IDENTITY, &mut colors);
        assert_eq!(engine.selected_count(), 5);

        let fit = engine
            .finish(&positions, &Affine3A::IDENTITY, &mut colors)
            .unwrap();
        assert!((fit.center - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert!((fit.size.x - 4.0).abs() < 1e-4);

        // Selection cleared, colors restored.
        assert_eq!(engine.selected_count(), 0);
        assert_eq!(colors[0], originals[0]);
        assert!(!engine.is_brushing());
    }

    #[test]
    fn finish_with_empty_selection_is_a_noop() {
        let (positions, originals) = line_cloud(3);
        let mut colors = originals.clone();
        let mut engine = BrushEngine::new(originals);
        assert!(engine
            .finish(&positions, &Affine3A::IDENTITY, &mut colors)
            .is_none());
    }

    #[test]
    fn cloud_transform_is_applied_to_selected_points() {
        let (positions, originals) = line_cloud(3);
        let mut colors = originals.clone();
        let mut engine = BrushEngine::with_radius(originals, 10.0);
        let shift = Affine3A::from_translation(Vec3::new(0.0, 5.0, 0.0));

        engine.press_start(false);
        engine.update_hover(Vec3::new(0.0, 5.0, 0.0), &positions, &shift, &mut colors);
        let fit = engine.finish(&positions, &shift, &mut colors).unwrap();
        assert!((fit.center.y - 5.0).abs() < 1e-4);
    }
}
