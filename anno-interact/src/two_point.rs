use glam::{Quat, Vec3};

use crate::obb::FittedObb;

/// Smallest extent a two-point box may have along any axis. A drag whose
/// start and end share a coordinate still yields a usable (clamped) box
/// instead of being rejected.
pub const MIN_EXTENT: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum TwoPointState {
    #[default]
    Idle,
    Dragging {
        start: Vec3,
        preview: Vec3,
        frozen_yaw: f32,
    },
}

/// Alternate box-creation mode: an axis-aligned-in-yaw box spanned by
/// two marker points. The camera yaw is read once at drag start and
/// frozen for the whole drag.
#[derive(Debug, Default)]
pub struct TwoPointEngine {
    state: TwoPointState,
}

impl TwoPointEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, TwoPointState::Dragging { .. })
    }

    /// Selection-start: record the marker as both start and preview and
    /// freeze the current camera yaw. Ignored while already dragging.
    pub fn begin(&mut self, marker: Vec3, camera_yaw: f32) {
        if self.state == TwoPointState::Idle {
            self.state = TwoPointState::Dragging {
                start: marker,
                preview: marker,
                frozen_yaw: camera_yaw,
            };
        }
    }

    /// Per-frame update of the preview marker.
    pub fn update_preview(&mut self, marker: Vec3) {
        if let TwoPointState::Dragging { preview, .. } = &mut self.state {
            *preview = marker;
        }
    }

    /// The box the current drag would produce, for live preview.
    pub fn preview(&self) -> Option<FittedObb> {
        match self.state {
            TwoPointState::Dragging {
                start,
                preview,
                frozen_yaw,
            } => Some(span_box(start, preview, frozen_yaw)),
            TwoPointState::Idle => None,
        }
    }

    /// Selection-end: emit the final box and reset.
    pub fn finish(&mut self) -> Option<FittedObb> {
        let fit = self.preview();
        self.state = TwoPointState::Idle;
        fit
    }

    pub fn cancel(&mut self) {
        self.state = TwoPointState::Idle;
    }
}

/// Box spanned by two markers in the frozen-yaw frame: rotate both into
/// that frame, take the axis-aligned box there, rotate the center back.
fn span_box(a: Vec3, b: Vec3, yaw: f32) -> FittedObb {
    let unrotate = Quat::from_rotation_y(-yaw);
    let la = unrotate * a;
    let lb = unrotate * b;
    let min = la.min(lb);
    let max = la.max(lb);
    let size = (max - min).max(Vec3::splat(MIN_EXTENT));
    FittedObb {
        center: Quat::from_rotation_y(yaw) * ((min + max) * 0.5),
        size,
        yaw,
    }
}
