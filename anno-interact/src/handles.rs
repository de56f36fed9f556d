use glam::Vec3;

use anno_core::annotation::bbox::{AnnotationBox, EulerRotation};

use crate::input::PointerSample;
use crate::ray::{ray_plane_y, Ray};

/// Low-pass factor applied to the rotation-ring angle to keep the
/// handle from jittering with the pointer.
const ANGLE_SMOOTHING: f32 = 0.1;

/// The interactive controls a box exposes while editable: 8 corners,
/// 6 faces, 4 vertical-edge rotation rings, plus the box body itself
/// for whole-box translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Corner(u8),
    Side(u8),
    Rotation(u8),
    Translate,
}

impl HandleKind {
    /// World-space anchor of this handle on the given box, used to
    /// place its hit target.
    pub fn anchor(&self, b: &AnnotationBox) -> Vec3 {
        match *self {
            HandleKind::Corner(i) => b.corner_world(i),
            HandleKind::Side(f) => b.face_world(f),
            HandleKind::Rotation(e) => b.vertical_edge_world(e),
            HandleKind::Translate => b.center,
        }
    }
}

/// Resize from a corner: the dragged corner goes where the pointer is,
/// the diagonally opposite corner stays fixed. All math after the
/// world-to-local conversion happens in the box's own frame, so the
/// resize behaves correctly under arbitrary yaw.
pub fn corner_resize(b: &AnnotationBox, index: u8, dragged_world: Vec3) -> AnnotationBox {
    let dragged_local = b.world_to_local(dragged_world);
    let opposite_local = b.corner_offset(AnnotationBox::opposite_corner(index));

    let min = dragged_local.min(opposite_local);
    let max = dragged_local.max(opposite_local);

    AnnotationBox {
        center: b.local_to_world((min + max) * 0.5),
        size: max - min,
        ..b.clone()
    }
}

/// Resize from a face: drag motion is projected onto the face normal in
/// world space so only that one dimension changes; the opposite face
/// stays fixed. Min/max reconstruction means dragging through the
/// opposite face swaps bounds instead of producing a negative extent.
pub fn side_resize(
    b: &AnnotationBox,
    face: u8,
    drag_start_world: Vec3,
    current_world: Vec3,
) -> AnnotationBox {
    let world_normal = (b.rotation.to_quat() * AnnotationBox::face_normal(face)).normalize_or_zero();
    let movement = current_world - drag_start_world;
    let constrained = drag_start_world + world_normal * movement.dot(world_normal);

    let face_local = b.world_to_local(constrained);
    let half = b.size * 0.5;
    let mut lo = -half;
    let mut hi = half;
    match face {
        0 => lo.z = face_local.z,
        1 => hi.z = face_local.z,
        2 => lo.x = face_local.x,
        3 => hi.x = face_local.x,
        4 => lo.y = face_local.y,
        5 => hi.y = face_local.y,
        _ => return b.clone(),
    }
    let min = lo.min(hi);
    let max = lo.max(hi);

    AnnotationBox {
        center: b.local_to_world((min + max) * 0.5),
        size: max - min,
        ..b.clone()
    }
}

/// Whole-box translation: center replacement, size and rotation kept.
pub fn translate(b: &AnnotationBox, new_center: Vec3) -> AnnotationBox {
    AnnotationBox {
        center: new_center,
        ..b.clone()
    }
}

/// Ongoing yaw drag on a rotation handle. The pointer ray is cut with
/// the ring's horizontal plane; the resulting angle around the box
/// center is unwrapped across the +-180 degree seam, low-pass filtered,
/// and applied as a delta against the yaw recorded at drag start.
#[derive(Debug, Clone, Copy)]
pub struct RotationDrag {
    initial_yaw: f32,
    start_angle: f32,
    continuous_angle: f32,
    radius: f32,
}

impl RotationDrag {
    pub fn begin(b: &AnnotationBox, edge_index: u8) -> Self {
        let anchor = b.vertical_edge_world(edge_index);
        let start_angle = (anchor.z - b.center.z).atan2(anchor.x - b.center.x);
        let local = b.world_to_local(anchor);
        Self {
            initial_yaw: b.rotation.yaw(),
            start_angle,
            continuous_angle: start_angle,
            radius: local.x.hypot(local.z),
        }
    }

    /// Advance the drag with the current pointer ray; returns the new
    /// box yaw, or None when the ray misses the ring plane.
    pub fn update(&mut self, b: &AnnotationBox, ray: Ray) -> Option<f32> {
        let hit = ray_plane_y(ray, b.center.y)?;
        let raw = (hit.z - b.center.z).atan2(hit.x - b.center.x);

        let unfolded = accumulate_continuous_angle(self.continuous_angle, raw);
        let smoothed =
            self.continuous_angle + ANGLE_SMOOTHING * (unfolded - self.continuous_angle);
        self.continuous_angle = smoothed;

        let delta = wrap_angle(smoothed - self.start_angle);
        Some(self.initial_yaw - delta)
    }

    /// Where the handle mesh should sit on the ring right now, so it
    /// visually tracks the pointer.
    pub fn handle_position(&self, b: &AnnotationBox) -> Vec3 {
        Vec3::new(
            b.center.x + self.radius * self.continuous_angle.cos(),
            b.center.y,
            b.center.z + self.radius * self.continuous_angle.sin(),
        )
    }
}

/// Wrap an angle into [-pi, pi].
fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle < -PI {
        angle += 2.0 * PI;
    }
    while angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}

/// Carry a raw ring angle past the +-pi seam: if the naive step exceeds
/// half a turn, the pointer crossed the discontinuity, not the ring.
fn accumulate_continuous_angle(prev: f32, new: f32) -> f32 {
    use std::f32::consts::PI;
    let mut delta = new - prev;
    if delta > PI {
        delta -= 2.0 * PI;
    } else if delta < -PI {
        delta += 2.0 * PI;
    }
    prev + delta
}

enum DragContext {
    Corner,
    Side { start_pos: Vec3 },
    Rotation(RotationDrag),
    Translate { grab_offset: Vec3 },
}

/// One handle's drag state machine (idle -> dragging -> idle), driven
/// by pointer-down/move/up on the handle's hit target. Every move emits
/// a complete replacement box for the collection manager; the handle
/// never mutates the box itself.
pub struct HandleController {
    kind: HandleKind,
    context: Option<DragContext>,
}

impl HandleController {
    pub fn new(kind: HandleKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn is_dragging(&self) -> bool {
        self.context.is_some()
    }

    /// Entry action: snapshot whatever the drag math needs from the
    /// box's current state.
    pub fn pointer_down(&mut self, b: &AnnotationBox, sample: &PointerSample) {
        self.context = Some(match self.kind {
            HandleKind::Corner(_) => DragContext::Corner,
            HandleKind::Side(_) => DragContext::Side {
                start_pos: self.kind.anchor(b),
            },
            HandleKind::Rotation(edge) => DragContext::Rotation(RotationDrag::begin(b, edge)),
            HandleKind::Translate => DragContext::Translate {
                grab_offset: b.center - sample.position,
            },
        });
    }

    /// Per-frame drag update; returns the replacement box when the
    /// pointer sample produces one.
    pub fn pointer_move(
        &mut self,
        b: &AnnotationBox,
        sample: &PointerSample,
    ) -> Option<AnnotationBox> {
        match (&mut self.context, self.kind) {
            (Some(DragContext::Corner), HandleKind::Corner(index)) => {
                Some(corner_resize(b, index, sample.position))
            }
            (Some(DragContext::Side { start_pos }), HandleKind::Side(face)) => {
                Some(side_resize(b, face, *start_pos, sample.position))
            }
            (Some(DragContext::Rotation(drag)), HandleKind::Rotation(_)) => {
                drag.update(b, sample.ray).map(|yaw| AnnotationBox {
                    rotation: EulerRotation::from_yaw(yaw),
                    ..b.clone()
                })
            }
            (Some(DragContext::Translate { grab_offset }), HandleKind::Translate) => {
                Some(translate(b, sample.position + *grab_offset))
            }
            _ => None,
        }
    }

    /// Exit action: a released drag keeps its last computed state;
    /// there is no revert path.
    pub fn pointer_up(&mut self) {
        self.context = None;
    }

    /// Current on-ring position for a dragging rotation handle.
    pub fn rotation_handle_position(&self, b: &AnnotationBox) -> Option<Vec3> {
        match &self.context {
            Some(DragContext::Rotation(drag)) => Some(drag.handle_position(b)),
            _ => None,
        }
    }
}
