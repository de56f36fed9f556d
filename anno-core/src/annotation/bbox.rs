use glam::{Affine3A, EulerRot, Quat, Vec3};

use crate::annotation::label::Label;

/// Rotation axis order carried alongside Euler angles on the wire
/// (e.g. "XYZ"). Unknown order strings fall back to XYZ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl RotationOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "XYZ" => Some(Self::Xyz),
            "YXZ" => Some(Self::Yxz),
            "ZXY" => Some(Self::Zxy),
            "ZYX" => Some(Self::Zyx),
            "YZX" => Some(Self::Yzx),
            "XZY" => Some(Self::Xzy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xyz => "XYZ",
            Self::Yxz => "YXZ",
            Self::Zxy => "ZXY",
            Self::Zyx => "ZYX",
            Self::Yzx => "YZX",
            Self::Xzy => "XZY",
        }
    }

    fn euler_rot(&self) -> EulerRot {
        match self {
            Self::Xyz => EulerRot::XYZ,
            Self::Yxz => EulerRot::YXZ,
            Self::Zxy => EulerRot::ZXY,
            Self::Zyx => EulerRot::ZYX,
            Self::Yzx => EulerRot::YZX,
            Self::Xzy => EulerRot::XZY,
        }
    }
}

/// Euler rotation of an annotation box. Every box-construction and
/// box-editing path only ever writes the Y (yaw) component; pitch and
/// roll stay zero by convention, not by type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub order: RotationOrder,
}

impl EulerRotation {
    pub fn from_yaw(yaw: f32) -> Self {
        Self {
            x: 0.0,
            y: yaw,
            z: 0.0,
            order: RotationOrder::Xyz,
        }
    }

    /// Yaw is the rotation about the vertical (Y) axis in render space.
    pub fn yaw(&self) -> f32 {
        self.y
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(self.order.euler_rot(), self.x, self.y, self.z)
    }

    pub fn from_quat(q: Quat, order: RotationOrder) -> Self {
        let (x, y, z) = q.to_euler(order.euler_rot());
        Self { x, y, z, order }
    }
}

/// The central annotation entity: an oriented 3D bounding box in render
/// space. `size` components are full extents and stay >= 0; handle code
/// reconstructs boxes from min/max pairs instead of subtracting sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBox {
    pub id: String,
    pub center: Vec3,
    pub size: Vec3,
    pub rotation: EulerRotation,
    pub label: Option<Label>,
    pub dataset_id: String,
    /// Transient UI flag: true while the box shows resize handles.
    pub editable: bool,
    /// Suggested boxes start out unaccepted; only accepted boxes are
    /// ever persisted to the backend.
    pub accepted: bool,
}

impl AnnotationBox {
    fn transform(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation.to_quat(), self.center)
    }

    /// Convert a box-local position into world coordinates.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.transform().transform_point3(local)
    }

    /// Convert a world position into the box's local frame.
    pub fn world_to_local(&self, world: Vec3) -> Vec3 {
        self.transform().inverse().transform_point3(world)
    }

    /// Local offset of a corner from the box center. Corners are indexed
    /// 0-7 by the three low bits (bit0 = x, bit1 = y, bit2 = z); a set
    /// bit selects the negative half, so corner 0 is the all-positive one.
    pub fn corner_offset(&self, index: u8) -> Vec3 {
        let sx = if index & 1 != 0 { -1.0 } else { 1.0 };
        let sy = if index & 2 != 0 { -1.0 } else { 1.0 };
        let sz = if index & 4 != 0 { -1.0 } else { 1.0 };
        Vec3::new(
            sx * self.size.x / 2.0,
            sy * self.size.y / 2.0,
            sz * self.size.z / 2.0,
        )
    }

    pub fn corner_world(&self, index: u8) -> Vec3 {
        self.local_to_world(self.corner_offset(index))
    }

    /// The corner diagonally opposite to `index` (all three sign bits
    /// flipped).
    pub fn opposite_corner(index: u8) -> u8 {
        (index ^ 7) & 7
    }

    /// Outward unit normal of a face in box-local space.
    /// Faces: 0 front (-z), 1 back (+z), 2 left (-x), 3 right (+x),
    /// 4 bottom (-y), 5 top (+y).
    pub fn face_normal(face: u8) -> Vec3 {
        match face {
            0 => Vec3::NEG_Z,
            1 => Vec3::Z,
            2 => Vec3::NEG_X,
            3 => Vec3::X,
            4 => Vec3::NEG_Y,
            5 => Vec3::Y,
            _ => Vec3::ZERO,
        }
    }

    /// Local offset of a face center from the box center.
    pub fn face_offset(&self, face: u8) -> Vec3 {
        Self::face_normal(face) * self.size * 0.5
    }

    pub fn face_world(&self, face: u8) -> Vec3 {
        self.local_to_world(self.face_offset(face))
    }

    /// Midpoint offsets of the four vertical (Y-parallel) edges, used as
    /// anchor points for yaw-rotation handles.
    pub fn vertical_edge_offset(&self, index: u8) -> Vec3 {
        let hx = self.size.x / 2.0;
        let hz = self.size.z / 2.0;
        match index {
            0 => Vec3::new(-hx, 0.0, hz),
            1 => Vec3::new(hx, 0.0, hz),
            2 => Vec3::new(-hx, 0.0, -hz),
            3 => Vec3::new(hx, 0.0, -hz),
            _ => Vec3::ZERO,
        }
    }

    pub fn vertical_edge_world(&self, index: u8) -> Vec3 {
        self.local_to_world(self.vertical_edge_offset(index))
    }

    /// True when the world position falls inside the box (inclusive).
    pub fn contains_world(&self, world: Vec3) -> bool {
        let local = self.world_to_local(world);
        let half = self.size / 2.0;
        local.x.abs() <= half.x && local.y.abs() <= half.y && local.z.abs() <= half.z
    }
}
