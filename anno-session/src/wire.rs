use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use anno_core::annotation::bbox::{AnnotationBox, EulerRotation, RotationOrder};
use anno_core::annotation::dataset::{Dataset, EgoPose};
use anno_core::annotation::label::Label;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for WireVec3 {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<WireVec3> for Vec3 {
    fn from(v: WireVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireQuat {
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
}

impl From<Quat> for WireQuat {
    fn from(q: Quat) -> Self {
        Self {
            qx: q.x,
            qy: q.y,
            qz: q.z,
            qw: q.w,
        }
    }
}

impl From<WireQuat> for Quat {
    fn from(q: WireQuat) -> Self {
        Quat::from_xyzw(q.qx, q.qy, q.qz, q.qw)
    }
}

/// Euler angles plus axis-order string, as the box CRUD backend stores
/// them. Unknown or missing order strings fall back to XYZ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_order() -> String {
    "XYZ".to_string()
}

impl From<EulerRotation> for WireRotation {
    fn from(e: EulerRotation) -> Self {
        Self {
            x: e.x,
            y: e.y,
            z: e.z,
            order: e.order.as_str().to_string(),
        }
    }
}

impl From<WireRotation> for EulerRotation {
    fn from(w: WireRotation) -> Self {
        Self {
            x: w.x,
            y: w.y,
            z: w.z,
            order: RotationOrder::parse(&w.order).unwrap_or_default(),
        }
    }
}

/// The box wire format persisted/exchanged with the CRUD backend. The
/// values are stored in render space as-is; only the cuboid export path
/// converts conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBox {
    pub id: String,
    pub center: WireVec3,
    pub size: WireVec3,
    pub rotation: WireRotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(rename = "datasetId")]
    pub dataset_id: String,
    #[serde(default)]
    pub accepted: bool,
}

impl WireBox {
    pub fn from_model(b: &AnnotationBox) -> Self {
        Self {
            id: b.id.clone(),
            center: b.center.into(),
            size: b.size.into(),
            rotation: b.rotation.into(),
            label: b.label.clone(),
            dataset_id: b.dataset_id.clone(),
            accepted: b.accepted,
        }
    }

    pub fn into_model(self) -> AnnotationBox {
        AnnotationBox {
            id: self.id,
            center: self.center.into(),
            size: self.size.into(),
            rotation: self.rotation.into(),
            label: self.label,
            dataset_id: self.dataset_id,
            editable: false,
            accepted: self.accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEgoPose {
    pub position: WireVec3,
    pub heading: WireQuat,
}

/// Dataset record as served by the backend. Ego pose and labels are
/// optional; absent values must not break the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDataset {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "egoPose", default, skip_serializing_if = "Option::is_none")]
    pub ego_pose: Option<WireEgoPose>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl WireDataset {
    pub fn into_model(self) -> Dataset {
        Dataset {
            id: self.id,
            name: self.name,
            url: self.url,
            ego_pose: self.ego_pose.map(|e| EgoPose {
                position: e.position.into(),
                heading: e.heading.into(),
            }),
            labels: self.labels,
        }
    }

    pub fn from_model(d: &Dataset) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            url: d.url.clone(),
            ego_pose: d.ego_pose.map(|e| WireEgoPose {
                position: e.position.into(),
                heading: e.heading.into(),
            }),
            labels: d.labels.clone(),
        }
    }
}
