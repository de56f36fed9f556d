use glam::{Quat, Vec3};

use crate::annotation::label::Label;

/// Position and heading of the sensor platform at capture time, in the
/// backend convention. Used to re-center/re-orient the point cloud and
/// its annotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EgoPose {
    pub position: Vec3,
    pub heading: Quat,
}

/// A dataset record: read-only from the annotation engine's perspective.
/// Ego pose and labels may be absent; the engine tolerates both.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub url: String,
    pub ego_pose: Option<EgoPose>,
    pub labels: Vec<Label>,
}

impl Dataset {
    pub fn label_by_id(&self, id: u32) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == id)
    }
}
