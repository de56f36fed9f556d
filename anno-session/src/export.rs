use glam::Vec3;
use serde::{Deserialize, Serialize};

use anno_core::annotation::bbox::AnnotationBox;
use anno_core::annotation::dataset::EgoPose;
use anno_coords::{
    backend_position_to_render, backend_rotation_to_render, backend_size_to_render, backend_yaw,
    render_position_to_backend, render_rotation_to_backend, render_size_to_backend,
};

use crate::wire::{WireQuat, WireVec3};

pub const FORMAT_VERSION: f32 = 0.1;
pub const LABEL_STATUS_PRELABELED: &str = "PRELABELED";
pub const EXPORT_SCORE: f32 = 0.9254;
pub const ANNOTATION_TYPE_CUBOID: &str = "cuboid";

/// Fallback category for boxes exported without a label.
const DEFAULT_CATEGORY_ID: u32 = 1;

/// One cuboid record in the exported annotation format, expressed in
/// the backend convention (absolute position, Z-up sizes, backend yaw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuboidAnnotation {
    pub track_id: u32,
    pub category_id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: WireVec3,
    pub dimensions: WireVec3,
    pub yaw: f32,
    pub rotation: WireQuat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportAttributes {
    pub format_version: f32,
    pub annotations: Vec<CuboidAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelExport {
    pub attributes: ExportAttributes,
    pub label_status: String,
    pub score: f32,
}

/// Build the exported annotation payload from render-space boxes.
/// Positions get the ego offset re-applied, sizes swap back to Z-up,
/// and the yaw is read off the converted rotation (Euler Z in the
/// backend convention).
pub fn build_label_export(boxes: &[AnnotationBox], ego: Option<&EgoPose>) -> LabelExport {
    let annotations = boxes
        .iter()
        .enumerate()
        .map(|(index, b)| {
            let backend_rotation = render_rotation_to_backend(b.rotation.to_quat());
            CuboidAnnotation {
                track_id: index as u32 + 1,
                category_id: b
                    .label
                    .as_ref()
                    .map(|l| l.id)
                    .unwrap_or(DEFAULT_CATEGORY_ID),
                kind: ANNOTATION_TYPE_CUBOID.to_string(),
                position: render_position_to_backend(b.center, ego).into(),
                dimensions: render_size_to_backend(b.size).into(),
                yaw: backend_yaw(backend_rotation),
                rotation: backend_rotation.into(),
            }
        })
        .collect();

    LabelExport {
        attributes: ExportAttributes {
            format_version: FORMAT_VERSION,
            annotations,
        },
        label_status: LABEL_STATUS_PRELABELED.to_string(),
        score: EXPORT_SCORE,
    }
}

/// The reverse direction, used when machine suggestions arrive as
/// cuboid records: convert one into render-space center/size/yaw parts.
pub fn cuboid_to_render_parts(ann: &CuboidAnnotation, ego: Option<&EgoPose>) -> (Vec3, Vec3, f32) {
    let center = backend_position_to_render(ann.position.into(), ego);
    let size = backend_size_to_render(ann.dimensions.into());
    let rotation = backend_rotation_to_render(ann.rotation.into());
    let (_, yaw, _) = rotation.to_euler(glam::EulerRot::XYZ);
    (center, size, yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    use anno_core::annotation::bbox::EulerRotation;
    use anno_core::annotation::label::Label;

    fn export_box(yaw: f32, label: Option<Label>) -> AnnotationBox {
        AnnotationBox {
            id: "e1".to_string(),
            center: Vec3::new(1.0, 2.0, 3.0),
            size: Vec3::new(2.0, 1.0, 4.0),
            rotation: EulerRotation::from_yaw(yaw),
            label,
            dataset_id: "d1".to_string(),
            editable: false,
            accepted: true,
        }
    }

    #[test]
    fn export_converts_into_the_backend_convention() {
        let ego = EgoPose {
            position: Vec3::new(100.0, 50.0, 5.0),
            heading: Quat::IDENTITY,
        };
        let label = Label {
            id: 7,
            name: "truck".to_string(),
            color: "#0000ff".to_string(),
            attribute: None,
        };
        let export = build_label_export(&[export_box(0.4, Some(label))], Some(&ego));

        assert_eq!(export.label_status, LABEL_STATUS_PRELABELED);
        assert_eq!(export.attributes.format_version, FORMAT_VERSION);
        let ann = &export.attributes.annotations[0];
        assert_eq!(ann.track_id, 1);
        assert_eq!(ann.category_id, 7);
        assert_eq!(ann.kind, "cuboid");

        // Render (1,2,3) -> backend (1,-3,2), plus the ego offset.
        assert!((ann.position.x - 101.0).abs() < 1e-4);
        assert!((ann.position.y - 47.0).abs() < 1e-4);
        assert!((ann.position.z - 7.0).abs() < 1e-4);

        // Sizes swap lateral/vertical with no sign change.
        assert_eq!(
            (ann.dimensions.x, ann.dimensions.y, ann.dimensions.z),
            (2.0, 4.0, 1.0)
        );

        // A render yaw about Y exports as the same backend yaw about Z.
        assert!((ann.yaw - 0.4).abs() < 1e-4);
    }

    #[test]
    fn unlabeled_boxes_use_the_default_category() {
        let export = build_label_export(&[export_box(0.0, None)], None);
        assert_eq!(export.attributes.annotations[0].category_id, 1);
    }

    #[test]
    fn cuboid_round_trips_back_to_render_parts() {
        let b = export_box(0.9, None);
        let ego = EgoPose {
            position: Vec3::new(-4.0, 8.0, 2.0),
            heading: Quat::IDENTITY,
        };
        let export = build_label_export(std::slice::from_ref(&b), Some(&ego));
        let (center, size, yaw) = cuboid_to_render_parts(&export.attributes.annotations[0], Some(&ego));
        assert!((center - b.center).length() < 1e-4);
        assert!((size - b.size).length() < 1e-4);
        assert!((yaw - 0.9).abs() < 1e-4);
    }

    #[test]
    fn export_serializes_with_expected_field_names() {
        let export = build_label_export(&[export_box(0.0, None)], None);
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"format_version\""));
        assert!(json.contains("\"type\":\"cuboid\""));
        assert!(json.contains("\"label_status\":\"PRELABELED\""));
        assert!(json.contains("\"qw\""));
        assert!(json.contains("\"track_id\":1"));
    }
}
