use std::collections::HashSet;

use glam::Vec3;
use uuid::Uuid;

use anno_core::annotation::bbox::{AnnotationBox, EulerRotation};
use anno_core::annotation::label::Label;

/// The authoritative in-memory box collection for one dataset/session.
/// Every consumer goes through this store; no ambient shared state.
/// Operations are keyed by box id, and the store tracks which boxes are
/// "unsaved" (created or modified locally since the last successful
/// backend round-trip).
pub struct BoxStore {
    dataset_id: String,
    boxes: Vec<AnnotationBox>,
    unsaved: HashSet<String>,
}

impl BoxStore {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            boxes: Vec::new(),
            unsaved: HashSet::new(),
        }
    }

    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    pub fn boxes(&self) -> &[AnnotationBox] {
        &self.boxes
    }

    pub fn get(&self, id: &str) -> Option<&AnnotationBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn is_unsaved(&self, id: &str) -> bool {
        self.unsaved.contains(id)
    }

    pub fn unsaved_count(&self) -> usize {
        self.unsaved.len()
    }

    /// Add a freshly fitted box. Hand-drawn boxes come in accepted;
    /// machine-suggested ones pending. Returns the assigned id.
    pub fn add_box(&mut self, center: Vec3, size: Vec3, yaw: f32, accepted: bool) -> String {
        let id = Uuid::new_v4().to_string();
        self.boxes.push(AnnotationBox {
            id: id.clone(),
            center,
            size,
            rotation: EulerRotation::from_yaw(yaw),
            label: None,
            dataset_id: self.dataset_id.clone(),
            editable: false,
            accepted,
        });
        self.unsaved.insert(id.clone());
        id
    }

    /// Replace a box wholesale (the handle controllers emit complete
    /// replacement boxes). The owning dataset never changes after
    /// creation, so the stored `dataset_id` is kept.
    pub fn update(&mut self, replacement: AnnotationBox) -> bool {
        match self.boxes.iter_mut().find(|b| b.id == replacement.id) {
            Some(slot) => {
                let dataset_id = slot.dataset_id.clone();
                let id = replacement.id.clone();
                *slot = AnnotationBox {
                    dataset_id,
                    ..replacement
                };
                self.unsaved.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.boxes.len();
        self.boxes.retain(|b| b.id != id);
        self.unsaved.remove(id);
        before != self.boxes.len()
    }

    pub fn set_label(&mut self, id: &str, label: Label) -> bool {
        match self.boxes.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.label = Some(label);
                self.unsaved.insert(id.to_string());
                true
            }
            None => false,
        }
    }

    /// Confirm a machine-suggested box.
    pub fn accept(&mut self, id: &str) -> bool {
        match self.boxes.iter_mut().find(|b| b.id == id) {
            Some(b) => {
                b.accepted = true;
                self.unsaved.insert(id.to_string());
                true
            }
            None => false,
        }
    }

    /// Flag one box (or none) as editable. The flag is exclusive: at
    /// most one box shows resize handles at a time.
    pub fn set_editable(&mut self, id: Option<&str>) {
        for b in &mut self.boxes {
            b.editable = id == Some(b.id.as_str());
        }
    }

    pub fn editable_box(&self) -> Option<&AnnotationBox> {
        self.boxes.iter().find(|b| b.editable)
    }

    /// Replace local state with what the backend holds; everything is
    /// considered saved afterwards.
    pub fn load_from_backend(&mut self, boxes: Vec<AnnotationBox>) {
        self.boxes = boxes;
        self.unsaved.clear();
    }

    /// Merge machine-suggested boxes in as pending, unsaved entries.
    /// Colliding ids get a fresh one so local edits are never clobbered.
    pub fn merge_suggestions(&mut self, suggestions: Vec<AnnotationBox>) {
        for mut suggestion in suggestions {
            if suggestion.id.is_empty() || self.get(&suggestion.id).is_some() {
                suggestion.id = Uuid::new_v4().to_string();
            }
            suggestion.accepted = false;
            suggestion.editable = false;
            suggestion.dataset_id = self.dataset_id.clone();
            self.unsaved.insert(suggestion.id.clone());
            self.boxes.push(suggestion);
        }
    }

    /// Discard everything that never made it to the backend (the
    /// review-session "throw away my unsaved work" path).
    pub fn clear_unsaved_boxes(&mut self) {
        let unsaved = std::mem::take(&mut self.unsaved);
        self.boxes.retain(|b| !unsaved.contains(&b.id));
    }

    pub(crate) fn mark_saved(&mut self, id: &str) {
        self.unsaved.remove(id);
    }
}
