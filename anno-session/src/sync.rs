use std::path::PathBuf;

use thiserror::Error;

use anno_core::annotation::bbox::AnnotationBox;

use crate::store::BoxStore;
use crate::wire::WireBox;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("backend data error: {0}")]
    Data(#[from] serde_json::Error),
}

/// The persistence seam. The REST transport lives outside the core;
/// anything that can fetch and CRUD boxes per dataset can stand in.
pub trait BoxBackend {
    fn fetch_boxes(&self, dataset_id: &str) -> Result<Vec<AnnotationBox>, BackendError>;
    fn create_box(&mut self, bx: &AnnotationBox) -> Result<(), BackendError>;
    fn update_box(&mut self, bx: &AnnotationBox) -> Result<(), BackendError>;
    fn delete_box(&mut self, id: &str) -> Result<(), BackendError>;
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped_pending: usize,
    pub failed: usize,
}

/// Reconcile the local store against the backend on explicit save:
/// backend boxes with no local counterpart are deleted remotely, local
/// boxes matching a backend id are updated, and local-only boxes are
/// created only once accepted. Pending suggestions never leave the
/// store. Per-box failures are logged and the box stays unsaved, so the
/// next save retries it (at-least-once, idempotent by id).
pub fn save_boxes(
    store: &mut BoxStore,
    backend: &mut dyn BoxBackend,
) -> Result<SyncReport, BackendError> {
    let remote = backend.fetch_boxes(store.dataset_id())?;
    let mut report = SyncReport::default();

    let local_ids: Vec<String> = store.boxes().iter().map(|b| b.id.clone()).collect();
    for stale in remote.iter().filter(|r| !local_ids.contains(&r.id)) {
        match backend.delete_box(&stale.id) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                log::warn!("failed to delete box {}: {}", stale.id, e);
                report.failed += 1;
            }
        }
    }

    let to_save: Vec<AnnotationBox> = store.boxes().to_vec();
    for bx in to_save {
        let exists_remotely = remote.iter().any(|r| r.id == bx.id);
        let result = if exists_remotely {
            backend.update_box(&bx)
        } else if bx.accepted {
            backend.create_box(&bx)
        } else {
            report.skipped_pending += 1;
            continue;
        };
        match result {
            Ok(()) => {
                if exists_remotely {
                    report.updated += 1;
                } else {
                    report.created += 1;
                }
                store.mark_saved(&bx.id);
            }
            Err(e) => {
                log::warn!("failed to persist box {}: {}", bx.id, e);
                report.failed += 1;
            }
        }
    }

    log::info!(
        "box sync: {} created, {} updated, {} deleted, {} pending, {} failed",
        report.created,
        report.updated,
        report.deleted,
        report.skipped_pending,
        report.failed
    );
    Ok(report)
}

/// A whole-file JSON backend: the stored form is a flat list of wire
/// boxes across datasets. Enough for headless tooling and tests; the
/// REST client implements the same trait elsewhere.
pub struct JsonFileBackend {
    pub path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Vec<WireBox>, BackendError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, boxes: &[WireBox]) -> Result<(), BackendError> {
        let raw = serde_json::to_string_pretty(boxes)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl BoxBackend for JsonFileBackend {
    fn fetch_boxes(&self, dataset_id: &str) -> Result<Vec<AnnotationBox>, BackendError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|b| b.dataset_id == dataset_id)
            .map(WireBox::into_model)
            .collect())
    }

    fn create_box(&mut self, bx: &AnnotationBox) -> Result<(), BackendError> {
        let mut all = self.read_all()?;
        all.push(WireBox::from_model(bx));
        self.write_all(&all)
    }

    fn update_box(&mut self, bx: &AnnotationBox) -> Result<(), BackendError> {
        let mut all = self.read_all()?;
        match all.iter_mut().find(|w| w.id == bx.id) {
            Some(slot) => *slot = WireBox::from_model(bx),
            None => all.push(WireBox::from_model(bx)),
        }
        self.write_all(&all)
    }

    fn delete_box(&mut self, id: &str) -> Result<(), BackendError> {
        let mut all = self.read_all()?;
        all.retain(|w| w.id != id);
        self.write_all(&all)
    }
}
