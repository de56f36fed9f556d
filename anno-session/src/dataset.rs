use std::path::PathBuf;

use anno_core::annotation::dataset::Dataset;

use crate::sync::BackendError;
use crate::wire::WireDataset;

/// Read-only dataset access. The engine never mutates dataset records;
/// it only needs to resolve them for ego poses and label lists, and it
/// must tolerate absent or empty data.
pub trait DatasetSource {
    fn fetch_datasets(&self) -> Result<Vec<Dataset>, BackendError>;

    fn dataset_by_id(&self, id: &str) -> Result<Option<Dataset>, BackendError> {
        Ok(self.fetch_datasets()?.into_iter().find(|d| d.id == id))
    }
}

/// Dataset records stored as a JSON list on disk. A missing file reads
/// as no datasets.
pub struct JsonFileDatasets {
    pub path: PathBuf,
}

impl JsonFileDatasets {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for JsonFileDatasets {
    fn fetch_datasets(&self) -> Result<Vec<Dataset>, BackendError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<WireDataset> = serde_json::from_str(&raw)?;
        Ok(records.into_iter().map(WireDataset::into_model).collect())
    }
}
