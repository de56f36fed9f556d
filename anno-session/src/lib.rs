pub mod dataset;
pub mod export;
pub mod store;
pub mod sync;
pub mod wire;

pub use dataset::{DatasetSource, JsonFileDatasets};
pub use store::BoxStore;
pub use sync::{save_boxes, BackendError, BoxBackend, JsonFileBackend, SyncReport};
