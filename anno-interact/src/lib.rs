pub mod brush;
pub mod handles;
pub mod input;
pub mod obb;
pub mod ray;
pub mod two_point;

pub use brush::{BrushEngine, BrushState};
pub use handles::{HandleController, HandleKind};
pub use obb::{fit_yaw_obb, FittedObb};
pub use two_point::TwoPointEngine;
