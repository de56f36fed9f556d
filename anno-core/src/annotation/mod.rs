pub mod bbox;
pub mod dataset;
pub mod label;
