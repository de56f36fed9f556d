use thiserror::Error;

use crate::pointcloud::cloud::DecodedCloud;

pub mod bin;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read point buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("stride must be at least 3 floats per record, got {stride}")]
    StrideTooSmall { stride: usize },
    #[error("decimation factor must be at least 1")]
    InvalidDecimation,
    #[error("buffer length {len} is not a multiple of 4 bytes")]
    UnalignedBuffer { len: usize },
    #[error("buffer holds {floats} floats, not a whole number of {stride}-float records")]
    PartialRecord { floats: usize, stride: usize },
}

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    fn parse(&self) -> Result<DecodedCloud, ParseError>;
}
