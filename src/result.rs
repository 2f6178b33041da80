use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilingError {
    #[error("height sample ({row}, {col}) is outside of the {rows}x{cols} field")]
    OutOfRange {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
    #[error("ragged raster input: row {row} has {length} samples, expected {expected}")]
    MalformedInput {
        row: usize,
        length: usize,
        expected: usize,
    },
    #[error(
        "tile ({row_index}, {col_index}) needs samples up to ({row_end}, {col_end}), \
         but the field is {rows}x{cols}"
    )]
    WindowOutOfBounds {
        row_index: u32,
        col_index: u32,
        row_end: u32,
        col_end: u32,
        rows: u32,
        cols: u32,
    },
    #[error("tessellation requires a square window, got {width}x{height}")]
    InvalidWindowShape { width: u32, height: u32 },
    #[error("decimation stopped at a ratio of {achieved}, requested {target}")]
    DecimationFailure { achieved: f32, target: f32 },
    #[error("tile {0} has already been simplified")]
    AlreadySimplified(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("parse error")]
    Parse(#[from] ParseFloatError),
    #[error("tiff error")]
    Tiff(#[from] tiff::TiffError),
}

pub type TilingResult<T> = Result<T, TilingError>;
