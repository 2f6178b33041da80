use crate::result::{TilingError, TilingResult};
use glam::UVec2;
use ndarray::Array2;

/// A rectangular grid of elevation samples, indexed by (row, col).
/// Immutable once constructed; the whole generation run borrows it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    samples: Array2<f32>,
}

impl HeightField {
    pub fn new(samples: Array2<f32>) -> Self {
        Self { samples }
    }

    /// Builds a field from nested rows, validating that the input is rectangular.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> TilingResult<Self> {
        let expected = rows.first().map_or(0, Vec::len);

        for (row, samples) in rows.iter().enumerate() {
            if samples.len() != expected {
                return Err(TilingError::MalformedInput {
                    row,
                    length: samples.len(),
                    expected,
                });
            }
        }

        let count = rows.len();
        let samples = rows.into_iter().flatten().collect();

        Ok(Self {
            samples: Array2::from_shape_vec((count, expected), samples).unwrap(),
        })
    }

    pub fn rows(&self) -> u32 {
        self.samples.nrows() as u32
    }

    pub fn cols(&self) -> u32 {
        self.samples.ncols() as u32
    }

    /// Extent as (cols, rows), matching the world (x, y) axes.
    pub fn extent(&self) -> UVec2 {
        UVec2::new(self.cols(), self.rows())
    }

    pub fn height_at(&self, row: u32, col: u32) -> TilingResult<f32> {
        self.samples
            .get((row as usize, col as usize))
            .copied()
            .ok_or(TilingError::OutOfRange {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }
}
