use crate::{
    height_field::HeightField,
    loader::HeightFieldLoader,
    result::TilingResult,
};
use std::{fs, path::Path};

/// Loads a CSV export of an elevation raster, one raster row per line.
///
/// Raster exports commonly carry a header line and a leading index column
/// with row labels; both are skipped by default. Blank cells load as `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct CsvLoader {
    pub skip_header: bool,
    pub skip_index_column: bool,
}

impl CsvLoader {
    pub const DEFAULT: Self = Self {
        skip_header: true,
        skip_index_column: true,
    };

    pub fn parse(&self, text: &str) -> TilingResult<HeightField> {
        let rows = text
            .lines()
            .skip(self.skip_header as usize)
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(',')
                    .skip(self.skip_index_column as usize)
                    .map(|value| {
                        let value = value.trim();
                        if value.is_empty() {
                            Ok(0.0)
                        } else {
                            Ok(value.parse::<f32>()?)
                        }
                    })
                    .collect::<TilingResult<Vec<f32>>>()
            })
            .collect::<TilingResult<Vec<_>>>()?;

        HeightField::from_rows(rows)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl HeightFieldLoader for CsvLoader {
    fn load(&self, path: &Path) -> TilingResult<HeightField> {
        self.parse(&fs::read_to_string(path)?)
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }
}
