mod csv;
mod geotiff;

pub use csv::CsvLoader;
pub use geotiff::GeoTiffLoader;

use crate::{
    height_field::HeightField,
    result::{TilingError, TilingResult},
};
use std::{ffi::OsStr, path::Path};

/// Parses one elevation source format into a [`HeightField`].
pub trait HeightFieldLoader {
    fn load(&self, path: &Path) -> TilingResult<HeightField>;

    fn extensions(&self) -> &[&str];
}

/// Picks the loader matching the file extension.
pub fn load_height_field(path: &Path) -> TilingResult<HeightField> {
    let loaders: [&dyn HeightFieldLoader; 2] = [&CsvLoader::DEFAULT, &GeoTiffLoader];
    let extension = path.extension().and_then(OsStr::to_str).unwrap_or_default();

    for loader in loaders {
        if loader.extensions().contains(&extension) {
            return loader.load(path);
        }
    }

    Err(TilingError::InvalidConfiguration(
        "unsupported elevation source format",
    ))
}
