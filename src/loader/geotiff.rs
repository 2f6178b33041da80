use crate::{
    height_field::HeightField,
    loader::HeightFieldLoader,
    result::{TilingError, TilingResult},
};
use ndarray::Array2;
use num::ToPrimitive;
use std::{fs::File, io::BufReader, path::Path};
use tiff::decoder::{Decoder, DecodingResult};

/// Loads the first image of a (geo)TIFF elevation raster.
///
/// Georeferencing tags are ignored; the pipeline works in sample space and
/// applies its own scale. Every sample type converts to `f32`.
pub struct GeoTiffLoader;

impl HeightFieldLoader for GeoTiffLoader {
    fn load(&self, path: &Path) -> TilingResult<HeightField> {
        let mut decoder = Decoder::new(BufReader::new(File::open(path)?))?;
        let (width, height) = decoder.dimensions()?;

        let samples = match decoder.read_image()? {
            DecodingResult::U8(data) => convert_samples(&data),
            DecodingResult::U16(data) => convert_samples(&data),
            DecodingResult::U32(data) => convert_samples(&data),
            DecodingResult::U64(data) => convert_samples(&data),
            DecodingResult::I8(data) => convert_samples(&data),
            DecodingResult::I16(data) => convert_samples(&data),
            DecodingResult::I32(data) => convert_samples(&data),
            DecodingResult::I64(data) => convert_samples(&data),
            DecodingResult::F32(data) => convert_samples(&data),
            DecodingResult::F64(data) => convert_samples(&data),
        }?;

        let expected = width as usize * height as usize;
        let length = samples.len();

        let samples = Array2::from_shape_vec((height as usize, width as usize), samples)
            .map_err(|_| TilingError::MalformedInput {
                row: height as usize,
                length,
                expected,
            })?;

        Ok(HeightField::new(samples))
    }

    fn extensions(&self) -> &[&str] {
        &["tif", "tiff"]
    }
}

fn convert_samples<T: ToPrimitive>(data: &[T]) -> TilingResult<Vec<f32>> {
    data.iter()
        .map(|value| {
            value.to_f32().ok_or(TilingError::InvalidConfiguration(
                "raster sample does not fit into f32",
            ))
        })
        .collect()
}
