//! Converts a digital elevation raster into a tiled set of seam-consistent
//! 3D terrain meshes, plus optional decimated collider proxies.
//!
//! The pipeline is a chain of pure steps: a [`height_field::HeightField`]
//! answers sample queries, the [`planner::TileGridPlanner`] carves it into
//! overlapping tile windows, [`tessellate::tessellate`] turns each window
//! into a regular grid surface, and the [`builder::TerrainBuilder`] places
//! and names the tiles. Adjacent windows share one row/column of samples, so
//! the finished tiles abut without cracks; the [`collider`] simplifier
//! preserves exactly those shared boundary vertices while decimating.

pub mod builder;
pub mod cli;
pub mod collider;
pub mod height_field;
pub mod loader;
pub mod planner;
pub mod progress;
pub mod result;
pub mod tessellate;
pub mod tile;

pub mod prelude {
    pub use crate::{
        builder::{TerrainBuilder, TerrainConfig},
        cli::{Cli, GenerateBar},
        collider::{simplify, ColliderConfig, COLLIDER_SUFFIX},
        height_field::HeightField,
        loader::{load_height_field, CsvLoader, GeoTiffLoader, HeightFieldLoader},
        planner::{EdgeCorrection, TileGridPlanner, TileWindow},
        progress::ProgressCallback,
        result::{TilingError, TilingResult},
        tessellate::{tessellate, TileMesh},
        tile::{TerrainTile, TileSet},
    };
}
