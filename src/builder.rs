use crate::{
    collider::{simplify, ColliderConfig},
    height_field::HeightField,
    planner::{EdgeCorrection, TileGridPlanner, TileWindow},
    progress::{ProgressCallback, ProgressCounter},
    result::{TilingError, TilingResult},
    tessellate::tessellate,
    tile::{TerrainTile, TileSet},
};
use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    pub row_tile_count: u32,
    pub col_tile_count: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub scale: f32,
    pub edge_correction: Option<EdgeCorrection>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            row_tile_count: 1,
            col_tile_count: 1,
            tile_width: 251,
            tile_height: 251,
            scale: 1.0,
            edge_correction: None,
        }
    }
}

impl TerrainConfig {
    pub fn load_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(ron::from_str(&fs::read_to_string(path)?)?)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        fs::write(
            path,
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?,
        )?;
        Ok(())
    }

    fn validate(&self) -> TilingResult<()> {
        if self.row_tile_count == 0 || self.col_tile_count == 0 {
            return Err(TilingError::InvalidConfiguration(
                "tile counts must be positive",
            ));
        }
        if self.tile_width < 2 || self.tile_height < 2 {
            return Err(TilingError::InvalidConfiguration(
                "tile extents must span at least two samples",
            ));
        }
        if !(self.scale > 0.0) {
            return Err(TilingError::InvalidConfiguration("scale must be positive"));
        }

        Ok(())
    }

    fn planner(&self) -> TileGridPlanner {
        TileGridPlanner {
            row_tile_count: self.row_tile_count,
            col_tile_count: self.col_tile_count,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            scale: self.scale,
            edge_correction: self.edge_correction,
        }
    }
}

/// Runs the whole pipeline: plan the tile grid, tessellate every window,
/// place and name the tiles, aggregate them in row-major order.
pub struct TerrainBuilder {
    config: TerrainConfig,
}

impl TerrainBuilder {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn build(&self, field: &HeightField) -> TilingResult<TileSet> {
        self.build_with_progress(field, None)
    }

    /// Fails fast: the first tile error aborts the run and all partial
    /// results are discarded.
    pub fn build_with_progress(
        &self,
        field: &HeightField,
        progress_callback: Option<&ProgressCallback>,
    ) -> TilingResult<TileSet> {
        self.config.validate()?;

        let windows = self.config.planner().plan_tiles(field.extent())?;
        let progress = ProgressCounter::new(windows.len() as u64, progress_callback);

        // Tiles only read the shared field, so they generate in parallel;
        // collecting the indexed iterator keeps the row-major order.
        let tiles = windows
            .par_iter()
            .map(|window| {
                let mesh = tessellate(field, window)?;
                progress.increment();

                Ok(TerrainTile {
                    name: window.name(),
                    mesh,
                    placement: placement(window),
                    collider: false,
                })
            })
            .collect::<TilingResult<Vec<_>>>()?;

        Ok(TileSet {
            tiles,
            colliders: Vec::new(),
        })
    }

    pub fn build_with_colliders(
        &self,
        field: &HeightField,
        collider_config: &ColliderConfig,
    ) -> TilingResult<TileSet> {
        self.build_with_colliders_and_progress(field, collider_config, None)
    }

    pub fn build_with_colliders_and_progress(
        &self,
        field: &HeightField,
        collider_config: &ColliderConfig,
        progress_callback: Option<&ProgressCallback>,
    ) -> TilingResult<TileSet> {
        let mut tile_set = self.build_with_progress(field, progress_callback)?;

        tile_set.colliders = tile_set
            .tiles
            .par_iter()
            .map(|tile| simplify(tile, collider_config))
            .collect::<TilingResult<Vec<_>>>()?;

        Ok(tile_set)
    }
}

/// World-space offset of a tile; the `- scale * index` term compensates for
/// the one-sample seam overlap so neighbouring tiles abut exactly.
fn placement(window: &TileWindow) -> Vec3 {
    Vec3::new(
        (window.col_index * window.width) as f32 * window.scale
            - window.scale * window.col_index as f32,
        (window.row_index * window.height) as f32 * window.scale
            - window.scale * window.row_index as f32,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_field(size: u32) -> HeightField {
        let mut rng = rand::rng();
        HeightField::from_rows(
            (0..size)
                .map(|_| (0..size).map(|_| rng.random_range(0.0..25.0)).collect())
                .collect(),
        )
        .unwrap()
    }

    fn config(count: u32, tile_size: u32, scale: f32) -> TerrainConfig {
        TerrainConfig {
            row_tile_count: count,
            col_tile_count: count,
            tile_width: tile_size,
            tile_height: tile_size,
            scale,
            edge_correction: None,
        }
    }

    #[test]
    fn tiles_come_out_in_row_major_order() {
        let tile_set = TerrainBuilder::new(config(2, 3, 1.0))
            .build(&random_field(5))
            .unwrap();

        let names: Vec<_> = tile_set.tiles.iter().map(|tile| tile.name.as_str()).collect();

        assert_eq!(
            names,
            [
                "x0y0_tile_width3_height3_scale1",
                "x1y0_tile_width3_height3_scale1",
                "x0y1_tile_width3_height3_scale1",
                "x1y1_tile_width3_height3_scale1",
            ]
        );
    }

    #[test]
    fn seams_align_in_world_space() {
        let field = random_field(9);
        let tile_set = TerrainBuilder::new(config(2, 5, 2.5))
            .build(&field)
            .unwrap();

        let [a, b, c, _] = &tile_set.tiles[..] else {
            panic!()
        };

        // Right column of (0, 0) against the left column of (0, 1).
        for row in 0..5u32 {
            let right = a.placement + a.mesh.vertices[(row * 5 + 4) as usize];
            let left = b.placement + b.mesh.vertices[(row * 5) as usize];
            assert_eq!(right, left);
        }

        // Bottom row of (0, 0) against the top row of (1, 0).
        for col in 0..5u32 {
            let far = a.placement + a.mesh.vertices[(4 * 5 + col) as usize];
            let near = c.placement + c.mesh.vertices[col as usize];
            assert_eq!(far, near);
        }
    }

    #[test]
    fn a_failing_tile_aborts_the_whole_run() {
        // A 2x2 grid of 5-sample tiles needs 9 samples, the field has 8.
        let result = TerrainBuilder::new(config(2, 5, 1.0)).build(&random_field(8));

        assert!(matches!(
            result,
            Err(TilingError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let field = random_field(5);

        for config in [
            config(0, 3, 1.0),
            config(1, 1, 1.0),
            config(1, 3, 0.0),
            config(1, 3, -2.0),
        ] {
            let result = TerrainBuilder::new(config).build(&field);
            assert!(matches!(result, Err(TilingError::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn colliders_parallel_the_tiles() {
        let tile_set = TerrainBuilder::new(config(2, 9, 1.0))
            .build_with_colliders(
                &random_field(17),
                &ColliderConfig {
                    target_ratio: 0.5,
                    strict: false,
                },
            )
            .unwrap();

        assert_eq!(tile_set.colliders.len(), tile_set.tiles.len());

        for (tile, collider) in tile_set.tiles.iter().zip(&tile_set.colliders) {
            assert_eq!(collider.name, format!("{}_collider", tile.name));
            assert_eq!(collider.placement, tile.placement);
            assert!(collider.mesh.triangle_count() <= tile.mesh.triangle_count() / 2);
        }
    }

    #[test]
    fn config_files_round_trip() {
        let path = std::env::temp_dir().join("demtile_config_round_trip.ron");
        let config = TerrainConfig {
            edge_correction: Some(EdgeCorrection::default()),
            ..TerrainConfig::default()
        };

        config.save_file(&path).unwrap();
        let loaded = TerrainConfig::load_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config, loaded);
    }
}
