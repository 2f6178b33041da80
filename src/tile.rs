use crate::tessellate::TileMesh;
use glam::Vec3;

/// One positioned terrain mesh, immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTile {
    pub name: String,
    pub mesh: TileMesh,
    /// World-space offset of the tile origin.
    pub placement: Vec3,
    /// Set once the tile went through the collider simplifier; re-simplifying
    /// a tagged tile is a no-op.
    pub collider: bool,
}

/// All tiles of one generation run, in row-major tile order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TileSet {
    pub tiles: Vec<TerrainTile>,
    /// Empty, or parallel to `tiles`.
    pub colliders: Vec<TerrainTile>,
}

impl TileSet {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.tiles.iter().map(|tile| tile.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.tiles
            .iter()
            .map(|tile| tile.mesh.triangle_count())
            .sum()
    }
}
