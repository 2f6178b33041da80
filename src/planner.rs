use crate::result::{TilingError, TilingResult};
use glam::UVec2;
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// Shifts the window origin of the tiles at the far edge of the grid inward,
/// compensating for accumulated rounding at the raster's last row/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCorrection {
    /// Tile index at which the shift applies.
    pub boundary: u32,
    /// Samples to shift inward.
    pub offset: u32,
}

impl Default for EdgeCorrection {
    fn default() -> Self {
        Self {
            boundary: 9,
            offset: 1,
        }
    }
}

/// One tile's source region within the height field.
///
/// Adjacent windows share exactly one row or column of samples at their
/// common edge, so the tessellated tiles line up without cracks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileWindow {
    pub row_index: u32,
    pub col_index: u32,
    pub row_min: u32,
    pub col_min: u32,
    /// Sample extent along columns / world x.
    pub width: u32,
    /// Sample extent along rows / world y.
    pub height: u32,
    /// Sample units to world units.
    pub scale: f32,
}

impl TileWindow {
    /// Deterministic tile name, unique per (indices, extent, scale).
    pub fn name(&self) -> String {
        format!(
            "x{}y{}_tile_width{}_height{}_scale{}",
            self.col_index, self.row_index, self.width, self.height, self.scale
        )
    }
}

/// Computes the rectangular sub-window owned by each tile of the grid.
#[derive(Debug, Clone)]
pub struct TileGridPlanner {
    pub row_tile_count: u32,
    pub col_tile_count: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub scale: f32,
    pub edge_correction: Option<EdgeCorrection>,
}

impl TileGridPlanner {
    /// Plans all tile windows in row-major order.
    /// `extent` is the height field size as (cols, rows).
    pub fn plan_tiles(&self, extent: UVec2) -> TilingResult<Vec<TileWindow>> {
        iproduct!(0..self.row_tile_count, 0..self.col_tile_count)
            .map(|(row_index, col_index)| self.window(row_index, col_index, extent))
            .collect()
    }

    fn window(&self, row_index: u32, col_index: u32, extent: UVec2) -> TilingResult<TileWindow> {
        // The -1 overlap makes neighbouring tiles share their outer sample
        // row/column.
        let mut row_min = row_index * (self.tile_height - 1);
        let mut col_min = col_index * (self.tile_width - 1);

        if let Some(correction) = self.edge_correction {
            // Saturating: there is nothing to shift inward at the raster origin.
            if row_index == correction.boundary {
                row_min = row_min.saturating_sub(correction.offset);
            }
            if col_index == correction.boundary {
                col_min = col_min.saturating_sub(correction.offset);
            }
        }

        let row_end = row_min + self.tile_height;
        let col_end = col_min + self.tile_width;

        if row_end > extent.y || col_end > extent.x {
            return Err(TilingError::WindowOutOfBounds {
                row_index,
                col_index,
                row_end,
                col_end,
                rows: extent.y,
                cols: extent.x,
            });
        }

        Ok(TileWindow {
            row_index,
            col_index,
            row_min,
            col_min,
            width: self.tile_width,
            height: self.tile_height,
            scale: self.scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(tile_size: u32, count: u32) -> TileGridPlanner {
        TileGridPlanner {
            row_tile_count: count,
            col_tile_count: count,
            tile_width: tile_size,
            tile_height: tile_size,
            scale: 1.0,
            edge_correction: None,
        }
    }

    #[test]
    fn adjacent_windows_share_one_sample_row_and_column() {
        let windows = planner(251, 2).plan_tiles(UVec2::splat(501)).unwrap();

        assert_eq!(windows.len(), 4);

        // Row-major: (0,0), (0,1), (1,0), (1,1).
        let &[a, b, c, d] = &windows[..] else { panic!() };

        assert_eq!(a.col_min + a.width - 1, b.col_min);
        assert_eq!(a.row_min + a.height - 1, c.row_min);
        assert_eq!(b.row_min + b.height - 1, d.row_min);
        assert_eq!(c.col_min + c.width - 1, d.col_min);

        // Far edges land exactly on the raster extent.
        assert_eq!(d.row_min + d.height, 501);
        assert_eq!(d.col_min + d.width, 501);
    }

    #[test]
    fn coverage_has_no_gaps() {
        let windows = planner(5, 3).plan_tiles(UVec2::splat(13)).unwrap();

        let mut covered = vec![vec![false; 13]; 13];
        for window in &windows {
            for row in window.row_min..window.row_min + window.height {
                for col in window.col_min..window.col_min + window.width {
                    covered[row as usize][col as usize] = true;
                }
            }
        }

        assert!(covered.iter().flatten().all(|&sample| sample));
    }

    #[test]
    fn windows_exceeding_the_field_fail() {
        let result = planner(251, 2).plan_tiles(UVec2::splat(500));

        // The first failing window in row-major order is (0, 1).
        assert!(matches!(
            result,
            Err(TilingError::WindowOutOfBounds {
                row_index: 0,
                col_index: 1,
                col_end: 501,
                cols: 500,
                ..
            })
        ));
    }

    #[test]
    fn edge_correction_shifts_the_boundary_tile_inward() {
        let mut planner = planner(3, 2);
        planner.edge_correction = Some(EdgeCorrection {
            boundary: 1,
            offset: 1,
        });

        let windows = planner.plan_tiles(UVec2::splat(5)).unwrap();

        assert_eq!((windows[0].row_min, windows[0].col_min), (0, 0));
        assert_eq!((windows[1].row_min, windows[1].col_min), (0, 1));
        assert_eq!((windows[3].row_min, windows[3].col_min), (1, 1));
    }

    #[test]
    fn names_are_unique_and_deterministic() {
        let windows = planner(3, 2).plan_tiles(UVec2::splat(5)).unwrap();
        let names: Vec<_> = windows.iter().map(TileWindow::name).collect();

        assert_eq!(names[0], "x0y0_tile_width3_height3_scale1");
        assert_eq!(names[3], "x1y1_tile_width3_height3_scale1");
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|name| names
            .iter()
            .filter(|other| *other == name)
            .count()
            == 1));
    }
}
