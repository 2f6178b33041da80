use crate::{
    height_field::HeightField,
    planner::TileWindow,
    result::{TilingError, TilingResult},
};
use glam::Vec3;
use itertools::iproduct;

/// Vertex and triangle buffers of one tile, in tile-local space.
///
/// Vertices are emitted row-major (outer loop over rows, inner over columns);
/// the triangulation below depends on that ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TileMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// Turns one tile window into a regular grid surface.
///
/// Pure function of its inputs; fails with [`TilingError::InvalidWindowShape`]
/// for non-square windows and propagates height queries outside the field.
pub fn tessellate(field: &HeightField, window: &TileWindow) -> TilingResult<TileMesh> {
    if window.width != window.height {
        return Err(TilingError::InvalidWindowShape {
            width: window.width,
            height: window.height,
        });
    }

    let vertices = iproduct!(0..window.height, 0..window.width)
        .map(|(y, x)| {
            let height = field.height_at(window.row_min + y, window.col_min + x)?;
            Ok(Vec3::new(x as f32, y as f32, height) * window.scale)
        })
        .collect::<TilingResult<Vec<_>>>()?;

    let triangles = triangulate(vertices.len());

    Ok(TileMesh {
        vertices,
        triangles,
    })
}

fn triangulate(vertex_count: usize) -> Vec<[u32; 3]> {
    // Tiles are always square, so the buffer is a sz * sz grid.
    let sz = (vertex_count as f64).sqrt() as u32;
    if sz < 2 {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(2 * ((sz - 1) * (sz - 1)) as usize);

    for (y, x) in iproduct!(0..sz - 1, 0..sz - 1) {
        let index = y * sz + x;
        add_quad(&mut triangles, index, index + 1, index + sz + 1, index + sz);
    }

    triangles
}

/// Splits the quad (a, b, c, d) into two counter-clockwise triangles, so the
/// surface faces +z.
#[inline]
fn add_quad(triangles: &mut Vec<[u32; 3]>, a: u32, b: u32, c: u32, d: u32) {
    triangles.push([a, b, c]);
    triangles.push([a, c, d]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: u32) -> HeightField {
        HeightField::from_rows(
            (0..size)
                .map(|row| (0..size).map(|col| (row * size + col) as f32).collect())
                .collect(),
        )
        .unwrap()
    }

    fn window(size: u32, scale: f32) -> TileWindow {
        TileWindow {
            row_index: 0,
            col_index: 0,
            row_min: 0,
            col_min: 0,
            width: size,
            height: size,
            scale,
        }
    }

    #[test]
    fn three_by_three_window_at_scale_two() {
        let mesh = tessellate(&field(10), &window(3, 2.0)).unwrap();

        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.triangle_count(), 8);

        let mut positions: Vec<(i32, i32)> = mesh
            .vertices
            .iter()
            .map(|vertex| (vertex.x as i32, vertex.y as i32))
            .collect();
        positions.sort();

        let mut expected: Vec<(i32, i32)> = [0, 2, 4]
            .iter()
            .flat_map(|&x| [0, 2, 4].iter().map(move |&y| (x, y)))
            .collect();
        expected.sort();

        assert_eq!(positions, expected);

        // z carries the scaled sample value.
        assert_eq!(mesh.vertices[0].z, 0.0);
        assert_eq!(mesh.vertices[1].z, 2.0);
        assert_eq!(mesh.vertices[3].z, 20.0);
    }

    #[test]
    fn buffer_sizes_follow_the_window_extent() {
        for size in 2..6 {
            let mesh = tessellate(&field(8), &window(size, 1.0)).unwrap();

            assert_eq!(mesh.vertex_count(), (size * size) as usize);
            assert_eq!(mesh.triangle_count(), (2 * (size - 1) * (size - 1)) as usize);
        }
    }

    #[test]
    fn degenerate_windows_yield_no_triangles() {
        let mesh = tessellate(&field(4), &window(1, 1.0)).unwrap();

        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn winding_is_counter_clockwise_everywhere() {
        let mesh = tessellate(&field(8), &window(6, 0.5)).unwrap();

        for &[a, b, c] in &mesh.triangles {
            let (a, b, c) = (
                mesh.vertices[a as usize],
                mesh.vertices[b as usize],
                mesh.vertices[c as usize],
            );
            let normal = (b - a).cross(c - a);

            assert!(normal.z > 0.0);
        }
    }

    #[test]
    fn non_square_windows_are_rejected() {
        let mut window = window(3, 1.0);
        window.height = 4;

        assert!(matches!(
            tessellate(&field(10), &window),
            Err(TilingError::InvalidWindowShape {
                width: 3,
                height: 4,
            })
        ));
    }

    #[test]
    fn windows_reaching_outside_the_field_fail() {
        let mut window = window(3, 1.0);
        window.row_min = 2;

        assert!(matches!(
            tessellate(&field(4), &window),
            Err(TilingError::OutOfRange { .. })
        ));
    }
}
