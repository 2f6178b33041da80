use crate::{
    result::{TilingError, TilingResult},
    tessellate::TileMesh,
    tile::TerrainTile,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

/// Appended to the source tile's name; consumers group colliders by it.
/// Never parsed back, the [`TerrainTile::collider`] tag carries the state.
pub const COLLIDER_SUFFIX: &str = "_collider";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderConfig {
    /// Fraction of triangles the collider retains.
    pub target_ratio: f32,
    /// Fail on re-simplification instead of silently returning the input.
    pub strict: bool,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            target_ratio: 0.05,
            strict: false,
        }
    }
}

/// Derives a decimated collider proxy co-located with the source tile.
///
/// Boundary vertices keep their exact positions, so the seams shared with
/// neighbouring tiles stay aligned.
pub fn simplify(tile: &TerrainTile, config: &ColliderConfig) -> TilingResult<TerrainTile> {
    if !(config.target_ratio > 0.0 && config.target_ratio <= 1.0) {
        return Err(TilingError::InvalidConfiguration(
            "collider target ratio must lie in (0, 1]",
        ));
    }

    if tile.collider {
        if config.strict {
            return Err(TilingError::AlreadySimplified(tile.name.clone()));
        }
        return Ok(tile.clone());
    }

    let mesh = Decimator::new(&tile.mesh).run(config.target_ratio)?;

    Ok(TerrainTile {
        name: format!("{}{}", tile.name, COLLIDER_SUFFIX),
        mesh,
        placement: tile.placement,
        collider: true,
    })
}

/// A collapse of `from` onto the position of `to`.
struct Candidate {
    cost: f32,
    from: u32,
    to: u32,
    /// Neighbourhood stamp of `from` at push time; a mismatch at pop time
    /// means the cost is stale.
    stamp: u64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed, so the max-heap pops the cheapest collapse first.
        other.cost.total_cmp(&self.cost)
    }
}

/// Greedy half-edge collapse. Interior vertices collapse onto a neighbour;
/// surviving vertices never move, which keeps the tile boundary exact.
struct Decimator {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    alive: Vec<bool>,
    /// Alive triangles incident to each vertex.
    incident: Vec<Vec<u32>>,
    boundary: Vec<bool>,
    collapsed: Vec<bool>,
    stamps: Vec<u64>,
    live_triangles: usize,
    heap: BinaryHeap<Candidate>,
}

impl Decimator {
    fn new(mesh: &TileMesh) -> Self {
        let vertex_count = mesh.vertices.len();
        let triangle_count = mesh.triangles.len();

        let mut incident = vec![Vec::new(); vertex_count];
        let mut edges = HashMap::new();

        for (triangle_id, triangle) in mesh.triangles.iter().enumerate() {
            for (a, b) in triangle_edges(triangle) {
                incident[a as usize].push(triangle_id as u32);
                *edges.entry((a.min(b), a.max(b))).or_insert(0u32) += 1;
            }
        }

        let mut boundary = vec![false; vertex_count];
        for (&(a, b), &count) in &edges {
            if count == 1 {
                boundary[a as usize] = true;
                boundary[b as usize] = true;
            }
        }

        let mut decimator = Self {
            positions: mesh.vertices.clone(),
            triangles: mesh.triangles.clone(),
            alive: vec![true; triangle_count],
            incident,
            boundary,
            collapsed: vec![false; vertex_count],
            stamps: vec![0; vertex_count],
            live_triangles: triangle_count,
            heap: BinaryHeap::new(),
        };

        for vertex in 0..vertex_count as u32 {
            decimator.push_candidates(vertex);
        }

        decimator
    }

    fn run(mut self, target_ratio: f32) -> TilingResult<TileMesh> {
        let original = self.live_triangles;
        let target = (original as f32 * target_ratio).floor() as usize;

        while self.live_triangles > target {
            let Some(candidate) = self.heap.pop() else {
                return Err(TilingError::DecimationFailure {
                    achieved: self.live_triangles as f32 / original as f32,
                    target: target_ratio,
                });
            };

            if self.valid(&candidate) {
                self.collapse(candidate.from, candidate.to);
            }
        }

        Ok(self.into_mesh())
    }

    fn valid(&self, candidate: &Candidate) -> bool {
        !self.collapsed[candidate.from as usize]
            && !self.collapsed[candidate.to as usize]
            && self.stamps[candidate.from as usize] == candidate.stamp
            && self.edge_exists(candidate.from, candidate.to)
            && !self.flips_a_triangle(candidate.from, candidate.to)
    }

    fn edge_exists(&self, from: u32, to: u32) -> bool {
        self.incident[from as usize]
            .iter()
            .any(|&triangle| self.triangles[triangle as usize].contains(&to))
    }

    /// A collapse must not turn any surviving triangle over; a non-positive
    /// projected normal also covers the degenerate (collinear) case.
    fn flips_a_triangle(&self, from: u32, to: u32) -> bool {
        self.incident[from as usize].iter().any(|&triangle| {
            let corners = self.triangles[triangle as usize];
            if corners.contains(&to) {
                return false; // dies with the collapse
            }

            let [a, b, c] = corners.map(|corner| {
                let corner = if corner == from { to } else { corner };
                self.positions[corner as usize]
            });

            (b - a).cross(c - a).z <= 0.0
        })
    }

    fn collapse(&mut self, from: u32, to: u32) {
        let star = std::mem::take(&mut self.incident[from as usize]);
        let mut touched = vec![to];

        for &triangle_id in &star {
            let corners = self.triangles[triangle_id as usize];

            for corner in corners {
                if corner != from && !touched.contains(&corner) {
                    touched.push(corner);
                }
            }

            if corners.contains(&to) {
                // Degenerates to a line once from and to coincide.
                self.alive[triangle_id as usize] = false;
                self.live_triangles -= 1;

                for corner in corners {
                    if corner != from {
                        self.incident[corner as usize].retain(|&other| other != triangle_id);
                    }
                }
            } else {
                for corner in &mut self.triangles[triangle_id as usize] {
                    if *corner == from {
                        *corner = to;
                    }
                }
                self.incident[to as usize].push(triangle_id);
            }
        }

        self.collapsed[from as usize] = true;

        // The stars of every touched vertex changed, so their cached collapse
        // costs are stale.
        for &vertex in &touched {
            self.stamps[vertex as usize] += 1;
        }
        for vertex in touched {
            self.push_candidates(vertex);
        }
    }

    fn push_candidates(&mut self, from: u32) {
        if self.boundary[from as usize] || self.collapsed[from as usize] {
            return;
        }

        let mut neighbours = Vec::new();
        for &triangle in &self.incident[from as usize] {
            for corner in self.triangles[triangle as usize] {
                if corner != from && !neighbours.contains(&corner) {
                    neighbours.push(corner);
                }
            }
        }

        for to in neighbours {
            self.heap.push(Candidate {
                cost: self.cost(from, to),
                from,
                to,
                stamp: self.stamps[from as usize],
            });
        }
    }

    /// Summed distance of the target position to the planes of the triangles
    /// around `from`; flat neighbourhoods collapse first.
    fn cost(&self, from: u32, to: u32) -> f32 {
        let step = self.positions[to as usize] - self.positions[from as usize];

        self.incident[from as usize]
            .iter()
            .map(|&triangle| {
                let [a, b, c] = self.triangles[triangle as usize]
                    .map(|corner| self.positions[corner as usize]);
                let normal = (b - a).cross(c - a).normalize_or_zero();

                normal.dot(step).abs()
            })
            .sum()
    }

    fn into_mesh(self) -> TileMesh {
        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();

        for (triangle, alive) in self.triangles.iter().zip(&self.alive) {
            if !alive {
                continue;
            }

            triangles.push(triangle.map(|corner| {
                if remap[corner as usize] == u32::MAX {
                    remap[corner as usize] = vertices.len() as u32;
                    vertices.push(self.positions[corner as usize]);
                }
                remap[corner as usize]
            }));
        }

        TileMesh {
            vertices,
            triangles,
        }
    }
}

fn triangle_edges(triangle: &[u32; 3]) -> [(u32, u32); 3] {
    let [a, b, c] = *triangle;
    [(a, b), (b, c), (c, a)]
}
