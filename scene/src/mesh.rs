//! Immutable indexed triangle geometry.
//!
//! `MeshData` mirrors what the renderer hands us: a vertex position buffer
//! plus an optional triangle index. Operations that need triangles (volume,
//! collision baking) require the index; un-indexed meshes are a hard error
//! at those call sites. Degenerate (zero-area) triangles are tolerated and
//! never filtered.

use nalgebra as na;

pub type Point3 = na::Point3<f32>;

#[derive(Clone, Debug)]
pub struct MeshData {
    positions: Vec<Point3>,
    indices: Option<Vec<[u32; 3]>>,
}

impl MeshData {
    /// Indexed triangle mesh.
    pub fn indexed(positions: Vec<Point3>, indices: Vec<[u32; 3]>) -> Self {
        debug_assert!(
            indices
                .iter()
                .flatten()
                .all(|&i| (i as usize) < positions.len()),
            "triangle index out of range"
        );
        Self {
            positions,
            indices: Some(indices),
        }
    }

    /// Position buffer without a triangle index (e.g. point or line data).
    pub fn unindexed(positions: Vec<Point3>) -> Self {
        Self {
            positions,
            indices: None,
        }
    }

    #[inline]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangle index, if this mesh has one.
    #[inline]
    pub fn indices(&self) -> Option<&[[u32; 3]]> {
        self.indices.as_deref()
    }

    /// Number of indexed triangles (0 when un-indexed).
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.as_ref().map_or(0, Vec::len)
    }

    /// Iterate indexed triangles as vertex triples.
    ///
    /// Returns `None` when the mesh has no triangle index; callers turn
    /// that into their own malformed-geometry error.
    pub fn triangles(&self) -> Option<impl Iterator<Item = [Point3; 3]> + '_> {
        let indices = self.indices.as_deref()?;
        let positions = &self.positions;
        Some(indices.iter().map(move |&[a, b, c]| {
            [
                positions[a as usize],
                positions[b as usize],
                positions[c as usize],
            ]
        }))
    }

    /// Axis-aligned box centered at the origin with the given half-extents,
    /// wound counter-clockwise when viewed from outside.
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        let positions = vec![
            Point3::new(-hx, -hy, -hz), // 0
            Point3::new(hx, -hy, -hz),  // 1
            Point3::new(hx, hy, -hz),   // 2
            Point3::new(-hx, hy, -hz),  // 3
            Point3::new(-hx, -hy, hz),  // 4
            Point3::new(hx, -hy, hz),   // 5
            Point3::new(hx, hy, hz),    // 6
            Point3::new(-hx, hy, hz),   // 7
        ];
        let indices = vec![
            [4, 5, 6],
            [4, 6, 7], // +Z
            [1, 0, 3],
            [1, 3, 2], // -Z
            [5, 1, 2],
            [5, 2, 6], // +X
            [0, 4, 7],
            [0, 7, 3], // -X
            [7, 6, 2],
            [7, 2, 3], // +Y
            [0, 1, 5],
            [0, 5, 4], // -Y
        ];
        Self::indexed(positions, indices)
    }

    /// Same mesh with every triangle's winding reversed.
    pub fn reversed_winding(&self) -> Self {
        Self {
            positions: self.positions.clone(),
            indices: self
                .indices
                .as_ref()
                .map(|tris| tris.iter().map(|&[a, b, c]| [a, c, b]).collect()),
        }
    }
}
