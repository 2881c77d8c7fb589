//! Bakes a render hierarchy into triangle-soup collision geometry.
//!
//! Every mesh-bearing node under the requested root has its vertices
//! transformed into world space (local TRS composed with all ancestor
//! transforms) and its triangles appended to one soup. The soup becomes a
//! single trimesh collision shape for the whole subtree, together with
//! per-submesh signed volumes and a volume-derived bounding radius.
//!
//! The walk uses an explicit stack carrying the accumulated ancestor
//! matrix, so hierarchy depth never touches the call stack. Sibling order
//! cannot affect the output: the soup is a union of triangles and the
//! volumes sum.

use nalgebra as na;
use rapier3d::prelude::SharedShape;

use scene::{Mat4, NodeId, SceneGraph};

use crate::error::GeometryError;
use crate::settings::{LITERS_PER_CUBIC_METER, RADIUS_LITERS_TO_METERS};
use crate::volume::signed_volume;

/// Output of a collision bake over one subtree.
#[derive(Debug)]
pub struct BakedCollision {
    /// Triangle soup covering every mesh in the subtree, in world space.
    pub shape: SharedShape,
    /// Total triangles emitted into the soup.
    pub triangle_count: usize,
    /// Signed volume (liters) of each mesh-bearing node, in visit order.
    pub submesh_volumes: Vec<f32>,
    /// Sum of the submesh volumes (liters).
    pub total_volume: f32,
    /// Equivalent-sphere radius (meters) derived from the total volume.
    pub bounding_radius: f32,
}

/// Radius (meters) of the sphere enclosing the given volume (liters).
///
/// `cbrt(v / (4/3 pi))` is a length in decimeters when `v` is in liters;
/// the scale constant brings it back to meters. The magnitude of the volume
/// is used so reversed-winding meshes still yield a usable radius.
#[inline]
pub fn equivalent_radius(volume_liters: f32) -> f32 {
    (volume_liters.abs() / (4.0 / 3.0 * std::f32::consts::PI)).cbrt() * RADIUS_LITERS_TO_METERS
}

/// Walk the subtree under `root` and bake all triangle geometry into one
/// world-space collision soup.
///
/// Fails on the first mesh-bearing node without a triangle index, and when
/// the subtree contains no triangle geometry at all.
pub fn bake_collision(graph: &SceneGraph, root: NodeId) -> Result<BakedCollision, GeometryError> {
    let mut vertices: Vec<na::Point3<f32>> = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();
    let mut submesh_volumes: Vec<f32> = Vec::new();

    // Ancestors of `root` still contribute to its world placement.
    let parent_acc = match graph.parent(root) {
        Some(p) => graph.world_matrix(p),
        None => Mat4::identity(),
    };

    let mut stack: Vec<(NodeId, Mat4)> = vec![(root, parent_acc)];
    while let Some((id, acc)) = stack.pop() {
        let node = graph.node(id);
        let world = acc * node.local.to_matrix();

        if let Some(mesh) = &node.mesh {
            let Some(tri_indices) = mesh.indices() else {
                return Err(GeometryError::UnindexedNode {
                    node: node.name.clone(),
                });
            };

            let base = vertices.len() as u32;
            vertices.extend(mesh.positions().iter().map(|p| world.transform_point(p)));
            indices.extend(
                tri_indices
                    .iter()
                    .map(|&[a, b, c]| [a + base, b + base, c + base]),
            );

            // Volume of this submesh from its world-baked triangles.
            let baked = &vertices[base as usize..];
            let v = signed_volume(tri_indices.iter().map(|&[a, b, c]| {
                [baked[a as usize], baked[b as usize], baked[c as usize]]
            })) * LITERS_PER_CUBIC_METER;
            submesh_volumes.push(v);

            log::debug!(
                "baked node `{}`: {} triangles, {:.3} L",
                node.name,
                tri_indices.len(),
                v
            );
        }

        for &c in graph.children(id) {
            stack.push((c, world));
        }
    }

    if indices.is_empty() {
        return Err(GeometryError::EmptySubtree {
            node: graph.node(root).name.clone(),
        });
    }

    let triangle_count = indices.len();
    let total_volume: f32 = submesh_volumes.iter().sum();
    let bounding_radius = equivalent_radius(total_volume);

    let shape = SharedShape::trimesh(vertices, indices)
        .map_err(|e| GeometryError::BadTrimesh(e.to_string()))?;

    Ok(BakedCollision {
        shape,
        triangle_count,
        submesh_volumes,
        total_volume,
        bounding_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{MeshData, Quat, Transform, Vec3};

    fn cube_pair_graph(swap_siblings: bool) -> (SceneGraph, NodeId) {
        let mut g = SceneGraph::new();
        let root = g.add_node(None, "root", Transform::identity());

        let names = if swap_siblings {
            ["b", "a"]
        } else {
            ["a", "b"]
        };
        for name in names {
            let offset = if name == "a" { -1.0 } else { 1.0 };
            let child = g.add_node(
                Some(root),
                name,
                Transform::new(Vec3::new(offset, 0.0, 0.0), Quat::identity()),
            );
            // Different sizes so a mixed-up traversal would show up in the
            // volume, not just the count.
            let half = if name == "a" { 0.25 } else { 0.5 };
            g.set_mesh(child, MeshData::cuboid(half, half, half));
        }
        (g, root)
    }

    #[test]
    fn triangle_count_sums_over_leaf_meshes() {
        let (g, root) = cube_pair_graph(false);
        let baked = bake_collision(&g, root).unwrap();
        assert_eq!(baked.triangle_count, 24);
        assert_eq!(baked.submesh_volumes.len(), 2);
    }

    #[test]
    fn sibling_order_does_not_change_shape_or_volume() {
        let (g1, r1) = cube_pair_graph(false);
        let (g2, r2) = cube_pair_graph(true);
        let a = bake_collision(&g1, r1).unwrap();
        let b = bake_collision(&g2, r2).unwrap();
        assert_eq!(a.triangle_count, b.triangle_count);
        assert!((a.total_volume - b.total_volume).abs() < 1.0e-2);
    }

    #[test]
    fn ancestor_transforms_are_baked_in() {
        // A cube under a translated+scaled parent keeps its scaled volume
        // wherever it sits (translation cancels for closed meshes).
        let mut g = SceneGraph::new();
        let root = g.add_node(
            None,
            "root",
            Transform {
                translation: Vec3::new(3.0, 1.0, -2.0),
                rotation: Quat::identity(),
                scale: Vec3::new(2.0, 2.0, 2.0),
            },
        );
        let child = g.add_node(Some(root), "child", Transform::identity());
        g.set_mesh(child, MeshData::cuboid(0.5, 0.5, 0.5));

        let baked = bake_collision(&g, child).unwrap();
        // 1 m^3 scaled by 2 on each axis => 8 m^3 => 8000 L.
        assert!(
            (baked.total_volume - 8000.0).abs() < 1.0,
            "got {}",
            baked.total_volume
        );
    }

    #[test]
    fn unindexed_leaf_fails_with_node_name() {
        let mut g = SceneGraph::new();
        let root = g.add_node(None, "root", Transform::identity());
        let bad = g.add_node(Some(root), "cloud", Transform::identity());
        g.set_mesh(
            bad,
            MeshData::unindexed(vec![na::Point3::origin(); 4]),
        );

        let err = bake_collision(&g, root).unwrap_err();
        assert_eq!(
            err,
            GeometryError::UnindexedNode {
                node: "cloud".into()
            }
        );
    }

    #[test]
    fn empty_subtree_is_rejected() {
        let mut g = SceneGraph::new();
        let root = g.add_node(None, "empty", Transform::identity());
        let err = bake_collision(&g, root).unwrap_err();
        assert_eq!(err, GeometryError::EmptySubtree { node: "empty".into() });
    }

    #[test]
    fn equivalent_radius_matches_closed_form() {
        // A sphere of radius 0.1 m has volume 4/3 pi (0.1)^3 m^3
        // = 4/3 pi liters.
        let v_liters = 4.0 / 3.0 * std::f32::consts::PI;
        let r = equivalent_radius(v_liters);
        assert!((r - 0.1).abs() < 1.0e-4, "got {r}");
    }
}
