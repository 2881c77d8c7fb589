//! Rips physics objects out of a loaded level hierarchy.
//!
//! Level authors tag nodes by name prefix: `s-` marks static scenery,
//! `p-` marks a passive prop that should tumble freely. Everything else is
//! a grouping node and is recursed into. Statics keep their exact
//! world-baked triangles; passive props get volume-derived mass and a ball
//! approximation, and are re-rooted in the graph so their transforms can
//! be authored in world space by the physics step from then on.

use log::debug;
use rapier3d::prelude::RigidBodyHandle;

use scene::{NodeId, SceneGraph, Transform};

use crate::body::{passive_prop, static_scenery};
use crate::collision::bake_collision;
use crate::error::GeometryError;
use crate::settings::PROP_DENSITY_KG_PER_L;
use crate::world::PhysicsWorld;
use crate::Iso;

/// Prefix marking immovable scenery nodes.
pub const STATIC_PREFIX: &str = "s-";

/// Prefix marking passive (freely moving) prop nodes.
pub const PASSIVE_PREFIX: &str = "p-";

/// Physics objects extracted from one level hierarchy.
#[derive(Debug)]
pub struct RippedLevel {
    /// Bodies for static scenery, in visit order.
    pub statics: Vec<RigidBodyHandle>,
    /// Passive props: the re-rooted render node and its body.
    pub moving: Vec<(NodeId, RigidBodyHandle)>,
}

impl RippedLevel {
    /// Copy post-step physics poses back into the render transforms of
    /// every passive prop.
    pub fn sync_transforms(&self, world: &PhysicsWorld, graph: &mut SceneGraph) {
        for &(node, handle) in &self.moving {
            let Some(body) = world.body(handle) else {
                continue;
            };
            let pose = body.position();
            let local = &mut graph.node_mut(node).local;
            local.translation = pose.translation.vector;
            local.rotation = pose.rotation;
        }
    }
}

/// Walk the hierarchy under `root`, classify tagged nodes, and register
/// their bodies with the physics world.
pub fn rip_level(
    graph: &mut SceneGraph,
    root: NodeId,
    world: &mut PhysicsWorld,
) -> Result<RippedLevel, GeometryError> {
    let mut statics = Vec::new();
    let mut moving = Vec::new();

    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let name = graph.node(id).name.clone();

        if name.starts_with(STATIC_PREFIX) {
            debug!("static: {name}");
            let baked = bake_collision(graph, id)?;
            // Triangles are already in world space, so the body sits at
            // the origin.
            let (body, collider) = static_scenery(baked.shape).build();
            statics.push(world.insert(body, collider));
        } else if name.starts_with(PASSIVE_PREFIX) {
            debug!("passive: {name}");
            let baked = bake_collision(graph, id)?;
            let (translation, rotation) = graph.world_pose(id);
            let pose = Iso::from_parts(translation.into(), rotation);

            let (body, collider) =
                passive_prop(pose, baked.total_volume, PROP_DENSITY_KG_PER_L).build();
            let handle = world.insert(body, collider);

            // From now on this node's transform comes from the solver in
            // world space; it must stop inheriting ancestor transforms.
            graph.detach_to_root(id, Transform::new(translation, rotation));
            moving.push((id, handle));
        } else {
            debug!("recursing: {name}");
            for &c in graph.children(id) {
                stack.push(c);
            }
        }
    }

    Ok(RippedLevel { statics, moving })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{MeshData, Quat, Vec3};

    fn tagged_level() -> (SceneGraph, NodeId) {
        let mut g = SceneGraph::new();
        let root = g.add_node(None, "level", Transform::identity());

        let floor = g.add_node(Some(root), "s-floor", Transform::identity());
        g.set_mesh(floor, MeshData::cuboid(2.5, 0.05, 2.5));

        let group = g.add_node(
            Some(root),
            "props",
            Transform::new(Vec3::new(0.0, 1.0, 0.0), Quat::identity()),
        );
        let crate_node = g.add_node(
            Some(group),
            "p-crate",
            Transform::new(Vec3::new(0.5, 0.0, 0.0), Quat::identity()),
        );
        g.set_mesh(crate_node, MeshData::cuboid(0.1, 0.1, 0.1));

        (g, root)
    }

    #[test]
    fn prefixes_classify_static_and_passive_nodes() {
        let (mut g, root) = tagged_level();
        let mut world = PhysicsWorld::new();

        let level = rip_level(&mut g, root, &mut world).unwrap();

        assert_eq!(level.statics.len(), 1);
        assert_eq!(level.moving.len(), 1);
        assert!(world.body(level.statics[0]).unwrap().is_fixed());

        let (node, handle) = level.moving[0];
        let body = world.body(handle).unwrap();
        assert!(body.is_dynamic());
        // Body pose comes from the node's composed world pose.
        let t = body.position().translation.vector;
        assert!((t - Vec3::new(0.5, 1.0, 0.0)).norm() < 1.0e-5);
        // The prop node was re-rooted at that same pose.
        assert!(g.parent(node).is_none());
    }

    #[test]
    fn passive_props_follow_their_bodies() {
        let (mut g, root) = tagged_level();
        let mut world = PhysicsWorld::new();
        let level = rip_level(&mut g, root, &mut world).unwrap();

        // Let the crate fall for half a second, then sync.
        for _ in 0..30 {
            world.step(1.0 / 60.0, 2);
        }
        level.sync_transforms(&world, &mut g);

        let (node, _) = level.moving[0];
        assert!(
            g.node(node).local.translation.y < 1.0,
            "prop should have fallen with its body"
        );
    }

    #[test]
    fn unindexed_geometry_fails_the_rip() {
        let mut g = SceneGraph::new();
        let root = g.add_node(None, "level", Transform::identity());
        let bad = g.add_node(Some(root), "s-cloud", Transform::identity());
        g.set_mesh(bad, MeshData::unindexed(vec![nalgebra::Point3::origin(); 3]));

        let mut world = PhysicsWorld::new();
        let err = rip_level(&mut g, root, &mut world).unwrap_err();
        assert_eq!(
            err,
            GeometryError::UnindexedNode {
                node: "s-cloud".into()
            }
        );
    }
}
