/*!
Render-collaborator boundary types.

This crate defines the data the simulation consumes from (and feeds back to)
the rendering engine, without depending on any particular renderer:

- graph:      arena-based scene-node hierarchy with TRS local transforms and
              world-transform composition
- mesh:       immutable indexed triangle geometry
- instancing: fixed-capacity pool of per-instance world matrices shared by
              one instanced mesh set

The simulation crate reads node hierarchies and meshes from here at load
time, and writes instance transforms back every tick.
*/

pub mod graph;
pub mod instancing;
pub mod mesh;

// Re-export commonly used types and aliases.
pub use graph::{Mat4, NodeId, Quat, SceneGraph, Transform, Vec3};
pub use instancing::{InstanceError, InstancedTransforms};
pub use mesh::MeshData;
