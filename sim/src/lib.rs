/*!
Creature-habitat simulation core.

Load-time pipeline: render hierarchies are baked into world-space triangle
soups ([`collision`]), closed meshes get signed volumes for mass inference
([`volume`]), and bodies are constructed with standard material defaults
([`body`]) and registered with the owning [`world::PhysicsWorld`].

Per-tick pipeline, run by the [`driver::Habitat`] from the host render
loop: physics step, creature locomotion ([`locomotion`]), flock steering
([`flock`]), then instance-transform write-back into the render pool.

Scene-graph and instancing types come from the `scene` crate; Rapier is
re-exported so downstream crates can use its types without depending on
`rapier3d` directly.
*/

pub use rapier3d;

pub mod agent;
pub mod body;
pub mod collision;
pub mod driver;
pub mod error;
pub mod flock;
pub mod level;
pub mod locomotion;
pub mod pika;
pub mod settings;
pub mod volume;
pub mod world;

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

// Re-export commonly used types and operations.
pub use agent::Agent;
pub use body::{BodyDef, BodyKind, passive_prop, static_scenery};
pub use collision::{BakedCollision, bake_collision, equivalent_radius};
pub use driver::{Habitat, TickInput};
pub use error::GeometryError;
pub use flock::{Boid, steering_for};
pub use level::{RippedLevel, rip_level};
pub use volume::mesh_volume;
pub use world::PhysicsWorld;
