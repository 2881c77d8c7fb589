//! Rigid-body construction with standard material defaults.
//!
//! A [`BodyDef`] pairs a collision shape with a mass and a world pose and
//! builds the engine-side body/collider pair. Local inertia comes from the
//! shape's own mass-properties routine. Construction is deliberately
//! decoupled from world membership: the caller inserts the pair into the
//! [`PhysicsWorld`](crate::world::PhysicsWorld), which keeps registration
//! batchable and deferrable.
//!
//! Mass 0 (or [`BodyKind::Fixed`]) marks an immovable body; kinematic
//! bodies are pose-driven by the caller and ignore forces entirely.

use rapier3d::prelude::{Collider, ColliderBuilder, RigidBody, RigidBodyBuilder, SharedShape};

use crate::Iso;
use crate::collision::equivalent_radius;
use crate::settings::{DEFAULT_FRICTION, DEFAULT_RESTITUTION, MIN_PROP_RADIUS_M};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated by the solver under gravity and injected forces.
    Dynamic,
    /// Immovable scenery.
    Fixed,
    /// Pose-driven from outside the solver (e.g. tracked grips).
    Kinematic,
}

/// Everything needed to construct one body and its collider.
pub struct BodyDef {
    pub pose: Iso,
    pub shape: SharedShape,
    pub mass_kg: f32,
    pub kind: BodyKind,
    pub friction: f32,
    pub restitution: f32,
    /// Creature bodies stay awake: they look idle between gait pulses and
    /// must not be deactivated by the solver.
    pub keep_awake: bool,
}

impl BodyDef {
    /// Body at `pose` with the given shape and mass. Mass 0 means fixed.
    pub fn new(pose: Iso, shape: SharedShape, mass_kg: f32) -> Self {
        let kind = if mass_kg == 0.0 {
            BodyKind::Fixed
        } else {
            BodyKind::Dynamic
        };
        Self {
            pose,
            shape,
            mass_kg,
            kind,
            friction: DEFAULT_FRICTION,
            restitution: DEFAULT_RESTITUTION,
            keep_awake: false,
        }
    }

    /// Pose-driven body (mass is irrelevant to the solver).
    pub fn kinematic(pose: Iso, shape: SharedShape) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Self::new(pose, shape, 0.0)
        }
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn keep_awake(mut self, keep_awake: bool) -> Self {
        self.keep_awake = keep_awake;
        self
    }

    /// Build the engine body and collider. Neither is registered with any
    /// world yet.
    pub fn build(self) -> (RigidBody, Collider) {
        let builder = match self.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic().can_sleep(!self.keep_awake),
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = builder.pose(self.pose).build();

        // Mass on the collider lets the engine derive local inertia from
        // the shape geometry.
        let collider = ColliderBuilder::new(self.shape)
            .friction(self.friction)
            .restitution(self.restitution)
            .mass(self.mass_kg)
            .build();

        (body, collider)
    }
}

/// Definition for a freely moving prop whose mass comes from its mesh
/// volume.
///
/// Dynamic props trade collision fidelity for solver cost: they get a ball
/// of the volume-equivalent radius instead of their exact triangles.
pub fn passive_prop(pose: Iso, volume_liters: f32, density_kg_per_l: f32) -> BodyDef {
    let mass_kg = density_kg_per_l * volume_liters.abs();
    let radius = equivalent_radius(volume_liters).max(MIN_PROP_RADIUS_M);
    BodyDef::new(pose, SharedShape::ball(radius), mass_kg)
}

/// Definition for immovable scenery keeping its exact (world-baked)
/// triangle soup. Static geometry never needs narrow-phase performance
/// margin, so fidelity is free.
pub fn static_scenery(shape: SharedShape) -> BodyDef {
    BodyDef::new(Iso::identity(), shape, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mass_builds_a_fixed_body() {
        let def = BodyDef::new(Iso::identity(), SharedShape::ball(0.5), 0.0);
        assert_eq!(def.kind, BodyKind::Fixed);
        let (body, _collider) = def.build();
        assert!(body.is_fixed());
    }

    #[test]
    fn positive_mass_builds_a_dynamic_body_with_defaults() {
        let def = BodyDef::new(Iso::identity(), SharedShape::ball(0.5), 1.5);
        assert_eq!(def.kind, BodyKind::Dynamic);
        assert!((def.friction - DEFAULT_FRICTION).abs() < 1.0e-6);
        assert!((def.restitution - DEFAULT_RESTITUTION).abs() < 1.0e-6);

        let (body, collider) = def.build();
        assert!(body.is_dynamic());
        assert!((collider.friction() - DEFAULT_FRICTION).abs() < 1.0e-6);
        assert!((collider.restitution() - DEFAULT_RESTITUTION).abs() < 1.0e-6);
    }

    #[test]
    fn kinematic_definition_builds_a_kinematic_body() {
        let def = BodyDef::kinematic(Iso::identity(), SharedShape::cuboid(0.075, 0.01, 0.1));
        let (body, _collider) = def.build();
        assert!(body.is_kinematic());
    }

    #[test]
    fn passive_prop_mass_scales_with_volume_and_density() {
        let def = passive_prop(Iso::identity(), 2000.0, 0.001);
        assert!((def.mass_kg - 2.0).abs() < 1.0e-6);
        assert_eq!(def.kind, BodyKind::Dynamic);
    }

    #[test]
    fn passive_prop_radius_never_degenerates() {
        let def = passive_prop(Iso::identity(), 0.0, 0.001);
        let ball = def.shape.as_ball().unwrap();
        assert!(ball.radius >= MIN_PROP_RADIUS_M);
    }
}
