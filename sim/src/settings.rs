/*!
Simulation tunables and tolerances.

These constants centralize the parameters used by collision baking, body
construction, flock steering, locomotion and the tick driver. Keeping them
together makes tuning easier and helps ensure deterministic behavior across
platforms.

Notes
- Distances are in meters, masses in kilograms, volumes in liters, time in
  seconds.
- Favor practical world-space tolerances over machine epsilon for robust
  behavior.
- The flock weights and gait constants are behavioral knobs, not structural
  invariants; retune freely.
*/

use std::f32::consts::PI;

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// Substeps each physics tick is divided into. More substeps cost more but
/// keep fast-moving contacts stable.
pub const PHYSICS_SUBSTEPS: u32 = 4;

// ---------------------------------------------------------------------------
// Mass inference
// ---------------------------------------------------------------------------

/// Signed mesh volumes are reported in liters so density constants can be
/// written in kg/L.
pub const LITERS_PER_CUBIC_METER: f32 = 1000.0;

/// The cube root of a volume in liters is a length in decimeters; this
/// rescales the equivalent-sphere radius back into meters.
pub const RADIUS_LITERS_TO_METERS: f32 = 0.1;

/// Density assigned to passive level props (kg/L). Deliberately light so
/// loose scenery gets nudged around rather than pinning creatures.
pub const PROP_DENSITY_KG_PER_L: f32 = 0.001;

/// Floor on the ball approximation used for passive props (meters), so a
/// sliver mesh can never produce a zero-radius collider.
pub const MIN_PROP_RADIUS_M: f32 = 0.01;

// ---------------------------------------------------------------------------
// Rigid-body defaults
// ---------------------------------------------------------------------------

/// Default surface friction for constructed bodies.
pub const DEFAULT_FRICTION: f32 = 0.3;

/// Default restitution for constructed bodies.
pub const DEFAULT_RESTITUTION: f32 = 0.1;

// ---------------------------------------------------------------------------
// Creature geometry and mass
// ---------------------------------------------------------------------------

/// Body radius of one creature (meters). Forward is local +Z.
pub const PIKA_RADIUS: f32 = 0.05;

/// Nose-to-tail body length of one creature (meters).
pub const PIKA_LENGTH: f32 = 0.20;

/// Half-extent of the dense core block that keeps the center of mass low.
pub const PIKA_CORE_HALF: f32 = 0.03;

/// Mass of the outer shell collider (kg).
pub const PIKA_SHELL_MASS_KG: f32 = 0.050;

/// Mass of the dense core collider (kg).
pub const PIKA_CORE_MASS_KG: f32 = 0.100;

/// Creatures bounce noticeably more than scenery.
pub const PIKA_RESTITUTION: f32 = 0.8;

// ---------------------------------------------------------------------------
// Flock steering
// ---------------------------------------------------------------------------

/// Tip/tail offset from a creature's pivot along its forward axis (meters).
pub const BOID_RADIUS: f32 = 0.2;

/// Perception range: pairs farther apart than this do not interact.
/// Bounds per-pair cost; the scan over pairs is still O(n^2).
pub const SEARCH_RADIUS: f32 = 1.0;

/// Minimum comfortable approach distance (meters). The distance-well
/// steering weight is zero here and at [`SEARCH_RADIUS`], attractive in
/// between and repulsive inside.
pub const PROXIMITY_RADIUS: f32 = 0.25;

/// Global cohesion weight applied to the summed steering vector.
pub const COHESION: f32 = 2.0;

/// Softening added to pair distance in the alignment term so coincident
/// agents cannot blow it up.
pub const ALIGNMENT_SOFTENING: f32 = 0.05;

/// Converts the dimensionless steering vector into a torque impulse
/// (N·m·s). Sized against the tiny creature inertia.
pub const STEER_TORQUE_SCALE: f32 = 1.0e-3;

// ---------------------------------------------------------------------------
// Locomotion
// ---------------------------------------------------------------------------

/// Angular rate of the gait oscillator (rad/s): two full step cycles per
/// second of simulation time.
pub const GAIT_RATE: f32 = 4.0 * PI;

/// Peak propulsive impulse per tick at the top of the gait cycle (N·s).
pub const GAIT_IMPULSE: f32 = 0.02;

/// Above this linear speed (m/s) the creature coasts; no propulsion is
/// injected, preventing runaway acceleration from repeated impulses.
pub const GAIT_SPEED_THRESHOLD: f32 = 0.1;

/// Torque-impulse gain pulling a tipped-over creature back upright. Kept
/// small so it never fights the contact solver.
pub const UPRIGHT_GAIN: f32 = 5.0e-4;

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// Hard cap on live creatures. Chosen to keep the O(n^2) flock scan and the
/// instance pool affordable; the instance pool is sized from this.
pub const MAX_PIKAS: usize = 40;

/// One creature is spawned each time elapsed simulation time crosses a
/// multiple of this interval, until the cap is reached.
pub const SPAWN_INTERVAL_SECS: f32 = 1.0;

/// Radius of the ring spawn positions are placed on around the spawn point.
pub const SPAWN_RING_RADIUS: f32 = 0.3;
