//! Per-entity rigid-body attributes.
//!
//! An entity takes part in physics only when it carries
//! [`PhysicalProperties`]. The properties are owned by that entity alone;
//! duplicating an entity clones them.
//!
//! Velocity is in world units per frame: the integrator adds it to the
//! position once per frame, after scaling acceleration by the frame delta in
//! milliseconds (see [`crate::systems::physics`]).

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    /// Expected to be positive. Zero disables gravity for the body.
    pub mass: f32,
    pub velocity: Vec2,
    /// Forces applied since the last integration. Cleared after every step.
    pub accumulated_force: Vec2,
    /// Fraction of velocity removed per frame, in `[0, 1)`.
    pub damping: f32,
    /// Bounciness in `[0, 1]`. A contact uses the smaller of the two values.
    pub restitution: f32,
    /// Immune to forces, impulses and positional correction.
    pub is_static: bool,
    /// Reports contacts but never receives a physical response.
    pub is_ghost: bool,
    pub collision_enabled: bool,
    /// Multiplier applied to the derived collision box half-size.
    pub collision_box_scale: Vec2,
    /// Amount removed from the collision box half-size per axis.
    pub collision_box_trim: Vec2,

    /// Set while any contact was detected this frame.
    #[serde(skip)]
    pub is_colliding: bool,
    /// Set while a contact with a static body was detected this frame.
    #[serde(skip)]
    pub is_colliding_with_static: bool,
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            velocity: Vec2::ZERO,
            accumulated_force: Vec2::ZERO,
            damping: 0.05,
            restitution: 0.5,
            is_static: false,
            is_ghost: false,
            collision_enabled: true,
            collision_box_scale: Vec2::ONE,
            collision_box_trim: Vec2::ZERO,
            is_colliding: false,
            is_colliding_with_static: false,
        }
    }
}

impl PhysicalProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body that pushes others away but never moves.
    pub fn immovable() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    /// A trigger volume: contacts are reported, nothing is resolved.
    pub fn ghost() -> Self {
        Self {
            is_ghost: true,
            ..Self::default()
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_collision_box(mut self, scale: Vec2, trim: Vec2) -> Self {
        self.collision_box_scale = scale;
        self.collision_box_trim = trim;
        self
    }

    /// `1 / mass`. Static bodies report their real mass too; the impulse
    /// denominator includes it.
    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Clear the per-frame contact flags.
    pub fn reset_contacts(&mut self) {
        self.is_colliding = false;
        self.is_colliding_with_static = false;
    }
}
