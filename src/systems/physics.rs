//! Force accumulation, gravity and integration.
//!
//! Each frame a dynamic body collects forces (gravity, listener-applied
//! forces), goes through collision resolution against later entities and is
//! then integrated once:
//!
//! ```text
//! acceleration = accumulated_force / mass
//! velocity    += acceleration * delta_millis
//! velocity    *= 1 - damping
//! accumulated_force = 0
//! position    += velocity
//! ```
//!
//! The delta is the previous frame's measured duration and is not clamped.
//!
//! # Related
//!
//! - [`crate::systems::collision`] – impulse and positional correction
//! - [`crate::components::physicalproperties::PhysicalProperties`]

use glam::Vec2;

use crate::entities::EntityCore;

/// Add `force` to the accumulator of a dynamic body.
///
/// With an application `point` (world space) the rotation is also nudged
/// directly by `torque / mass * damping`, where
/// `torque = cross(point - position, force) / mass`. This is a
/// deliberately simplified angular response; no angular velocity is kept.
/// No-op for static bodies and entities without physics.
pub fn apply_force(core: &mut EntityCore, force: Vec2, point: Option<Vec2>) {
    let position = core.transform.position;
    let Some(props) = core.physics.as_mut() else {
        return;
    };
    if props.is_static {
        return;
    }
    props.accumulated_force += force;

    if let Some(point) = point {
        let arm = point - position;
        let torque = arm.perp_dot(force) / props.mass;
        core.transform.rotation += torque / props.mass * props.damping;
    }
}

/// True when gravity should act on the body this frame.
///
/// Exempt: no physics, static, zero mass, zero gravity, or currently in
/// contact with a static body (treated as resting).
pub fn gravity_applies(core: &EntityCore, gravity: Vec2) -> bool {
    match core.physics.as_ref() {
        Some(p) => {
            !p.is_static && p.mass != 0.0 && gravity != Vec2::ZERO && !p.is_colliding_with_static
        }
        None => false,
    }
}

/// Accumulate `gravity` as a force when the body is eligible.
pub fn apply_gravity(core: &mut EntityCore, gravity: Vec2) -> bool {
    if !gravity_applies(core, gravity) {
        return false;
    }
    apply_force(core, gravity, None);
    true
}

/// Integrate one frame for a dynamic body.
pub fn integrate(core: &mut EntityCore, delta_millis: f32) {
    let Some(props) = core.physics.as_mut() else {
        return;
    };
    if props.is_static {
        props.accumulated_force = Vec2::ZERO;
        return;
    }
    let acceleration = props.accumulated_force / props.mass;
    props.velocity += acceleration * delta_millis;
    props.velocity *= 1.0 - props.damping;
    props.accumulated_force = Vec2::ZERO;
    core.transform.position += props.velocity;
}
