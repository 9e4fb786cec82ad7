//! Pairwise collision detection and response.
//!
//! The scheduler calls [`detect_and_resolve`] once for every unordered pair
//! of visible, live entities per frame. There is no broad phase.
//!
//! Response, for a contact with unit normal `n` pointing from A to B:
//!
//! ```text
//! e = min(restitution_a, restitution_b)
//! j = -(1 + e) * dot(v_b - v_a, n) / (1/m_a + 1/m_b)
//! v_a -= j/m_a * n        (unless A is static)
//! v_b += j/m_b * n        (unless B is static)
//!
//! c = max(depth - SLOP, 0) / (1/m_a + 1/m_b) * n * CORRECTION_PERCENT
//! ```
//!
//! The correction moves only the dynamic body when the other one is
//! static; between two dynamic bodies each moves `c * (1/m) * 0.5`.
//!
//! A pair of dynamic bodies that both have zero mass is not guarded and
//! produces non-finite results.

use crate::components::boundingbox::{Contact, OrientedBoundingBox};
use crate::entities::{Entity, EntityCore};
use crate::resources::scene::Assets;

/// Penetration tolerated without positional correction.
pub const SLOP: f32 = 0.01;

/// Share of the remaining penetration corrected per contact.
pub const CORRECTION_PERCENT: f32 = 0.8;

/// Collision box of an entity with physics, derived from its transform, its
/// local size (the animation frame when animated) and its collision-box
/// scale and trim.
pub fn bounding_box(entity: &dyn Entity, assets: &Assets) -> Option<OrientedBoundingBox> {
    let core = entity.core();
    let props = core.physics.as_ref()?;
    let size = entity.local_size(assets);
    let t = &core.transform;
    let obb = OrientedBoundingBox::new(
        t.transform_point(size / 2.0),
        size / 2.0 * t.scale.abs(),
        t.rotation,
    );
    Some(obb.adjusted(props))
}

/// Test a pair and apply the physical response.
///
/// Returns true when the boxes overlap and both bodies take part in
/// collisions, including ghost contacts that receive no response.
pub fn detect_and_resolve(a: &mut dyn Entity, b: &mut dyn Entity, assets: &Assets) -> bool {
    let (Some(box_a), Some(box_b)) = (bounding_box(a, assets), bounding_box(b, assets)) else {
        return false;
    };
    collide(a.core_mut(), b.core_mut(), &box_a, &box_b).is_some()
}

/// Core of [`detect_and_resolve`] once the boxes are known.
pub fn collide(
    a: &mut EntityCore,
    b: &mut EntityCore,
    box_a: &OrientedBoundingBox,
    box_b: &OrientedBoundingBox,
) -> Option<Contact> {
    let (Some(pa), Some(pb)) = (a.physics.as_mut(), b.physics.as_mut()) else {
        return None;
    };
    if !pa.collision_enabled || !pb.collision_enabled || (pa.is_static && pb.is_static) {
        return None;
    }
    let contact = box_a.collide(box_b)?;

    pa.is_colliding = true;
    pb.is_colliding = true;
    if pa.is_static {
        pb.is_colliding_with_static = true;
    }
    if pb.is_static {
        pa.is_colliding_with_static = true;
    }

    if pa.is_ghost || pb.is_ghost {
        return Some(contact);
    }

    let n = contact.normal;
    let inv_a = pa.inverse_mass();
    let inv_b = pb.inverse_mass();
    let inv_sum = inv_a + inv_b;

    let e = pa.restitution.min(pb.restitution);
    let relative = pb.velocity - pa.velocity;
    let j = -(1.0 + e) * relative.dot(n) / inv_sum;
    if !pa.is_static {
        pa.velocity -= j * inv_a * n;
    }
    if !pb.is_static {
        pb.velocity += j * inv_b * n;
    }

    let correction = (contact.depth - SLOP).max(0.0) / inv_sum * n * CORRECTION_PERCENT;
    if pa.is_static {
        b.transform.position += correction;
    } else if pb.is_static {
        a.transform.position -= correction;
    } else {
        a.transform.position -= correction * inv_a * 0.5;
        b.transform.position += correction * inv_b * 0.5;
    }

    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::physicalproperties::PhysicalProperties;
    use crate::entities::shape::RectangleShape;
    use glam::Vec2;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn block(id: &str, x: f32, y: f32, props: PhysicalProperties) -> RectangleShape {
        RectangleShape::new(id, "block", Vec2::new(10.0, 10.0))
            .with_position(Vec2::new(x, y))
            .with_physics(props)
    }

    // ==== BOX DERIVATION TESTS ====

    #[test]
    fn test_box_of_rectangle() {
        let assets = Assets::default();
        let r = block("a", 10.0, 20.0, PhysicalProperties::new());
        let obb = bounding_box(&r, &assets).unwrap();
        assert_eq!(obb.center, Vec2::new(15.0, 25.0));
        assert_eq!(obb.half_size, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_box_requires_physics() {
        let assets = Assets::default();
        let r = RectangleShape::new("a", "t", Vec2::ONE);
        assert!(bounding_box(&r, &assets).is_none());
    }

    #[test]
    fn test_box_applies_scale_and_rotation() {
        let assets = Assets::default();
        let mut r = block(
            "a",
            0.0,
            0.0,
            PhysicalProperties::new().with_collision_box(Vec2::splat(0.5), Vec2::ZERO),
        );
        r.core.transform.scale = Vec2::splat(2.0);
        r.core.transform.rotation = 30.0;
        let obb = bounding_box(&r, &assets).unwrap();
        assert_eq!(obb.half_size, Vec2::new(5.0, 5.0));
        assert_eq!(obb.rotation, 30.0);
    }

    // ==== DETECTION TESTS ====

    #[test]
    fn test_separated_blocks() {
        let assets = Assets::default();
        let mut a = block("a", 0.0, 0.0, PhysicalProperties::new());
        let mut b = block("b", 30.0, 0.0, PhysicalProperties::new());
        assert!(!detect_and_resolve(&mut a, &mut b, &assets));
        assert!(!a.core.physics.as_ref().unwrap().is_colliding);
    }

    #[test]
    fn test_two_static_bodies_never_collide() {
        let assets = Assets::default();
        let mut a = block("a", 0.0, 0.0, PhysicalProperties::immovable());
        let mut b = block("b", 0.0, 0.0, PhysicalProperties::immovable());
        assert!(!detect_and_resolve(&mut a, &mut b, &assets));
    }

    #[test]
    fn test_disabled_collision_is_ignored() {
        let assets = Assets::default();
        let mut off = PhysicalProperties::new();
        off.collision_enabled = false;
        let mut a = block("a", 0.0, 0.0, off);
        let mut b = block("b", 0.0, 0.0, PhysicalProperties::new());
        assert!(!detect_and_resolve(&mut a, &mut b, &assets));
    }

    #[test]
    fn test_ghost_sets_flags_without_response() {
        let assets = Assets::default();
        let mut ground = block("ground", 0.0, 0.0, PhysicalProperties::immovable());
        let ghost_props = PhysicalProperties::ghost().with_velocity(Vec2::new(0.0, 3.0));
        let mut ghost = block("ghost", 2.0, 5.0, ghost_props);

        assert!(detect_and_resolve(&mut ground, &mut ghost, &assets));
        let p = ghost.core.physics.as_ref().unwrap();
        assert!(p.is_colliding && p.is_colliding_with_static);
        assert_eq!(p.velocity, Vec2::new(0.0, 3.0));
        assert_eq!(ghost.core.position(), Vec2::new(2.0, 5.0));
    }

    // ==== RESPONSE TESTS ====

    #[test]
    fn test_impulse_closed_form() {
        let a_props = PhysicalProperties::new()
            .with_mass(1.0)
            .with_restitution(0.5)
            .with_velocity(Vec2::new(-1.0, 0.0));
        let b_props = PhysicalProperties::new()
            .with_mass(2.0)
            .with_restitution(0.5)
            .with_velocity(Vec2::new(1.0, 0.0));
        let mut a = EntityCore::new("a", "t");
        a.physics = Some(a_props);
        let mut b = EntityCore::new("b", "t");
        b.physics = Some(b_props);
        b.set_position(Vec2::new(8.0, 0.0));

        let box_a = OrientedBoundingBox::new(Vec2::ZERO, Vec2::splat(5.0), 0.0);
        let box_b = OrientedBoundingBox::new(Vec2::new(8.0, 0.0), Vec2::splat(5.0), 0.0);
        let contact = collide(&mut a, &mut b, &box_a, &box_b).unwrap();
        assert_eq!(contact.normal, Vec2::X);

        // relative = 2, j = -(1.5 * 2) / 1.5 = -2
        let j = -(1.0 + 0.5) * 2.0 / (1.0 + 0.5);
        let va = -1.0 - j / 1.0;
        let vb = 1.0 + j / 2.0;
        assert!(approx_eq(a.velocity().x, va));
        assert!(approx_eq(b.velocity().x, vb));

        // depth 2: c = (2 - 0.01) / 1.5 * 0.8
        let c = (2.0 - SLOP) / 1.5 * CORRECTION_PERCENT;
        assert!(approx_eq(a.position().x, -c * 1.0 * 0.5));
        assert!(approx_eq(b.position().x, 8.0 + c * 0.5 * 0.5));
    }

    #[test]
    fn test_static_body_is_never_moved() {
        let assets = Assets::default();
        let mut ground = block("ground", 0.0, 10.0, PhysicalProperties::immovable());
        let falling = PhysicalProperties::new().with_velocity(Vec2::new(0.0, 2.0));
        let mut crate_ = block("crate", 0.0, 2.0, falling);

        assert!(detect_and_resolve(&mut crate_, &mut ground, &assets));
        assert_eq!(ground.core.position(), Vec2::new(0.0, 10.0));
        assert_eq!(ground.core.velocity(), Vec2::ZERO);

        let p = crate_.core.physics.as_ref().unwrap();
        assert!(p.is_colliding_with_static);
        // slowed down and pushed out of the ground
        assert!(p.velocity.y < 2.0);
        assert!(crate_.core.position().y < 2.0);
    }
}
