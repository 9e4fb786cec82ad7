//! Oriented bounding boxes and the separating-axis test.
//!
//! Boxes are derived on demand from an entity's transform and physical
//! properties (see [`crate::systems::collision::bounding_box`]); they are
//! never stored.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::components::physicalproperties::PhysicalProperties;
use crate::render::FloatRect;

/// Rotated rectangle described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBoundingBox {
    pub center: Vec2,
    pub half_size: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
}

/// Result of a positive separating-axis test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit axis of least penetration, pointing from the first box toward
    /// the second.
    pub normal: Vec2,
    /// Overlap along `normal`.
    pub depth: f32,
}

impl OrientedBoundingBox {
    pub fn new(center: Vec2, half_size: Vec2, rotation: f32) -> Self {
        Self {
            center,
            half_size,
            rotation,
        }
    }

    /// Unrotated box covering `rect`.
    pub fn from_rect(rect: FloatRect) -> Self {
        let half = rect.size() / 2.0;
        Self::new(rect.position() + half, half, 0.0)
    }

    /// Apply the collision-box adjustments configured on `props`.
    ///
    /// Scale multiplies the half-size. Trim removes from the half-size and
    /// shifts the center by half the trim on each axis.
    pub fn adjusted(mut self, props: &PhysicalProperties) -> Self {
        self.half_size *= props.collision_box_scale;
        let trim = props.collision_box_trim;
        if trim.x > 0.0 || trim.y > 0.0 {
            self.center += trim / 2.0;
            self.half_size = (self.half_size - trim).max(Vec2::ZERO);
        }
        self
    }

    /// Local x and y axes of the box in world space.
    fn basis(&self) -> (Vec2, Vec2) {
        let right = Vec2::from_angle(self.rotation.to_radians());
        (right, right.perp())
    }

    /// Corners in perimeter order.
    pub fn corners(&self) -> [Vec2; 4] {
        let (right, up) = self.basis();
        let rx = right * self.half_size.x;
        let uy = up * self.half_size.y;
        [
            self.center + rx + uy,
            self.center - rx + uy,
            self.center - rx - uy,
            self.center + rx - uy,
        ]
    }

    /// The two distinct edge normals. Degenerate edges yield no axis.
    pub fn axes(&self) -> ArrayVec<Vec2, 2> {
        let c = self.corners();
        let mut axes = ArrayVec::new();
        for edge in [c[1] - c[0], c[2] - c[1]] {
            let normal = normalize(edge.perp());
            if normal != Vec2::ZERO {
                axes.push(normal);
            }
        }
        axes
    }

    /// Projection interval of the corners onto `axis`.
    pub fn project(&self, axis: Vec2) -> (f32, f32) {
        let corners = self.corners();
        let first = corners[0].dot(axis);
        corners[1..]
            .iter()
            .map(|c| c.dot(axis))
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
    }

    /// Separating-axis test against `other`.
    ///
    /// Tests the edge normals of both boxes. Returns `None` as soon as one
    /// axis separates the projections. Touching boxes count as colliding
    /// with zero depth.
    pub fn collide(&self, other: &OrientedBoundingBox) -> Option<Contact> {
        let mut axes: ArrayVec<Vec2, 4> = ArrayVec::new();
        axes.extend(self.axes());
        axes.extend(other.axes());
        if axes.is_empty() {
            return None;
        }

        let mut depth = f32::MAX;
        let mut normal = Vec2::ZERO;
        for axis in axes {
            let (min_a, max_a) = self.project(axis);
            let (min_b, max_b) = other.project(axis);
            if max_a < min_b || max_b < min_a {
                return None;
            }
            let overlap = (max_b - min_a).min(max_a - min_b);
            if overlap < depth {
                depth = overlap;
                normal = axis;
            }
        }

        if (other.center - self.center).dot(normal) < 0.0 {
            normal = -normal;
        }
        Some(Contact { normal, depth })
    }
}

/// Unit vector in the direction of `v`, or zero for a zero-length input.
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}
