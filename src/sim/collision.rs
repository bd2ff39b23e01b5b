//! Collision detection and response for circular hit areas
//!
//! Every entity in the arena collides as a circle. The helpers here are pure;
//! the interaction rules that decide *what* a contact means live in
//! `interaction`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Circular hit area kept centered on its owner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl HitCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &HitCircle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }

    /// Whether a point lies inside the circle
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) < self.radius * self.radius
    }
}

/// Result of a circle-circle test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the second circle toward the first
    pub normal: Vec2,
    /// Overlap depth (positive when touching)
    pub depth: f32,
}

/// Contact between `a` and `b`, if they overlap
pub fn circle_contact(a: &HitCircle, b: &HitCircle) -> Option<Contact> {
    if !a.overlaps(b) {
        return None;
    }
    let offset = a.center - b.center;
    let dist = offset.length();
    // Coincident centers: pick a fixed axis so the result stays deterministic
    let normal = if dist > f32::EPSILON { offset / dist } else { Vec2::X };
    Some(Contact {
        normal,
        depth: a.radius + b.radius - dist,
    })
}

/// Positional corrections that separate two overlapping circles
///
/// Each side moves by the overlap depth times the *other* side's share of the
/// combined radius, so the larger body is displaced less. Returns the deltas
/// for `a` and `b`.
pub fn push_apart(a: &HitCircle, b: &HitCircle, contact: &Contact) -> (Vec2, Vec2) {
    let total = a.radius + b.radius;
    if total <= 0.0 {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    let a_share = b.radius / total;
    let b_share = a.radius / total;
    (
        contact.normal * contact.depth * a_share,
        -contact.normal * contact.depth * b_share,
    )
}

/// Keep a body inside `[half, bounds - half]` on both axes, reflecting the
/// velocity component that carried it out (elastic wall bounce)
pub fn bounce_in_bounds(pos: &mut Vec2, vel: &mut Vec2, half: f32, bounds: Vec2) {
    if pos.x < half {
        pos.x = half;
        vel.x = vel.x.abs();
    } else if pos.x > bounds.x - half {
        pos.x = bounds.x - half;
        vel.x = -vel.x.abs();
    }

    if pos.y < half {
        pos.y = half;
        vel.y = vel.y.abs();
    } else if pos.y > bounds.y - half {
        pos.y = bounds.y - half;
        vel.y = -vel.y.abs();
    }
}

/// Toroidal wrap: once a body of `radius` is fully off one edge it
/// reappears just off the opposite edge
pub fn wrap_around(pos: &mut Vec2, radius: f32, bounds: Vec2) {
    if pos.x < -radius {
        pos.x = bounds.x + radius;
    } else if pos.x > bounds.x + radius {
        pos.x = -radius;
    }

    if pos.y < -radius {
        pos.y = bounds.y + radius;
    } else if pos.y > bounds.y + radius {
        pos.y = -radius;
    }
}

/// Whether a point has left the playfield by more than `margin`
pub fn out_of_bounds(pos: Vec2, margin: f32, bounds: Vec2) -> bool {
    pos.x < -margin || pos.x > bounds.x + margin || pos.y < -margin || pos.y > bounds.y + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = HitCircle::new(Vec2::ZERO, 10.0);
        let touching = HitCircle::new(Vec2::new(20.0, 0.0), 10.0);
        let inside = HitCircle::new(Vec2::new(19.0, 0.0), 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_contact_normal_points_at_first() {
        let a = HitCircle::new(Vec2::new(15.0, 0.0), 10.0);
        let b = HitCircle::new(Vec2::ZERO, 10.0);
        let contact = circle_contact(&a, &b).unwrap();
        assert!((contact.normal - Vec2::X).length() < 1e-6);
        assert!((contact.depth - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_push_apart_larger_moves_less() {
        let small = HitCircle::new(Vec2::new(30.0, 0.0), 10.0);
        let large = HitCircle::new(Vec2::ZERO, 30.0);
        let contact = circle_contact(&small, &large).unwrap();
        let (ds, dl) = push_apart(&small, &large, &contact);

        assert!(ds.length() > dl.length());
        // Combined displacement removes the whole overlap
        assert!(((ds - dl).length() - contact.depth).abs() < 1e-4);
        assert!(ds.x > 0.0 && dl.x < 0.0);
    }

    #[test]
    fn test_coincident_centers_still_separate() {
        let a = HitCircle::new(Vec2::splat(5.0), 4.0);
        let contact = circle_contact(&a, &a).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((contact.depth - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_reflects_offending_axis_only() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut pos = Vec2::new(-3.0, 50.0);
        let mut vel = Vec2::new(-20.0, 7.0);
        bounce_in_bounds(&mut pos, &mut vel, 10.0, bounds);
        assert_eq!(pos, Vec2::new(10.0, 50.0));
        assert_eq!(vel, Vec2::new(20.0, 7.0));

        let mut pos = Vec2::new(50.0, 95.0);
        let mut vel = Vec2::new(1.0, 30.0);
        bounce_in_bounds(&mut pos, &mut vel, 10.0, bounds);
        assert_eq!(pos.y, 90.0);
        assert_eq!(vel.y, -30.0);
    }

    #[test]
    fn test_wrap_around_edges() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut pos = Vec2::new(-11.0, 50.0);
        wrap_around(&mut pos, 10.0, bounds);
        assert_eq!(pos.x, 110.0);

        let mut pos = Vec2::new(50.0, 111.0);
        wrap_around(&mut pos, 10.0, bounds);
        assert_eq!(pos.y, -10.0);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let bounds = Vec2::new(100.0, 100.0);
        assert!(!out_of_bounds(Vec2::new(-19.0, 0.0), 20.0, bounds));
        assert!(out_of_bounds(Vec2::new(-21.0, 0.0), 20.0, bounds));
        assert!(out_of_bounds(Vec2::new(50.0, 121.0), 20.0, bounds));
    }
}
