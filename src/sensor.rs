//! Radial ground sensor.
//!
//! Casts a fan of probe rays around the character and collects the terrain
//! contacts within range. A single downward ray is not enough for a round
//! collider crossing slope transitions or convex corners; the radial fan is
//! robust against ledges and concave dips at the cost of `probe_count`
//! raycasts per step.

use bevy::prelude::*;

use crate::contact::Contact;

/// Generate `count` equally spaced probe directions sweeping from `arc_start`
/// to `arc_end` (degrees, counter-clockwise from world +X).
///
/// A full ring (span that is a multiple of 360°) spaces rays by `span / count`
/// so the end direction does not duplicate the start. Partial arcs include
/// both endpoints and space by `span / (count - 1)`. `count == 0` yields no
/// directions; `count == 1` fires a single ray at `arc_start`.
pub fn probe_directions(count: usize, arc_start: f32, arc_end: f32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let span = arc_end - arc_start;
    let full_ring = span.abs() > 0.0 && (span % 360.0).abs() < f32::EPSILON;

    let step = if count == 1 {
        0.0
    } else if full_ring {
        span / count as f32
    } else {
        span / (count - 1) as f32
    };

    (0..count)
        .map(|i| {
            let angle = (arc_start + step * i as f32).to_radians();
            Vec2::from_angle(angle)
        })
        .collect()
}

/// Cast the probe fan and return every terrain contact found.
///
/// `raycast` is the backend query: given an origin, a unit direction and a
/// maximum distance it returns the nearest terrain hit, or `None` when the
/// ray misses, starts inside terrain, or exceeds the range. The output order
/// follows the sweep but carries no contract; downstream consumers must be
/// order-independent.
pub fn sense<F>(
    origin: Vec2,
    count: usize,
    range: f32,
    arc_start: f32,
    arc_end: f32,
    mut raycast: F,
) -> Vec<Contact>
where
    F: FnMut(Vec2, Vec2, f32) -> Option<Contact>,
{
    probe_directions(count, arc_start, arc_end)
        .into_iter()
        .filter_map(|direction| raycast(origin, direction, range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_near(a: Vec2, b: Vec2) {
        assert!(
            (a - b).length() < 1e-4,
            "expected {:?} to be near {:?}",
            a,
            b
        );
    }

    #[test]
    fn zero_probes_yield_nothing() {
        assert!(probe_directions(0, 0.0, 360.0).is_empty());
    }

    #[test]
    fn single_probe_fires_at_arc_start() {
        let dirs = probe_directions(1, 270.0, 360.0);
        assert_eq!(dirs.len(), 1);
        assert_vec2_near(dirs[0], Vec2::NEG_Y);
    }

    #[test]
    fn full_ring_has_no_duplicate_endpoint() {
        let dirs = probe_directions(4, 0.0, 360.0);
        assert_eq!(dirs.len(), 4);
        assert_vec2_near(dirs[0], Vec2::X);
        assert_vec2_near(dirs[1], Vec2::Y);
        assert_vec2_near(dirs[2], Vec2::NEG_X);
        assert_vec2_near(dirs[3], Vec2::NEG_Y);
    }

    #[test]
    fn partial_arc_includes_both_endpoints() {
        let dirs = probe_directions(3, 90.0, 270.0);
        assert_eq!(dirs.len(), 3);
        assert_vec2_near(dirs[0], Vec2::Y);
        assert_vec2_near(dirs[1], Vec2::NEG_X);
        assert_vec2_near(dirs[2], Vec2::NEG_Y);
    }

    #[test]
    fn sense_collects_only_hits() {
        // Flat ground at y = 0, origin 0.5 above it: only rays with a
        // downward component within range can hit.
        let origin = Vec2::new(0.0, 0.5);
        let contacts = sense(origin, 8, 1.0, 0.0, 360.0, |from, dir, max| {
            if dir.y >= 0.0 {
                return None;
            }
            let t = from.y / -dir.y;
            (t <= max).then(|| Contact::new(from + dir * t, Vec2::Y, t, None))
        });

        assert!(!contacts.is_empty());
        assert!(contacts.len() < 8);
        for contact in &contacts {
            assert!(contact.distance <= 1.0);
            assert_eq!(contact.normal, Vec2::Y);
            assert!(contact.point.y.abs() < 1e-4);
        }
    }

    #[test]
    fn sense_out_of_range_is_empty() {
        let origin = Vec2::new(0.0, 10.0);
        let contacts = sense(origin, 16, 1.0, 0.0, 360.0, |from, dir, max| {
            if dir.y >= 0.0 {
                return None;
            }
            let t = from.y / -dir.y;
            (t <= max).then(|| Contact::new(from + dir * t, Vec2::Y, t, None))
        });
        assert!(contacts.is_empty());
    }
}
