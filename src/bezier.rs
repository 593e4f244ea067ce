//! Cubic Bezier curves shaped like a hand sweep

use rand::Rng;

use crate::random::{chance, uniform};
use crate::vector::Point2D;

/// Fraction of the distance used as default perpendicular spread
const DEFAULT_SPREAD_RATIO: f64 = 0.3;
const MIN_SPREAD: f64 = 2.0;
const MAX_SPREAD_RATIO: f64 = 0.5;

/// Pick two control points for a curve from `start` to `end`
///
/// Both points bulge to the same side of the segment, so the curve is a
/// single arc and never an S. The first returned point is the one closer to
/// `start` along the direction of travel.
///
/// `spread` is the maximum perpendicular offset in pixels; it defaults to 30%
/// of the distance and is clamped to `[2, distance / 2]`.
pub fn bezier_control_points<R: Rng + ?Sized>(
    rng: &mut R,
    start: Point2D,
    end: Point2D,
    spread: Option<f64>,
) -> (Point2D, Point2D) {
    let delta = end - start;
    let distance = delta.magnitude();
    let direction = delta.unit();
    let normal = direction.perpendicular();

    let spread = spread
        .unwrap_or(DEFAULT_SPREAD_RATIO * distance)
        .max(MIN_SPREAD)
        .min(MAX_SPREAD_RATIO * distance);
    let side = if chance(rng, 0.5) { 1.0 } else { -1.0 };

    let a = offset_point(rng, start, end, normal * (spread * side));
    let b = offset_point(rng, start, end, normal * (spread * side));

    if (a - start).dot(direction) <= (b - start).dot(direction) {
        (a, b)
    } else {
        (b, a)
    }
}

/// A point somewhere in the middle of the segment, pushed off it by a random
/// fraction (30% to 100%) of `max_offset`
fn offset_point<R: Rng + ?Sized>(
    rng: &mut R,
    start: Point2D,
    end: Point2D,
    max_offset: Point2D,
) -> Point2D {
    let along = uniform(rng, 0.2, 0.8);
    start.lerp(end, along) + max_offset * uniform(rng, 0.3, 1.0)
}

/// Evaluate a cubic Bezier at `t` in `[0, 1]`
pub fn cubic_bezier(p0: Point2D, p1: Point2D, p2: Point2D, p3: Point2D, t: f64) -> Point2D {
    let mt = 1.0 - t;
    let b0 = mt * mt * mt;
    let b1 = 3.0 * mt * mt * t;
    let b2 = 3.0 * mt * t * t;
    let b3 = t * t * t;
    p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
}

/// Quintic ease `6t^5 - 15t^4 + 10t^3`
///
/// First and second derivatives vanish at both ends, so the pointer
/// accelerates and brakes without a jerk.
pub fn smootherstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bezier_endpoints() {
        let p0 = Point2D::new(0.0, 0.0);
        let p1 = Point2D::new(25.0, 50.0);
        let p2 = Point2D::new(75.0, 50.0);
        let p3 = Point2D::new(100.0, 0.0);
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 0.0), p0);
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 1.0), p3);
        let mid = cubic_bezier(p0, p1, p2, p3, 0.5);
        assert!((mid.x - 50.0).abs() < 1e-10);
        assert!((mid.y - 37.5).abs() < 1e-10);
    }

    #[test]
    fn straight_control_points_give_straight_line() {
        let p0 = Point2D::new(0.0, 0.0);
        let p3 = Point2D::new(90.0, 0.0);
        let p1 = Point2D::new(30.0, 0.0);
        let p2 = Point2D::new(60.0, 0.0);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = cubic_bezier(p0, p1, p2, p3, t);
            assert!(p.y.abs() < 1e-12);
            assert!((p.x - 90.0 * t).abs() < 1e-9);
        }
    }

    #[test]
    fn smootherstep_boundaries() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-12);
        assert_eq!(smootherstep(1.0), 1.0);
    }

    #[test]
    fn smootherstep_is_symmetric_and_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let t = i as f64 / 100.0;
            let v = smootherstep(t);
            assert!(v >= prev);
            assert!((v + smootherstep(1.0 - t) - 1.0).abs() < 1e-12);
            prev = v;
        }
    }

    #[test]
    fn control_points_on_same_side() {
        let mut rng = StdRng::seed_from_u64(7);
        let start = Point2D::new(10.0, 20.0);
        let end = Point2D::new(400.0, -130.0);
        let line = end - start;
        for _ in 0..1000 {
            let (a, b) = bezier_control_points(&mut rng, start, end, None);
            let sa = (a - start).cross(line);
            let sb = (b - start).cross(line);
            assert!(sa != 0.0 && sb != 0.0);
            assert_eq!(sa.signum(), sb.signum(), "control points straddle the line");
        }
    }

    #[test]
    fn control_points_ordered_along_travel() {
        let mut rng = StdRng::seed_from_u64(8);
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(-300.0, 200.0);
        let dir = (end - start).unit();
        for _ in 0..1000 {
            let (a, b) = bezier_control_points(&mut rng, start, end, None);
            assert!((a - start).dot(dir) <= (b - start).dot(dir));
        }
    }

    #[test]
    fn control_points_respect_spread_clamp() {
        let mut rng = StdRng::seed_from_u64(9);
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(100.0, 0.0);
        for _ in 0..1000 {
            // Requested spread far above distance/2 gets clamped to 50
            let (a, b) = bezier_control_points(&mut rng, start, end, Some(1_000.0));
            assert!(a.y.abs() <= 50.0 + 1e-9 && b.y.abs() <= 50.0 + 1e-9);
            assert!(a.y.abs() >= 15.0 - 1e-9 && b.y.abs() >= 15.0 - 1e-9);
            assert!((20.0..=80.0).contains(&a.x) && (20.0..=80.0).contains(&b.x));
        }
    }

    #[test]
    fn control_points_small_spread_floor() {
        let mut rng = StdRng::seed_from_u64(10);
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(0.0, 100.0);
        for _ in 0..200 {
            let (a, _) = bezier_control_points(&mut rng, start, end, Some(0.0));
            // Floor of 2px times uniform(0.3, 1.0)
            assert!(a.x.abs() >= 0.6 - 1e-9 && a.x.abs() <= 2.0 + 1e-9);
        }
    }
}
