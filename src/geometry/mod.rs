//! 2D geometry kernel
//!
//! Small predicates and constructions on `glam::DVec2` shared by the mesh,
//! the Voronoi builder and the drone controller, plus the [`Rect`] window and
//! the [`Polygon`] vertex ring.

mod polygon;
mod rect;

pub use polygon::Polygon;
pub use rect::Rect;

use glam::DVec2;

/// Distance under which two points are treated as the same point
pub const POINT_EPSILON: f64 = 1e-6;

/// Twice the signed area of triangle `abc`
///
/// Positive when `a`, `b`, `c` turn counter-clockwise (y axis up).
#[inline]
pub fn orient2d(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

/// Circumcenter of triangle `abc`, or `None` if the points are collinear
pub fn circumcenter(a: DVec2, b: DVec2, c: DVec2) -> Option<DVec2> {
    let ab = b - a;
    let ac = c - a;
    let d = 2.0 * ab.perp_dot(ac);
    if d.abs() < f64::EPSILON {
        return None;
    }

    let ab2 = ab.length_squared();
    let ac2 = ac.length_squared();
    let offset = DVec2::new(
        ac.y * ab2 - ab.y * ac2,
        ab.x * ac2 - ac.x * ab2,
    ) / d;

    Some(a + offset)
}

/// Normal of the directed edge `a -> b` pointing to its right-hand side
///
/// For an edge of a counter-clockwise triangle this is the outward normal.
/// Not normalized.
#[inline]
pub fn right_normal(a: DVec2, b: DVec2) -> DVec2 {
    let d = b - a;
    DVec2::new(d.y, -d.x)
}

/// Check whether two points coincide within `eps`
#[inline]
pub fn approx_eq(a: DVec2, b: DVec2, eps: f64) -> bool {
    a.distance_squared(b) <= eps * eps
}

/// Lexicographic ordering on (x, y)
///
/// Used to evaluate edge constructions with a canonical endpoint order, so that
/// the same edge walked in opposite directions yields bit-identical points.
#[inline]
pub(crate) fn lex_less(a: DVec2, b: DVec2) -> bool {
    a.x < b.x || (a.x == b.x && a.y < b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient2d_sign() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(1.0, 0.0);
        let c = DVec2::new(0.0, 1.0);
        assert!(orient2d(a, b, c) > 0.0);
        assert!(orient2d(a, c, b) < 0.0);
        assert_eq!(orient2d(a, b, DVec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn test_circumcenter_right_triangle() {
        let center = circumcenter(
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(0.0, 2.0),
        )
        .unwrap();
        assert!(approx_eq(center, DVec2::new(2.0, 1.0), 1e-12));
    }

    #[test]
    fn test_circumcenter_equidistant() {
        let a = DVec2::new(3.0, 7.0);
        let b = DVec2::new(-2.0, 1.0);
        let c = DVec2::new(5.0, -4.0);
        let center = circumcenter(a, b, c).unwrap();
        let r = center.distance(a);
        assert!((center.distance(b) - r).abs() < 1e-9);
        assert!((center.distance(c) - r).abs() < 1e-9);
    }

    #[test]
    fn test_circumcenter_collinear() {
        let center = circumcenter(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        );
        assert!(center.is_none());
    }

    #[test]
    fn test_right_normal_points_outward() {
        // Counter-clockwise triangle: the third vertex lies on the left of each edge
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(1.0, 0.0);
        let c = DVec2::new(0.0, 1.0);
        let n = right_normal(a, b);
        assert!(n.dot(c - a) < 0.0);
        assert_eq!(n, DVec2::new(0.0, -1.0));
    }
}
