//! Point-in-polygon containment with explicit boundary inclusion

use crate::core_types::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction in which a point lies beyond the envelope's extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Excursion {
    /// Arm forward of the most forward limit
    Forward,
    /// Arm aft of the most aft limit
    Aft,
    /// Mass above the envelope's top
    AboveMaxMass,
    /// Mass below the envelope's bottom
    BelowMinMass,
}

impl fmt::Display for Excursion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Excursion::Forward => "CG too far forward",
            Excursion::Aft => "CG too far aft",
            Excursion::AboveMaxMass => "mass above envelope maximum",
            Excursion::BelowMinMass => "mass below envelope minimum",
        })
    }
}

/// Result of checking one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeCheck {
    pub within_limits: bool,
    /// Empty when inside, or when the point is outside a sloped edge but
    /// within the envelope's extremes
    pub excursions: Vec<Excursion>,
}

/// Shortest distance from `p` to the segment `a`–`b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Edges of a closed polygon, last vertex joined to the first.
fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
}

/// Odd-crossing ray cast. Edge points are not reliably classified here.
fn ray_cast(point: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    for (a, b) in edges(polygon) {
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// True when `point` is inside `polygon` or within `tolerance` of an edge.
pub fn contains(point: Vec2, polygon: &[Vec2], tolerance: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    edges(polygon).any(|(a, b)| distance_to_segment(point, a, b) <= tolerance)
        || ray_cast(point, polygon)
}

/// Containment plus the direction(s) of any excursion.
pub fn classify(point: Vec2, polygon: &[Vec2], tolerance: f64) -> EnvelopeCheck {
    if contains(point, polygon, tolerance) {
        return EnvelopeCheck {
            within_limits: true,
            excursions: Vec::new(),
        };
    }

    let (min, max) = polygon.iter().fold(
        (
            Vec2::new(f64::INFINITY, f64::INFINITY),
            Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(lo, hi), p| (lo.inf(p), hi.sup(p)),
    );

    let mut excursions = Vec::new();
    if point.x < min.x - tolerance {
        excursions.push(Excursion::Forward);
    } else if point.x > max.x + tolerance {
        excursions.push(Excursion::Aft);
    }
    if point.y > max.y + tolerance {
        excursions.push(Excursion::AboveMaxMass);
    } else if point.y < min.y - tolerance {
        excursions.push(Excursion::BelowMinMass);
    }

    EnvelopeCheck {
        within_limits: false,
        excursions,
    }
}

/// Signed area of triangle `a b c` (twice the area; sign gives orientation).
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    (b - a).perp(&(c - a))
}

fn on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(p1, q1, q2))
        || (d2 == 0.0 && on_segment(p2, q1, q2))
        || (d3 == 0.0 && on_segment(q1, p1, p2))
        || (d4 == 0.0 && on_segment(q2, p1, p2))
}

/// True when no two non-adjacent edges touch.
pub fn is_simple(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let edge = |i: usize| (polygon[i], polygon[(i + 1) % n]);
    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent edges share a vertex by construction
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a, b) = edge(i);
            let (c, d) = edge(j);
            if segments_intersect(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Typical trapezoidal normal-category envelope.
    fn envelope() -> Vec<Vec2> {
        vec![
            Vec2::new(2.00, 600.0),
            Vec2::new(2.60, 600.0),
            Vec2::new(2.60, 1150.0),
            Vec2::new(2.20, 1150.0),
            Vec2::new(2.00, 950.0),
        ]
    }

    #[test]
    fn test_interior_point() {
        assert!(contains(Vec2::new(2.3, 900.0), &envelope(), 1e-7));
    }

    #[test]
    fn test_point_on_edge_is_inside() {
        // Aft limit
        assert!(contains(Vec2::new(2.60, 900.0), &envelope(), 1e-7));
        // Sloped forward edge midpoint
        assert!(contains(Vec2::new(2.10, 1050.0), &envelope(), 1e-7));
        // Vertex
        assert!(contains(Vec2::new(2.20, 1150.0), &envelope(), 1e-7));
    }

    #[test]
    fn test_exterior_point() {
        assert!(!contains(Vec2::new(2.65, 900.0), &envelope(), 1e-7));
        assert!(!contains(Vec2::new(2.02, 1140.0), &envelope(), 1e-7));
    }

    #[test]
    fn test_classify_excursions() {
        let check = classify(Vec2::new(2.7, 1200.0), &envelope(), 1e-7);
        assert!(!check.within_limits);
        assert_eq!(check.excursions, vec![Excursion::Aft, Excursion::AboveMaxMass]);

        let check = classify(Vec2::new(1.9, 800.0), &envelope(), 1e-7);
        assert_eq!(check.excursions, vec![Excursion::Forward]);
    }

    #[test]
    fn test_classify_outside_sloped_edge_has_no_extreme() {
        let check = classify(Vec2::new(2.02, 1140.0), &envelope(), 1e-7);
        assert!(!check.within_limits);
        assert!(check.excursions.is_empty());
    }

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_segment(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
        let d = distance_to_segment(Vec2::new(3.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_simple() {
        assert!(is_simple(&envelope()));
        let bow_tie = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ];
        assert!(!is_simple(&bow_tie));
    }
}
