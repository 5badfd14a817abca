use glam::DVec2;

/// Twice the signed area of a closed polygon (shoelace formula).
///
/// The sign is positive when the vertices run counter-clockwise in a y-up frame, which is
/// clockwise on screen for y-down image coordinates.
pub fn signed_area2(points: &[DVec2]) -> f64 {
    signed_area2_by(points.len(), |i| points[i])
}

pub(crate) fn signed_area2_by(n: usize, at: impl Fn(usize) -> DVec2) -> f64 {
    if n < 3 {
        return 0.0;
    }
    (0..n).map(|i| at(i).perp_dot(at((i + 1) % n))).sum()
}

/// Even-odd containment test of `p` against the closed polygon `points`.
///
/// Horizontal edges never toggle the state, and a point exactly on a left or top border
/// counts as inside while one on a right or bottom border does not. The rule ignores the
/// polygon winding.
pub fn point_in_polygon(points: &[DVec2], p: DVec2) -> bool {
    point_in_polygon_by(points.len(), |i| points[i], p)
}

pub(crate) fn point_in_polygon_by(n: usize, at: impl Fn(usize) -> DVec2, p: DVec2) -> bool {
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (at(i), at(j));
        if (a.y <= p.y) != (b.y <= p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Outward unit normal of the edge `from -> to` for a polygon whose doubled signed area is
/// `area2`.
///
/// A zero-length edge yields the zero vector.
pub fn outward_normal(from: DVec2, to: DVec2, area2: f64) -> DVec2 {
    let edge = to - from;
    // (dy, -dx) points out of a polygon with positive signed area
    let normal = DVec2::new(edge.y, -edge.x);
    let normal = if area2 < 0.0 { -normal } else { normal };
    normal.normalize_or_zero()
}
