use glam::DVec2;

/// Barycentric coordinates of `p` with respect to the triangle `(a, b, c)`.
///
/// The returned weights `[wa, wb, wc]` satisfy `wa + wb + wc = 1` and
/// `p = wa * a + wb * b + wc * c`. Returns `None` for a degenerate triangle, whose signed
/// area is exactly zero.
///
/// # Examples
///
/// ```
/// use cagewarp_transform::barycentric::barycentric;
/// use glam::DVec2;
///
/// let w = barycentric(
///     DVec2::new(0.25, 0.25),
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.0, 1.0),
/// )
/// .unwrap();
///
/// assert_eq!(w, [0.5, 0.25, 0.25]);
/// ```
pub fn barycentric(p: DVec2, a: DVec2, b: DVec2, c: DVec2) -> Option<[f64; 3]> {
    let denom = (b.x - a.x) * c.y + (a.x - c.x) * b.y + (c.x - b.x) * a.y;
    if denom == 0.0 {
        return None;
    }

    let wa = ((b.x - p.x) * c.y + (p.x - c.x) * b.y + (c.x - b.x) * p.y) / denom;
    let wb = -((a.x - p.x) * c.y + (p.x - c.x) * a.y + (c.x - a.x) * p.y) / denom;

    Some([wa, wb, 1.0 - wa - wb])
}

/// Check if barycentric weights describe a point strictly inside its triangle.
///
/// All weights share a sign inside the triangle, whatever its winding. A point on an edge has
/// a zero weight and is rejected.
#[inline]
pub fn is_inside(weights: [f64; 3]) -> bool {
    let [a, b, c] = weights;
    (a > 0.0 && b > 0.0 && c > 0.0) || (a < 0.0 && b < 0.0 && c < 0.0)
}
