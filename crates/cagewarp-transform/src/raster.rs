use cagewarp_cage::Rect;
use glam::DVec2;

use crate::barycentric::{barycentric, is_inside};
use crate::coords::CoordinateBuffer;
use crate::probe::WarpProbe;

/// Deepest subdivision level the rasterizer processes. Triangles produced below it are
/// dropped without contribution.
pub const MAX_RECURSION_DEPTH: u32 = 5;

/// Upper bound of triangles visited when rasterizing one triangle, the root included.
///
/// Every level up to one past [`MAX_RECURSION_DEPTH`] may be entered, each splitting 1-to-4.
pub const MAX_VISITS_PER_TRIANGLE: usize = (4usize.pow(MAX_RECURSION_DEPTH + 2) - 1) / 3;

/// Triangle corner known both in source and in destination space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleVertex {
    /// Position in the source image.
    pub source: DVec2,
    /// Position in the output image.
    pub destination: DVec2,
}

impl TriangleVertex {
    /// Create a triangle corner.
    pub fn new(source: DVec2, destination: DVec2) -> Self {
        Self {
            source,
            destination,
        }
    }

    #[inline]
    fn midpoint(&self, other: &Self) -> Self {
        Self {
            source: (self.source + other.source) * 0.5,
            destination: (self.destination + other.destination) * 0.5,
        }
    }
}

/// Rasterize a source/destination triangle pair into `output`.
///
/// Every output pixel of `region` whose center falls strictly inside the destination
/// triangle receives the barycentric blend of the three source positions. Large triangles
/// are split 1-to-4 at their edge midpoints until their destination footprint covers a
/// single pixel center; triangles off `region`, without any pixel center, or deeper than
/// [`MAX_RECURSION_DEPTH`] are discarded.
///
/// # Arguments
///
/// * `triangle` - The three corners of the triangle.
/// * `region` - The output region to rasterize into.
/// * `output` - The coordinate buffer receiving the source positions.
/// * `probe` - Observer of the visited triangles and written pixels.
pub fn rasterize_triangle<P: WarpProbe>(
    triangle: [TriangleVertex; 3],
    region: Rect,
    output: &mut CoordinateBuffer,
    probe: &mut P,
) {
    rasterize(triangle, region, output, 0, probe);
}

fn rasterize<P: WarpProbe>(
    triangle: [TriangleVertex; 3],
    region: Rect,
    output: &mut CoordinateBuffer,
    depth: u32,
    probe: &mut P,
) {
    probe.triangle_visited(depth);

    let [p1, p2, p3] = triangle;
    let (d1, d2, d3) = (p1.destination, p2.destination, p3.destination);

    // whole triangle beyond one side of the region
    let (left, top) = (region.x as f64, region.y as f64);
    let (right, bottom) = (region.right() as f64, region.bottom() as f64);
    if d1.x >= right && d2.x >= right && d3.x >= right {
        return;
    }
    if d1.y >= bottom && d2.y >= bottom && d3.y >= bottom {
        return;
    }
    if d1.x < left && d2.x < left && d3.x < left {
        return;
    }
    if d1.y < top && d2.y < top && d3.y < top {
        return;
    }

    // rounding to the nearest grid line leaves exactly as many columns (rows) as pixel
    // centers covered by the destination footprint
    let xmin = d1.x.min(d2.x).min(d3.x).round() as i64;
    let xmax = d1.x.max(d2.x).max(d3.x).round() as i64;
    let ymin = d1.y.min(d2.y).min(d3.y).round() as i64;
    let ymax = d1.y.max(d2.y).max(d3.y).round() as i64;

    if xmin == xmax || ymin == ymax {
        return;
    }

    if depth > MAX_RECURSION_DEPTH {
        probe.triangle_dropped(depth);
        return;
    }

    if xmax - xmin == 1 && ymax - ymin == 1 {
        let (x, y) = (xmin as i32, ymin as i32);
        let center = DVec2::new(xmin as f64 + 0.5, ymin as f64 + 0.5);

        if let Some(weights @ [a, b, c]) = barycentric(center, d1, d2, d3) {
            if is_inside(weights) {
                let source = p1.source * a + p2.source * b + p3.source * c;
                if output.set(x, y, source) {
                    probe.pixel_written(x, y);
                }
            }
        }
        return;
    }

    //        p1
    //       /  \
    //     m31---m12
    //     / \   / \
    //   p3---m23---p2
    let m12 = p1.midpoint(&p2);
    let m23 = p2.midpoint(&p3);
    let m31 = p3.midpoint(&p1);

    rasterize([p1, m12, m31], region, output, depth + 1, probe);
    rasterize([m12, p2, m23], region, output, depth + 1, probe);
    rasterize([m12, m23, m31], region, output, depth + 1, probe);
    rasterize([m31, m23, p3], region, output, depth + 1, probe);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::WarpStats;
    use approx::assert_relative_eq;

    fn vertex(x: f64, y: f64) -> TriangleVertex {
        TriangleVertex::new(DVec2::new(x, y), DVec2::new(x, y))
    }

    #[test]
    fn max_visits_bound() {
        assert_eq!(MAX_VISITS_PER_TRIANGLE, 5461);
    }

    #[test]
    fn single_pixel_triangle() {
        let region = Rect::from_size(4, 4);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::new();

        // destination covers the center of pixel (1, 2), source is shifted by (10, 0)
        let shift = DVec2::new(10.0, 0.0);
        let triangle = [
            DVec2::new(0.8, 1.9),
            DVec2::new(2.1, 2.0),
            DVec2::new(1.0, 3.1),
        ]
        .map(|d| TriangleVertex::new(d + shift, d));
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert_eq!(stats.pixels_written, 1);
        assert_eq!(stats.triangles_visited, 1);
        let [x, y] = output.get(1, 2).unwrap();
        assert_relative_eq!(x, 11.5, epsilon = 1e-5);
        assert_relative_eq!(y, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn large_triangle_is_subdivided() {
        let region = Rect::from_size(8, 8);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::with_write_counts(region);

        let triangle = [vertex(0.1, 0.2), vertex(7.9, 0.2), vertex(0.1, 7.7)];
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert!(stats.max_depth > 0);
        assert_eq!(stats.triangles_dropped, 0);
        assert!(stats.pixels_written > 20);
        for y in 0..8 {
            for x in 0..8 {
                // centers clearly inside the triangle are written exactly once
                let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
                let inside = cx > 0.2 && cy > 0.3 && cx / 7.8 + cy / 7.5 < 0.9;
                if inside {
                    assert_eq!(stats.write_count(x, y), Some(1), "pixel ({x}, {y})");
                }
                assert!(stats.write_count(x, y) <= Some(1));
            }
        }
    }

    #[test]
    fn triangle_outside_region_is_rejected() {
        let region = Rect::from_size(4, 4);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::new();

        for offset in [
            DVec2::new(100.0, 0.0),
            DVec2::new(-100.0, 0.0),
            DVec2::new(0.0, 100.0),
            DVec2::new(0.0, -100.0),
        ] {
            let triangle = [
                vertex(0.0, 0.0),
                vertex(50.0, 0.0),
                vertex(0.0, 50.0),
            ]
            .map(|v| TriangleVertex::new(v.source, v.destination + offset));
            rasterize_triangle(triangle, region, &mut output, &mut stats);
        }

        assert_eq!(stats.triangles_visited, 4);
        assert_eq!(stats.pixels_written, 0);
        assert_eq!(output, CoordinateBuffer::identity(region));
    }

    #[test]
    fn huge_triangle_terminates_at_depth_cap() {
        let region = Rect::from_size(64, 64);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::new();

        let triangle = [
            vertex(-1.0e6, -1.0e6),
            vertex(1.0e6, -1.0e6),
            vertex(0.0, 1.0e6),
        ];
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert!(stats.triangles_visited <= MAX_VISITS_PER_TRIANGLE);
        assert!(stats.triangles_dropped > 0);
        assert_eq!(stats.max_depth, MAX_RECURSION_DEPTH + 1);
        assert_eq!(stats.pixels_written, 0);
    }

    #[test]
    fn zero_area_triangle_writes_nothing() {
        let region = Rect::from_size(64, 64);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::new();

        let triangle = [vertex(0.0, 0.0), vertex(30.0, 30.0), vertex(60.0, 60.0)];
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert!(stats.triangles_visited <= MAX_VISITS_PER_TRIANGLE);
        assert_eq!(stats.pixels_written, 0);
        assert_eq!(output, CoordinateBuffer::identity(region));
    }

    #[test]
    fn thin_triangle_without_pixel_center_is_rejected() {
        let region = Rect::from_size(8, 8);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::new();

        // spans columns but stays between two pixel-center rows
        let triangle = [vertex(0.0, 2.6), vertex(7.0, 2.6), vertex(3.0, 3.4)];
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert_eq!(stats.triangles_visited, 1);
        assert_eq!(stats.pixels_written, 0);
    }

    #[test]
    fn partial_overlap_only_writes_inside_region() {
        let region = Rect::new(2, 2, 4, 4);
        let mut output = CoordinateBuffer::identity(region);
        let mut stats = WarpStats::with_write_counts(Rect::new(-10, -10, 40, 40));

        let triangle = [vertex(0.3, 0.2), vertex(9.7, 0.2), vertex(0.3, 9.6)];
        rasterize_triangle(triangle, region, &mut output, &mut stats);

        assert!(stats.pixels_written > 0);
        for y in -10..30 {
            for x in -10..30 {
                if !region.contains(x, y) {
                    assert_eq!(stats.write_count(x, y), Some(0));
                }
            }
        }
    }
}
