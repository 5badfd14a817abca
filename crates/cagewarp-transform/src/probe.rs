use cagewarp_cage::Rect;

/// Observer of the events of a warp pass.
///
/// Every method has an empty default, and `()` is the probe that ignores everything. Probes
/// are called synchronously from the warp loop and must not assume any particular order
/// between cells beyond row-major.
pub trait WarpProbe {
    /// The destination mapping function was evaluated once.
    fn destination_evaluated(&mut self) {}

    /// The rasterizer entered a triangle at the given recursion depth.
    fn triangle_visited(&mut self, _depth: u32) {}

    /// A triangle was discarded because it went past the recursion depth cap.
    fn triangle_dropped(&mut self, _depth: u32) {}

    /// Pixel `(x, y)` of the output received a source coordinate.
    fn pixel_written(&mut self, _x: i32, _y: i32) {}

    /// A row of grid cells is done; `progress` is the walked fraction in `(0, 1]`.
    fn row_completed(&mut self, _progress: f64) {}
}

impl WarpProbe for () {}

/// Probe counting the events of a warp pass.
///
/// Optionally keeps a write count per pixel of a rectangle, to check that rasterized
/// triangles do not overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WarpStats {
    /// Number of destination mapping evaluations.
    pub destinations_evaluated: usize,
    /// Number of triangles entered by the rasterizer, subdivisions included.
    pub triangles_visited: usize,
    /// Number of triangles discarded at the depth cap.
    pub triangles_dropped: usize,
    /// Number of pixel writes.
    pub pixels_written: usize,
    /// Deepest recursion level reached.
    pub max_depth: u32,
    /// Last reported progress.
    pub progress: f64,
    write_counts: Option<(Rect, Vec<u32>)>,
}

impl WarpStats {
    /// Create a probe with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe that also counts writes for every pixel of `rect`.
    pub fn with_write_counts(rect: Rect) -> Self {
        Self {
            write_counts: Some((rect, vec![0; rect.area()])),
            ..Self::default()
        }
    }

    /// Number of writes to pixel `(x, y)`, if write counting covers it.
    pub fn write_count(&self, x: i32, y: i32) -> Option<u32> {
        let (rect, counts) = self.write_counts.as_ref()?;
        rect.offset(x, y).map(|i| counts[i])
    }
}

impl WarpProbe for WarpStats {
    fn destination_evaluated(&mut self) {
        self.destinations_evaluated += 1;
    }

    fn triangle_visited(&mut self, depth: u32) {
        self.triangles_visited += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    fn triangle_dropped(&mut self, _depth: u32) {
        self.triangles_dropped += 1;
    }

    fn pixel_written(&mut self, x: i32, y: i32) {
        self.pixels_written += 1;
        if let Some((rect, counts)) = self.write_counts.as_mut() {
            if let Some(i) = rect.offset(x, y) {
                counts[i] += 1;
            }
        }
    }

    fn row_completed(&mut self, progress: f64) {
        self.progress = progress;
    }
}

#[cfg(test)]
mod tests {
    use super::{WarpProbe, WarpStats};
    use cagewarp_cage::Rect;

    #[test]
    fn stats_count_events() {
        let mut stats = WarpStats::with_write_counts(Rect::new(1, 1, 2, 2));
        stats.destination_evaluated();
        stats.triangle_visited(0);
        stats.triangle_visited(3);
        stats.triangle_dropped(6);
        stats.pixel_written(1, 1);
        stats.pixel_written(1, 1);
        stats.pixel_written(5, 5);
        stats.row_completed(0.5);

        assert_eq!(stats.destinations_evaluated, 1);
        assert_eq!(stats.triangles_visited, 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.triangles_dropped, 1);
        assert_eq!(stats.pixels_written, 3);
        assert_eq!(stats.write_count(1, 1), Some(2));
        assert_eq!(stats.write_count(2, 2), Some(0));
        assert_eq!(stats.write_count(5, 5), None);
        assert_eq!(stats.progress, 0.5);
    }

    #[test]
    fn stats_without_write_counts() {
        let mut stats = WarpStats::new();
        stats.pixel_written(0, 0);
        assert_eq!(stats.write_count(0, 0), None);
        assert_eq!(stats.pixels_written, 1);
    }
}
