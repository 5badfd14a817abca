use glam::DVec2;

/// Axis-aligned rectangle on the pixel grid.
///
/// The rectangle covers the pixels `x..x + width` and `y..y + height`. Width and height are
/// never negative; constructors clamp them to zero.
///
/// # Examples
///
/// ```
/// use cagewarp_cage::Rect;
///
/// let rect = Rect::new(2, 3, 10, 20);
///
/// assert_eq!(rect.right(), 12);
/// assert_eq!(rect.bottom(), 23);
/// assert_eq!(rect.area(), 200);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Rect {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

const ENCLOSING_LIMIT: i64 = i32::MAX as i64 / 2;

impl From<[i32; 4]> for Rect {
    fn from(rect: [i32; 4]) -> Self {
        Rect::new(rect[0], rect[1], rect[2], rect[3])
    }
}

impl Rect {
    /// Create a new rectangle, clamping a negative width or height to zero.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Create a rectangle anchored at the origin.
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest pixel rectangle enclosing all the given points.
    ///
    /// Returns an empty rectangle when `points` is empty. Coordinates are limited to
    /// `±i32::MAX / 2` so that the width and height of the result stay representable.
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };

        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));

        let limit = |v: f64| (v as i64).clamp(-ENCLOSING_LIMIT, ENCLOSING_LIMIT);
        Self::from_bounds(
            limit(min.x.floor()),
            limit(min.y.floor()),
            limit(max.x.ceil()),
            limit(max.y.ceil()),
        )
    }

    // rectangle spanning [x0, x1) x [y0, y1), clamped to what an i32 rectangle can hold
    fn from_bounds(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64);
        let (x, y) = (clamp(x0), clamp(y0));
        Self::new(
            x as i32,
            y as i32,
            clamp(x1.saturating_sub(x)) as i32,
            clamp(y1.saturating_sub(y)) as i32,
        )
    }

    /// One past the last column, saturating at `i32::MAX`.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// One past the last row, saturating at `i32::MAX`.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Number of pixels covered by the rectangle.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if the rectangle covers no pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if the pixel `(x, y)` lies in the rectangle.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if a continuous point lies in the rectangle, borders included.
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.x as f64
            && p.x <= self.right() as f64
            && p.y >= self.y as f64
            && p.y <= self.bottom() as f64
    }

    /// Smallest rectangle containing both rectangles. Empty rectangles are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_bounds(
            self.x.min(other.x) as i64,
            self.y.min(other.y) as i64,
            self.right().max(other.right()) as i64,
            self.bottom().max(other.bottom()) as i64,
        )
    }

    /// Overlap of both rectangles, empty if they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect::from_bounds(
            self.x.max(other.x) as i64,
            self.y.max(other.y) as i64,
            self.right().min(other.right()) as i64,
            self.bottom().min(other.bottom()) as i64,
        )
    }

    /// Row-major offset of pixel `(x, y)` relative to the rectangle origin.
    ///
    /// Returns `None` if the pixel lies outside the rectangle.
    #[inline]
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some((y - self.y) as usize * self.width as usize + (x - self.x) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;
    use glam::DVec2;

    #[test]
    fn new_clamps_negative_size() {
        let rect = Rect::new(1, 1, -3, 4);
        assert_eq!(rect.width, 0);
        assert!(rect.is_empty());
        assert_eq!(rect.area(), 0);
    }

    #[test]
    fn enclosing_rounds_outwards() {
        let points = [DVec2::new(0.5, 1.2), DVec2::new(9.1, 3.0), DVec2::new(-1.5, 7.9)];
        let rect = Rect::enclosing(points);
        assert_eq!(rect, Rect::new(-2, 1, 12, 7));
    }

    #[test]
    fn enclosing_empty() {
        assert!(Rect::enclosing(std::iter::empty()).is_empty());
    }

    #[test]
    fn union_and_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 10, 10);
        assert_eq!(a.union(&b), Rect::new(0, -5, 15, 15));
        assert_eq!(a.intersect(&b), Rect::new(5, 0, 5, 5));
        assert!(a.intersect(&Rect::new(20, 20, 2, 2)).is_empty());
        assert_eq!(a.union(&Rect::default()), a);
    }

    #[test]
    fn offset_is_row_major() {
        let rect = Rect::new(2, 3, 4, 5);
        assert_eq!(rect.offset(2, 3), Some(0));
        assert_eq!(rect.offset(5, 3), Some(3));
        assert_eq!(rect.offset(2, 4), Some(4));
        assert_eq!(rect.offset(6, 3), None);
        assert_eq!(rect.offset(1, 3), None);
    }

    #[test]
    fn far_away_points_saturate() {
        let points = [
            DVec2::new(-3.0e9, 0.0),
            DVec2::new(3.0e9, 0.0),
            DVec2::new(0.0, 10.0),
        ];
        let limit = i32::MAX / 2;
        let rect = Rect::enclosing(points);
        assert_eq!(rect, Rect::new(-limit, 0, 2 * limit, 10));
        assert_eq!(rect.right(), limit);
        assert!(rect.contains(0, 5));

        let huge = Rect::enclosing([DVec2::splat(f64::MAX), DVec2::splat(-f64::MAX)]);
        assert_eq!(huge, Rect::new(-limit, -limit, 2 * limit, 2 * limit));

        let far = Rect::new(i32::MAX - 5, i32::MAX - 5, 100, 100);
        assert_eq!(far.right(), i32::MAX);
        let min = Rect::new(i32::MIN, i32::MIN, 1, 1);
        assert_eq!(min.union(&far), Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
        assert!(far.intersect(&Rect::from_size(10, 10)).is_empty());
    }

    #[test]
    fn contains_point_includes_border() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains_point(DVec2::new(10.0, 0.0)));
        assert!(!rect.contains_point(DVec2::new(10.01, 5.0)));
    }
}
