use cagewarp_cage::Rect;
use glam::DVec2;

use crate::error::WarpError;

/// Source-image coordinates for every pixel of an output region.
///
/// Pixel `(x, y)` of the region maps to the location `get(x, y)` of the source image. The
/// buffer is meant to be handed to a resampler; [`CoordinateBuffer::into_maps`] splits it into
/// the separate x and y maps a `remap` style resampler takes.
///
/// # Examples
///
/// ```
/// use cagewarp_cage::Rect;
/// use cagewarp_transform::CoordinateBuffer;
///
/// let coords = CoordinateBuffer::identity(Rect::new(4, 2, 3, 3));
///
/// assert_eq!(coords.get(5, 3), Some([5.5, 3.5]));
/// assert_eq!(coords.get(0, 0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateBuffer {
    rect: Rect,
    data: Vec<[f32; 2]>,
}

impl CoordinateBuffer {
    /// Create a coordinate buffer from per-pixel coordinates in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of `data` is not `rect.area()`.
    pub fn new(rect: Rect, data: Vec<[f32; 2]>) -> Result<Self, WarpError> {
        if data.len() != rect.area() {
            return Err(WarpError::InvalidDataLength(data.len(), rect.area()));
        }
        Ok(Self { rect, data })
    }

    /// Create the buffer mapping every pixel to its own center, `(x + 0.5, y + 0.5)`.
    pub fn identity(rect: Rect) -> Self {
        let mut data = Vec::with_capacity(rect.area());
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                data.push([x as f32 + 0.5, y as f32 + 0.5]);
            }
        }
        Self { rect, data }
    }

    /// Output region covered by the buffer.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Width of the region in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width as usize
    }

    /// Height of the region in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height as usize
    }

    /// Get the coordinates in row-major order.
    pub fn as_slice(&self) -> &[[f32; 2]] {
        &self.data
    }

    /// Source coordinate of pixel `(x, y)`, or `None` outside the region.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<[f32; 2]> {
        self.rect.offset(x, y).map(|i| self.data[i])
    }

    /// Store the source coordinate of pixel `(x, y)`.
    ///
    /// Returns `false` and leaves the buffer untouched if the pixel is outside the region.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, source: DVec2) -> bool {
        match self.rect.offset(x, y) {
            Some(i) => {
                self.data[i] = [source.x as f32, source.y as f32];
                true
            }
            None => false,
        }
    }

    /// Split into the x and y coordinate maps, each of `width * height` values.
    pub fn into_maps(self) -> (Vec<f32>, Vec<f32>) {
        self.data.into_iter().map(|[x, y]| (x, y)).unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::CoordinateBuffer;
    use crate::error::WarpError;
    use cagewarp_cage::Rect;
    use glam::DVec2;

    #[test]
    fn identity_holds_pixel_centers() {
        let coords = CoordinateBuffer::identity(Rect::new(-1, 0, 2, 2));
        assert_eq!(coords.width(), 2);
        assert_eq!(coords.height(), 2);
        assert_eq!(
            coords.as_slice(),
            &[[-0.5, 0.5], [0.5, 0.5], [-0.5, 1.5], [0.5, 1.5]]
        );
    }

    #[test]
    fn set_inside_and_outside() {
        let mut coords = CoordinateBuffer::identity(Rect::from_size(3, 3));
        assert!(coords.set(2, 1, DVec2::new(7.25, -1.0)));
        assert_eq!(coords.get(2, 1), Some([7.25, -1.0]));
        assert!(!coords.set(3, 1, DVec2::ZERO));
        assert!(!coords.set(0, -1, DVec2::ZERO));
    }

    #[test]
    fn new_checks_length() {
        let res = CoordinateBuffer::new(Rect::from_size(2, 2), vec![[0.0, 0.0]; 3]);
        assert_eq!(res, Err(WarpError::InvalidDataLength(3, 4)));
    }

    #[test]
    fn into_maps_splits_axes() -> Result<(), WarpError> {
        let coords = CoordinateBuffer::new(
            Rect::from_size(3, 1),
            vec![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]],
        )?;
        let (map_x, map_y) = coords.into_maps();
        assert_eq!(map_x, vec![0.0, 2.0, 4.0]);
        assert_eq!(map_y, vec![1.0, 3.0, 5.0]);
        Ok(())
    }
}
