use cagewarp_cage::Rect;
use num_traits::{AsPrimitive, Float};

use crate::error::WarpError;

/// Per-pixel cage coefficients produced by a coordinate precomputation stage.
///
/// Every pixel of `extent` carries `channels` coefficients stored contiguously in row-major
/// order. For a cage with `n` vertices the first `n` coefficients of a sample weight the vertex
/// destinations and the last `n` weight the edge normals.
///
/// Samples requested outside the extent read as missing, which the warp treats as all-zero
/// coefficients.
///
/// # Examples
///
/// ```
/// use cagewarp_cage::Rect;
/// use cagewarp_transform::WeightBuffer;
///
/// let weights = WeightBuffer::<f32>::new(Rect::from_size(2, 1), 3, vec![0.0; 6]).unwrap();
///
/// assert_eq!(weights.channels(), 3);
/// assert_eq!(weights.sample(1, 0), Some(&[0.0f32; 3][..]));
/// assert_eq!(weights.sample(2, 0), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WeightBuffer<T = f32> {
    extent: Rect,
    channels: usize,
    data: Vec<T>,
}

impl<T> WeightBuffer<T>
where
    T: Float + AsPrimitive<f64>,
{
    /// Create a weight buffer from flat coefficient data.
    ///
    /// # Errors
    ///
    /// If the length of `data` is not `extent.area() * channels`.
    pub fn new(extent: Rect, channels: usize, data: Vec<T>) -> Result<Self, WarpError> {
        let expected = extent.area() * channels;
        if data.len() != expected {
            return Err(WarpError::InvalidDataLength(data.len(), expected));
        }
        Ok(Self {
            extent,
            channels,
            data,
        })
    }

    /// Create a weight buffer by filling the coefficients of every pixel with `f`.
    ///
    /// `f` receives the pixel coordinates and the zero-initialized coefficient slice.
    pub fn from_fn(extent: Rect, channels: usize, mut f: impl FnMut(i32, i32, &mut [T])) -> Self {
        let mut data = vec![T::zero(); extent.area() * channels];

        if channels > 0 {
            let width = extent.width.max(1) as usize;
            for (i, sample) in data.chunks_exact_mut(channels).enumerate() {
                let x = extent.x + (i % width) as i32;
                let y = extent.y + (i / width) as i32;
                f(x, y, sample);
            }
        }

        Self {
            extent,
            channels,
            data,
        }
    }

    /// Pixel rectangle covered by the buffer.
    #[inline]
    pub fn extent(&self) -> Rect {
        self.extent
    }

    /// Number of coefficients per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Get the flat coefficient data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Coefficients of pixel `(x, y)`, or `None` outside the extent.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> Option<&[T]> {
        let offset = self.extent.offset(x, y)? * self.channels;
        self.data.get(offset..offset + self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::WeightBuffer;
    use crate::error::WarpError;
    use cagewarp_cage::Rect;

    #[test]
    fn new_checks_length() {
        let res = WeightBuffer::<f32>::new(Rect::new(0, 0, 3, 2), 4, vec![0.0; 23]);
        assert_eq!(res, Err(WarpError::InvalidDataLength(23, 24)));
    }

    #[test]
    fn sample_with_offset_extent() -> Result<(), WarpError> {
        let data = (0..12).map(|v| v as f64).collect();
        let weights = WeightBuffer::new(Rect::new(-1, 5, 3, 2), 2, data)?;

        assert_eq!(weights.sample(-1, 5), Some(&[0.0, 1.0][..]));
        assert_eq!(weights.sample(1, 5), Some(&[4.0, 5.0][..]));
        assert_eq!(weights.sample(0, 6), Some(&[8.0, 9.0][..]));
        assert_eq!(weights.sample(2, 5), None);
        assert_eq!(weights.sample(0, 4), None);
        Ok(())
    }

    #[test]
    fn from_fn_visits_pixels_in_row_major_order() {
        let weights = WeightBuffer::<f32>::from_fn(Rect::new(10, 20, 2, 2), 2, |x, y, w| {
            w[0] = x as f32;
            w[1] = y as f32;
        });
        assert_eq!(
            weights.as_slice(),
            &[10.0, 20.0, 11.0, 20.0, 10.0, 21.0, 11.0, 21.0]
        );
    }

    #[test]
    fn from_fn_without_channels() {
        let weights = WeightBuffer::<f32>::from_fn(Rect::from_size(4, 4), 0, |_, _, _| {});
        assert!(weights.as_slice().is_empty());
        assert_eq!(weights.sample(1, 1), Some(&[][..]));
    }
}
