/// An error type for the warp module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WarpError {
    /// Error when the weight samples carry fewer than two coefficients per cage vertex.
    #[error("Weight buffer has {found} coefficients per sample but the cage needs {expected}")]
    InvalidWeightBufferShape {
        /// Minimum number of coefficients, twice the vertex count.
        expected: usize,
        /// Number of coefficients in the buffer.
        found: usize,
    },

    /// Error when the flat data length does not match the buffer extent.
    #[error("Data length ({0}) does not match the buffer size ({1})")]
    InvalidDataLength(usize, usize),
}
