/// An error type for the cage module.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CageError {
    /// Error when a vertex index does not address the cage.
    #[error("Vertex index ({index}) is out of range for a cage with {len} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices in the cage.
        len: usize,
    },
}
