#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// barycentric coordinates of a point in a triangle.
pub mod barycentric;

/// source coordinate buffer produced by the warp.
pub mod coords;

/// the cage warp engine.
pub mod engine;

/// Error types for the warp module.
pub mod error;

/// instrumentation hooks of a warp pass.
pub mod probe;

/// adaptive triangle rasterization.
pub mod raster;

/// per-pixel cage coefficients.
pub mod weights;

pub use crate::coords::CoordinateBuffer;
pub use crate::engine::{warp, warp_with_probe, CageWarpEngine, WarpOptions};
pub use crate::error::WarpError;
pub use crate::probe::{WarpProbe, WarpStats};
pub use crate::raster::{rasterize_triangle, TriangleVertex, MAX_RECURSION_DEPTH};
pub use crate::weights::WeightBuffer;
