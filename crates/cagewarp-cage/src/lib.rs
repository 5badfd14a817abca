#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// cage model and vertex types.
pub mod cage;

/// Error types for the cage module.
pub mod error;

/// polygon predicates used by the cage.
pub mod polygon;

/// pixel rectangle type.
pub mod rect;

pub use crate::cage::{CageMode, CageModel, CageVertex};
pub use crate::error::CageError;
pub use crate::rect::Rect;

/// Position in image space.
pub type Point2 = glam::DVec2;

/// Displacement or direction in image space.
pub type Vector2 = glam::DVec2;

pub use glam::DVec2;
