#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use cagewarp_cage as cage;

#[doc(inline)]
pub use cagewarp_transform as transform;
