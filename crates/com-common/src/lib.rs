//! Common types shared across the center-of-mass analysis crates.

pub mod error;
pub mod geometry;
pub mod params;

pub use error::{ComError, ComResult};
pub use geometry::{DatasetShape, DetectorGeometry, NavShape};
pub use params::{resolve_parameters, ComParameters, MaskDtype, ResolvedParameters, MASK_COUNT};
