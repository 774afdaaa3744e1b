//! Image rendering for center-of-mass result maps.
//!
//! Implements the visualizations attached to every analysis result:
//! - Single-channel colormap rendering
//! - Cubehelix colour wheel for 2D vector fields
//! - PNG encoding of the RGB buffers

pub mod gradient;
pub mod png;
pub mod wheel;

pub use gradient::{visualize_simple, Colormap, RgbImage};
pub use wheel::CubehelixWheel;
