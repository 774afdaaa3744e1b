//! Cubehelix colour wheel for 2D vector fields.
//!
//! Direction is encoded as hue along a full cubehelix turn and length as
//! saturation: a zero vector renders as neutral grey, the longest vector in
//! the field at full colour.

use crate::gradient::{Color, RgbImage};
use com_common::{ComError, ComResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Cubehelix parameters (Green, 2011) for a constant-lightness wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubehelixWheel {
    /// Starting colour (0 = blue, 1 = red, 2 = green)
    pub start: f64,
    /// Number of R -> G -> B rotations over one turn of the wheel
    pub rotation: f64,
    /// Saturation multiplier
    pub hue: f64,
    /// Lightness in [0, 1]
    pub light: f64,
}

impl Default for CubehelixWheel {
    fn default() -> Self {
        Self {
            start: 1.0,
            rotation: 1.0,
            hue: 1.0,
            light: 0.5,
        }
    }
}

impl CubehelixWheel {
    /// Color for a direction (radians) and relative length in [0, 1].
    pub fn color(&self, angle: f64, saturation: f64) -> Color {
        let fraction = (angle + PI) / (2.0 * PI);
        let phi = 2.0 * PI * (self.start / 3.0 + self.rotation * fraction);
        let amp = self.hue * saturation.clamp(0.0, 1.0) * self.light * (1.0 - self.light);
        let (sin, cos) = phi.sin_cos();

        let r = self.light + amp * (-0.14861 * cos + 1.78277 * sin);
        let g = self.light + amp * (-0.29227 * cos - 0.90649 * sin);
        let b = self.light + amp * (1.97294 * cos);

        Color::new(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Render a vector field given as separate y and x component grids.
    ///
    /// `vmax` sets the length shown at full saturation; defaults to the
    /// longest finite vector. Non-finite vectors render as neutral grey.
    pub fn rgb_from_vector(
        &self,
        y: &[f64],
        x: &[f64],
        width: usize,
        height: usize,
        vmax: Option<f64>,
    ) -> ComResult<RgbImage> {
        let n = width * height;
        if y.len() != n || x.len() != n {
            return Err(ComError::Render(format!(
                "vector components ({}, {}) do not match {}x{} image",
                y.len(),
                x.len(),
                width,
                height
            )));
        }

        let vmax = vmax.unwrap_or_else(|| {
            y.iter()
                .zip(x)
                .map(|(vy, vx)| vy.hypot(*vx))
                .filter(|m| m.is_finite())
                .fold(0.0, f64::max)
        });

        let mut image = RgbImage::new(width, height);
        image
            .pixels
            .par_chunks_mut(3)
            .zip(y.par_iter().zip(x.par_iter()))
            .for_each(|(pixel, (&vy, &vx))| {
                let magnitude = vy.hypot(vx);
                let color = if !magnitude.is_finite() || vmax <= 0.0 {
                    self.color(0.0, 0.0)
                } else {
                    self.color(vy.atan2(vx), magnitude / vmax)
                };
                pixel[0] = color.r;
                pixel[1] = color.g;
                pixel[2] = color.b;
            });

        Ok(image)
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vector_is_grey() {
        let wheel = CubehelixWheel::default();
        let c = wheel.color(1.234, 0.0);
        assert_eq!(c, Color::new(128, 128, 128));
    }

    #[test]
    fn test_opposite_directions_differ() {
        let wheel = CubehelixWheel::default();
        let a = wheel.color(0.0, 1.0);
        let b = wheel.color(PI, 1.0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_wheel_is_continuous_across_branch_cut() {
        // With a whole number of rotations, -pi and +pi land on the same colour
        let wheel = CubehelixWheel::default();
        assert_eq!(wheel.color(-PI, 1.0), wheel.color(PI, 1.0));
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let wheel = CubehelixWheel::default();
        let err = wheel
            .rgb_from_vector(&[0.0; 4], &[0.0; 3], 2, 2, None)
            .unwrap_err();
        assert_eq!(err.kind(), "RenderError");
    }

    #[test]
    fn test_all_zero_field_renders_grey() {
        let wheel = CubehelixWheel::default();
        let image = wheel
            .rgb_from_vector(&[0.0; 4], &[0.0; 4], 2, 2, None)
            .unwrap();
        assert!(image.pixels.iter().all(|&p| p == 128));
    }
}
