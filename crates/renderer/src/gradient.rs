//! Colormap rendering for scalar result maps.

use com_common::{ComError, ComResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Minimum pixels before rows are colored in parallel
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// RGB image buffer, 3 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    /// Create a black image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 3],
        }
    }

    /// RGB triple at (row, col).
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let idx = (row * self.width + col) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Color value in RGB format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Named single-channel colormaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Inferno,
    Magma,
    Plasma,
    Cubehelix,
    Greys,
}

impl Colormap {
    /// Parse a colormap name, falling back to viridis.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inferno" => Self::Inferno,
            "magma" => Self::Magma,
            "plasma" => Self::Plasma,
            "cubehelix" => Self::Cubehelix,
            "greys" | "grays" | "gray" => Self::Greys,
            _ => Self::Viridis,
        }
    }

    fn gradient(&self) -> colorous::Gradient {
        match self {
            Colormap::Viridis => colorous::VIRIDIS,
            Colormap::Inferno => colorous::INFERNO,
            Colormap::Magma => colorous::MAGMA,
            Colormap::Plasma => colorous::PLASMA,
            Colormap::Cubehelix => colorous::CUBEHELIX,
            Colormap::Greys => colorous::GREYS,
        }
    }

    /// Color for a normalized value in [0, 1].
    pub fn color(&self, normalized: f64) -> Color {
        let c = self.gradient().eval_continuous(normalized.clamp(0.0, 1.0));
        Color::new(c.r, c.g, c.b)
    }
}

/// Minimum and maximum of the finite values, if any.
pub fn finite_range(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Render grid data through a color function.
///
/// # Arguments
/// - `data`: 2D grid of values (row-major order)
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `min_val`: Value mapped to 0
/// - `max_val`: Value mapped to 1
/// - `color_fn`: Function to convert a normalized value (0-1) to a color
///
/// Non-finite values and constant grids map to 0.
///
/// # Returns
/// RGB pixel data (3 bytes per pixel)
pub fn render_grid<F>(
    data: &[f64],
    width: usize,
    height: usize,
    min_val: f64,
    max_val: f64,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f64) -> Color + Sync,
{
    let mut pixels = vec![0u8; width * height * 3];
    if width == 0 || height == 0 {
        return pixels;
    }

    let range = max_val - min_val;
    let normalize = |value: f64| {
        if !value.is_finite() || range <= 0.0 || !range.is_finite() {
            0.0
        } else {
            ((value - min_val) / range).clamp(0.0, 1.0)
        }
    };

    let color_row = |(y, row): (usize, &mut [u8])| {
        for x in 0..width {
            let color = color_fn(normalize(data[y * width + x]));
            let pixel_idx = x * 3;
            row[pixel_idx] = color.r;
            row[pixel_idx + 1] = color.g;
            row[pixel_idx + 2] = color.b;
        }
    };

    if width * height >= PARALLEL_THRESHOLD {
        pixels.par_chunks_mut(width * 3).enumerate().for_each(color_row);
    } else {
        pixels.chunks_mut(width * 3).enumerate().for_each(color_row);
    }

    pixels
}

/// Visualize a scalar map with a colormap.
///
/// The finite value range is stretched over the full colormap. With
/// `logarithmic`, values are shifted so the minimum becomes 1 and then
/// log-scaled before normalization.
pub fn visualize_simple(
    data: &[f64],
    width: usize,
    height: usize,
    colormap: Colormap,
    logarithmic: bool,
) -> ComResult<RgbImage> {
    if data.len() != width * height {
        return Err(ComError::Render(format!(
            "data length {} does not match {}x{} image",
            data.len(),
            width,
            height
        )));
    }

    let scaled;
    let values = if logarithmic {
        let shift = finite_range(data).map(|(lo, _)| lo).unwrap_or(0.0);
        scaled = data
            .iter()
            .map(|v| (v - shift + 1.0).ln())
            .collect::<Vec<_>>();
        &scaled[..]
    } else {
        data
    };

    let (min_val, max_val) = match finite_range(values) {
        Some(range) => range,
        None => {
            if !values.is_empty() {
                warn!(width, height, "No finite values to visualize");
            }
            (0.0, 0.0)
        }
    };

    let pixels = render_grid(values, width, height, min_val, max_val, |norm| {
        colormap.color(norm)
    });

    Ok(RgbImage {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_range_skips_nan() {
        let data = [f64::NAN, 2.0, -1.0, f64::INFINITY, 5.0];
        assert_eq!(finite_range(&data), Some((-1.0, 5.0)));
        assert_eq!(finite_range(&[f64::NAN]), None);
        assert_eq!(finite_range(&[]), None);
    }

    #[test]
    fn test_colormap_from_str() {
        assert_eq!(Colormap::from_str("Inferno"), Colormap::Inferno);
        assert_eq!(Colormap::from_str("gray"), Colormap::Greys);
        assert_eq!(Colormap::from_str("unknown"), Colormap::Viridis);
    }

    #[test]
    fn test_render_grid_endpoints() {
        let data = [0.0, 10.0];
        let pixels = render_grid(&data, 2, 1, 0.0, 10.0, |n| {
            let v = (n * 255.0).round() as u8;
            Color::new(v, v, v)
        });
        assert_eq!(pixels, vec![0, 0, 0, 255, 255, 255]);
    }
}
