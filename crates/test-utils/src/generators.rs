//! Generators for synthetic detector data and reduction maps.
//!
//! These create predictable, verifiable patterns for the analysis tests,
//! including a reference dense reducer that applies masks to frames.

use ndarray::{Array2, Array4, Axis};
use num_complex::Complex64;

/// Creates a map with predictable values: `row * 10 + col`.
///
/// # Example
///
/// ```
/// use test_utils::create_test_map;
///
/// let map = create_test_map(2, 3);
/// assert_eq!(map[[1, 2]], 12.0);
/// ```
pub fn create_test_map(height: usize, width: usize) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(row, col)| (row * 10 + col) as f64)
}

/// Creates a complex map with `re = row`, `im = col`.
pub fn create_complex_test_map(height: usize, width: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        Complex64::new(row as f64, col as f64)
    })
}

/// Renders a single detector frame with a Gaussian spot.
///
/// # Arguments
///
/// * `det_height`, `det_width` - Detector shape
/// * `cy`, `cx` - Spot center in pixel coordinates
/// * `sigma` - Spot width in pixels
pub fn spot_frame(det_height: usize, det_width: usize, cy: f64, cx: f64, sigma: f64) -> Array2<f32> {
    let two_sigma_sq = 2.0 * sigma * sigma;
    Array2::from_shape_fn((det_height, det_width), |(py, px)| {
        let dy = py as f64 - cy;
        let dx = px as f64 - cx;
        (-(dy * dy + dx * dx) / two_sigma_sq).exp() as f32
    })
}

/// Renders a 4D stack of single-pixel frames.
///
/// The frame at scan position `(ny, nx)` has unit intensity at the pixel
/// returned by `spot_at(ny, nx)`, or is empty when it returns `None`.
pub fn point_spot_stack<F>(
    nav: (usize, usize),
    det: (usize, usize),
    spot_at: F,
) -> Array4<f32>
where
    F: Fn(usize, usize) -> Option<(usize, usize)>,
{
    let mut stack = Array4::<f32>::zeros((nav.0, nav.1, det.0, det.1));
    for ny in 0..nav.0 {
        for nx in 0..nav.1 {
            if let Some((py, px)) = spot_at(ny, nx) {
                stack[[ny, nx, py, px]] = 1.0;
            }
        }
    }
    stack
}

/// Reference dense reducer: inner product of every frame with every mask.
///
/// Returns one map over navigation space per mask, in mask order.
pub fn dense_reduce(frames: &Array4<f32>, masks: &[Array2<f32>]) -> Vec<Array2<f64>> {
    let (nav_h, nav_w, _, _) = frames.dim();
    masks
        .iter()
        .map(|mask| {
            let mut out = Array2::<f64>::zeros((nav_h, nav_w));
            for (ny, row) in frames.axis_iter(Axis(0)).enumerate() {
                for (nx, frame) in row.axis_iter(Axis(0)).enumerate() {
                    out[[ny, nx]] = frame
                        .iter()
                        .zip(mask.iter())
                        .map(|(f, m)| *f as f64 * *m as f64)
                        .sum();
                }
            }
            out
        })
        .collect()
}
