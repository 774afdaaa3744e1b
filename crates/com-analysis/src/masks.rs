//! Mask factory for the COM reduction.
//!
//! Masks use pixel coordinates: pixel `(py, px)` is inside the ROI when
//! `(py - cy)² + (px - cx)² <= r²`. The boundary is inclusive and fractional
//! centers are used as-is, without rounding. The gradient masks carry the
//! pixel index itself, so weighted sums divided by the total intensity give
//! positions in the same units as `cx` and `cy`.

use com_common::{ComResult, DetectorGeometry, MASK_COUNT};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which of the three COM masks to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskKind {
    /// Disk indicator
    Sum,
    /// Disk times the row index
    GradientY,
    /// Disk times the column index
    GradientX,
}

/// Everything needed to produce one mask on demand.
///
/// Masks are built fresh on every call to [`MaskSpec::build`]; nothing is
/// cached between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskSpec {
    pub kind: MaskKind,
    pub geometry: DetectorGeometry,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl MaskSpec {
    /// Build the mask as a `(height, width)` f32 array.
    pub fn build(&self) -> Array2<f32> {
        match self.kind {
            MaskKind::Sum => disk_mask(&self.geometry, self.cx, self.cy, self.r),
            MaskKind::GradientY => {
                gradient_y(&self.geometry) * disk_mask(&self.geometry, self.cx, self.cy, self.r)
            }
            MaskKind::GradientX => {
                gradient_x(&self.geometry) * disk_mask(&self.geometry, self.cx, self.cy, self.r)
            }
        }
    }
}

/// Create the `[sum, gradient_y, gradient_x]` mask specs for a dataset.
///
/// Fails with `UnsupportedGeometry` unless the signal shape is 2D.
pub fn com_masks_factory(
    sig_shape: &[usize],
    cx: f64,
    cy: f64,
    r: f64,
) -> ComResult<[MaskSpec; MASK_COUNT]> {
    let geometry = DetectorGeometry::from_sig_shape(sig_shape)?;
    debug!(
        height = geometry.height,
        width = geometry.width,
        cx,
        cy,
        r,
        "Creating COM mask factories"
    );

    let spec = |kind| MaskSpec {
        kind,
        geometry,
        cx,
        cy,
        r,
    };
    Ok([
        spec(MaskKind::Sum),
        spec(MaskKind::GradientY),
        spec(MaskKind::GradientX),
    ])
}

/// Build every mask in order.
pub fn build_all(specs: &[MaskSpec]) -> Vec<Array2<f32>> {
    specs.iter().map(MaskSpec::build).collect()
}

/// 1.0 inside the disk of radius `r` around `(cy, cx)`, 0.0 elsewhere.
///
/// An infinite radius selects every pixel.
pub fn disk_mask(geometry: &DetectorGeometry, cx: f64, cy: f64, r: f64) -> Array2<f32> {
    let r_sq = r * r;
    Array2::from_shape_fn(geometry.shape(), |(py, px)| {
        let dy = py as f64 - cy;
        let dx = px as f64 - cx;
        if dy * dy + dx * dx <= r_sq {
            1.0
        } else {
            0.0
        }
    })
}

/// Row index of every pixel.
pub fn gradient_y(geometry: &DetectorGeometry) -> Array2<f32> {
    Array2::from_shape_fn(geometry.shape(), |(py, _)| py as f32)
}

/// Column index of every pixel.
pub fn gradient_x(geometry: &DetectorGeometry) -> Array2<f32> {
    Array2::from_shape_fn(geometry.shape(), |(_, px)| px as f32)
}
