//! Derived quantities of the 2D shift vector field.
//!
//! Divergence and curl share one finite-difference gradient so both see
//! identical boundary handling.

use com_common::{ComError, ComResult};
use ndarray::{Array2, Axis, Zip};

/// Boundary scheme of the numerical gradient.
///
/// Interior points always use second-order central differences with unit
/// spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeOrder {
    /// One-sided first-order differences at the edges
    #[default]
    First,
    /// One-sided second-order differences at the edges
    Second,
}

impl EdgeOrder {
    /// Minimum number of samples along the axis.
    pub fn min_len(self) -> usize {
        match self {
            EdgeOrder::First => 2,
            EdgeOrder::Second => 3,
        }
    }
}

/// Numerical derivative of `field` along `axis`.
///
/// Fails with `ShapeMismatch` if the axis is shorter than
/// [`EdgeOrder::min_len`].
pub fn gradient(field: &Array2<f64>, axis: Axis, edge_order: EdgeOrder) -> ComResult<Array2<f64>> {
    let n = field.len_of(axis);
    if n < edge_order.min_len() {
        return Err(ComError::shape_mismatch(format!(
            "axis {} of shape {:?} is too small for a numerical gradient, need at least {} elements",
            axis.index(),
            field.shape(),
            edge_order.min_len()
        )));
    }

    let mut out = Array2::<f64>::zeros(field.raw_dim());
    Zip::from(out.lanes_mut(axis))
        .and(field.lanes(axis))
        .for_each(|mut d, f| {
            for i in 1..n - 1 {
                d[i] = (f[i + 1] - f[i - 1]) / 2.0;
            }
            match edge_order {
                EdgeOrder::First => {
                    d[0] = f[1] - f[0];
                    d[n - 1] = f[n - 1] - f[n - 2];
                }
                EdgeOrder::Second => {
                    d[0] = (-3.0 * f[0] + 4.0 * f[1] - f[2]) / 2.0;
                    d[n - 1] = (3.0 * f[n - 1] - 4.0 * f[n - 2] + f[n - 3]) / 2.0;
                }
            }
        });

    Ok(out)
}

/// `∂y/∂row + ∂x/∂col`
pub fn divergence(y_centers: &Array2<f64>, x_centers: &Array2<f64>) -> ComResult<Array2<f64>> {
    check_components(y_centers, x_centers)?;
    let dy = gradient(y_centers, Axis(0), EdgeOrder::First)?;
    let dx = gradient(x_centers, Axis(1), EdgeOrder::First)?;
    Ok(dy + dx)
}

/// `∂y/∂col - ∂x/∂row`
pub fn curl_2d(y_centers: &Array2<f64>, x_centers: &Array2<f64>) -> ComResult<Array2<f64>> {
    check_components(y_centers, x_centers)?;
    let dy = gradient(y_centers, Axis(1), EdgeOrder::First)?;
    let dx = gradient(x_centers, Axis(0), EdgeOrder::First)?;
    Ok(dy - dx)
}

/// Elementwise vector length.
pub fn magnitude(y_centers: &Array2<f64>, x_centers: &Array2<f64>) -> ComResult<Array2<f64>> {
    check_components(y_centers, x_centers)?;
    Ok(Zip::from(y_centers)
        .and(x_centers)
        .map_collect(|&y, &x| (y * y + x * x).sqrt()))
}

fn check_components(y_centers: &Array2<f64>, x_centers: &Array2<f64>) -> ComResult<()> {
    if y_centers.shape() != x_centers.shape() {
        return Err(ComError::shape_mismatch(format!(
            "vector components differ in shape: y {:?}, x {:?}",
            y_centers.shape(),
            x_centers.shape()
        )));
    }
    Ok(())
}
