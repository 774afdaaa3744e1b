//! Center-of-mass shifts relative to the reference center.

use com_common::{ComError, ComResult};
use ndarray::{Array2, Zip};
use num_traits::Zero;
use std::ops::{Div, Sub};
use tracing::debug;

/// Convert the `[sum, y, x]` maps into `(y_centers, x_centers)` shift maps.
///
/// Where the total intensity is nonzero, the center is the weighted sum
/// divided by the total. Positions with zero total intensity take the
/// reference center, so after subtracting the reference they report a shift
/// of exactly zero and no NaN or infinity enters the maps.
pub fn center_shifts<T>(
    img_sum: &Array2<T>,
    img_y: &Array2<T>,
    img_x: &Array2<T>,
    ref_y: f64,
    ref_x: f64,
) -> ComResult<(Array2<T>, Array2<T>)>
where
    T: Copy + Zero + PartialEq + Div<Output = T> + Sub<Output = T> + From<f64>,
{
    if img_sum.shape() != img_y.shape() || img_sum.shape() != img_x.shape() {
        return Err(ComError::shape_mismatch(format!(
            "cannot compute shifts from maps of shape sum {:?}, y {:?}, x {:?}",
            img_sum.shape(),
            img_y.shape(),
            img_x.shape()
        )));
    }

    let ref_y = T::from(ref_y);
    let ref_x = T::from(ref_x);
    let guarded = |weighted: T, total: T, reference: T| {
        let center = if total != T::zero() {
            weighted / total
        } else {
            reference
        };
        center - reference
    };

    let y_centers = Zip::from(img_y)
        .and(img_sum)
        .map_collect(|&y, &total| guarded(y, total, ref_y));
    let x_centers = Zip::from(img_x)
        .and(img_sum)
        .map_collect(|&x, &total| guarded(x, total, ref_x));

    debug!(
        positions = img_sum.len(),
        zero_intensity = img_sum.iter().filter(|v| v.is_zero()).count(),
        "Computed center shifts"
    );

    Ok((y_centers, x_centers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;

    #[test]
    fn test_simple_division() {
        let sum = array![[2.0, 4.0]];
        let y = array![[2.0, 12.0]];
        let x = array![[6.0, 4.0]];
        let (yc, xc) = center_shifts(&sum, &y, &x, 1.0, 1.0).unwrap();
        assert_eq!(yc, array![[0.0, 2.0]]);
        assert_eq!(xc, array![[2.0, 0.0]]);
    }

    #[test]
    fn test_zero_sum_gives_exact_zero() {
        let sum = array![[0.0, 0.0]];
        let y = array![[5.0, -3.0]];
        let x = array![[7.0, 1e30]];
        let (yc, xc) = center_shifts(&sum, &y, &x, 12.5, 7.25).unwrap();
        assert!(yc.iter().all(|&v| v == 0.0));
        assert!(xc.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_complex_shift() {
        let sum = array![[Complex64::new(2.0, 0.0)]];
        let y = array![[Complex64::new(4.0, 2.0)]];
        let x = array![[Complex64::new(0.0, 4.0)]];
        let (yc, xc) = center_shifts(&sum, &y, &x, 1.0, 0.5).unwrap();
        assert_eq!(yc[[0, 0]], Complex64::new(1.0, 1.0));
        assert_eq!(xc[[0, 0]], Complex64::new(-0.5, 2.0));
    }

    #[test]
    fn test_complex_zero_sum() {
        let zero = Complex64::new(0.0, 0.0);
        let sum = array![[zero]];
        let y = array![[Complex64::new(3.0, 3.0)]];
        let (yc, xc) = center_shifts(&sum, &y, &y, 2.0, 2.0).unwrap();
        assert_eq!(yc[[0, 0]], zero);
        assert_eq!(xc[[0, 0]], zero);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = center_shifts(
            &Array2::<f64>::zeros((2, 2)),
            &Array2::zeros((2, 1)),
            &Array2::zeros((2, 2)),
            0.0,
            0.0,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "ShapeMismatchError");
    }
}
