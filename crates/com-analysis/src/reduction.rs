//! Interpretation of the three maps produced by the mask reduction.

use crate::masks::MaskSpec;
use com_common::{ComError, ComResult, NavShape, ResolvedParameters, MASK_COUNT};
use ndarray::{Array2, ArrayViewD, Axis};
use num_complex::{Complex32, Complex64};
use tracing::debug;

/// The `[sum, y, x]` maps over the scan grid, tagged by element kind.
///
/// The kind is fixed when the maps are built and decides which result
/// branch the analysis takes.
#[derive(Debug, Clone, PartialEq)]
pub enum ReductionMaps {
    Real {
        sum: Array2<f64>,
        y: Array2<f64>,
        x: Array2<f64>,
    },
    Complex {
        sum: Array2<Complex64>,
        y: Array2<Complex64>,
        x: Array2<Complex64>,
    },
}

impl ReductionMaps {
    /// Real-valued maps; all three must share a shape.
    pub fn real(sum: Array2<f64>, y: Array2<f64>, x: Array2<f64>) -> ComResult<Self> {
        check_same_shape(sum.shape(), y.shape(), x.shape())?;
        Ok(Self::Real { sum, y, x })
    }

    /// Complex-valued maps; all three must share a shape.
    pub fn complex(
        sum: Array2<Complex64>,
        y: Array2<Complex64>,
        x: Array2<Complex64>,
    ) -> ComResult<Self> {
        check_same_shape(sum.shape(), y.shape(), x.shape())?;
        Ok(Self::Complex { sum, y, x })
    }

    /// Build maps from three flat job results, one value per scan position.
    pub fn from_job_results<T: ReductionElement>(
        results: [Vec<T>; MASK_COUNT],
        nav: NavShape,
    ) -> ComResult<Self> {
        let [sum, y, x] = results;
        T::into_maps(
            reshape_to_nav(sum, nav, "sum")?,
            reshape_to_nav(y, nav, "y")?,
            reshape_to_nav(x, nav, "x")?,
        )
    }

    /// Build maps from a stacked buffer whose last axis holds `[sum, y, x]`.
    pub fn from_stacked<T: ReductionElement>(
        data: ArrayViewD<'_, T>,
        nav: NavShape,
    ) -> ComResult<Self> {
        let last = match data.ndim() {
            0 => return Err(ComError::shape_mismatch("stacked buffer has no axes")),
            n => n - 1,
        };
        if data.len_of(Axis(last)) != MASK_COUNT {
            return Err(ComError::shape_mismatch(format!(
                "stacked buffer shape {:?} must end in an axis of length {}",
                data.shape(),
                MASK_COUNT
            )));
        }

        let plane = |i: usize, name: &str| {
            let values = data.index_axis(Axis(last), i).iter().copied().collect();
            reshape_to_nav(values, nav, name)
        };
        T::into_maps(plane(0, "sum")?, plane(1, "y")?, plane(2, "x")?)
    }

    /// Whether the maps hold complex values.
    pub fn is_complex(&self) -> bool {
        matches!(self, ReductionMaps::Complex { .. })
    }

    /// Shape of the scan grid as `(rows, cols)`.
    pub fn dim(&self) -> (usize, usize) {
        match self {
            ReductionMaps::Real { sum, .. } => sum.dim(),
            ReductionMaps::Complex { sum, .. } => sum.dim(),
        }
    }
}

/// Element types the reduction backend may deliver.
///
/// Single precision input is widened to double precision.
pub trait ReductionElement: Copy {
    fn into_maps(sum: Array2<Self>, y: Array2<Self>, x: Array2<Self>) -> ComResult<ReductionMaps>;
}

impl ReductionElement for f64 {
    fn into_maps(sum: Array2<f64>, y: Array2<f64>, x: Array2<f64>) -> ComResult<ReductionMaps> {
        ReductionMaps::real(sum, y, x)
    }
}

impl ReductionElement for f32 {
    fn into_maps(sum: Array2<f32>, y: Array2<f32>, x: Array2<f32>) -> ComResult<ReductionMaps> {
        ReductionMaps::real(sum.mapv(f64::from), y.mapv(f64::from), x.mapv(f64::from))
    }
}

impl ReductionElement for Complex64 {
    fn into_maps(
        sum: Array2<Complex64>,
        y: Array2<Complex64>,
        x: Array2<Complex64>,
    ) -> ComResult<ReductionMaps> {
        ReductionMaps::complex(sum, y, x)
    }
}

impl ReductionElement for Complex32 {
    fn into_maps(
        sum: Array2<Complex32>,
        y: Array2<Complex32>,
        x: Array2<Complex32>,
    ) -> ComResult<ReductionMaps> {
        let widen = |c: Complex32| Complex64::new(c.re as f64, c.im as f64);
        ReductionMaps::complex(sum.mapv(widen), y.mapv(widen), x.mapv(widen))
    }
}

/// Backend that applies the COM masks to every frame of a dataset.
///
/// Implementations return one value per scan position for each mask, in
/// mask order. How frames are distributed and how masks are applied is up
/// to the implementation; `params.use_sparse` is only a hint.
pub trait MaskReducer {
    fn reduce(
        &self,
        masks: &[MaskSpec; MASK_COUNT],
        params: &ResolvedParameters,
    ) -> ComResult<ReductionMaps>;
}

fn reshape_to_nav<T>(values: Vec<T>, nav: NavShape, name: &str) -> ComResult<Array2<T>> {
    let len = values.len();
    debug!(map = name, len, rows = nav.height, cols = nav.width, "Reshaping reduction map");
    Array2::from_shape_vec(nav.shape(), values).map_err(|_| {
        ComError::shape_mismatch(format!(
            "{} map with {} values cannot be reshaped to navigation shape {:?}",
            name,
            len,
            nav.shape()
        ))
    })
}

fn check_same_shape(sum: &[usize], y: &[usize], x: &[usize]) -> ComResult<()> {
    if sum != y || sum != x {
        return Err(ComError::shape_mismatch(format!(
            "reduction maps differ in shape: sum {:?}, y {:?}, x {:?}",
            sum, y, x
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_from_job_results_reshapes_row_major() {
        let maps = ReductionMaps::from_job_results(
            [vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], vec![0.0; 6], vec![0.0; 6]],
            NavShape::new(2, 3),
        )
        .unwrap();
        match maps {
            ReductionMaps::Real { sum, .. } => assert_eq!(sum, array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]),
            _ => panic!("expected real maps"),
        }
    }

    #[test]
    fn test_from_job_results_wrong_length() {
        let err = ReductionMaps::from_job_results(
            [vec![1.0f64; 5], vec![0.0; 6], vec![0.0; 6]],
            NavShape::new(2, 3),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "ShapeMismatchError");
        assert!(err.to_string().contains("sum map"));
    }

    #[test]
    fn test_f32_input_is_widened() {
        let maps = ReductionMaps::from_job_results(
            [vec![0.5f32], vec![0.25f32], vec![0.125f32]],
            NavShape::new(1, 1),
        )
        .unwrap();
        assert!(!maps.is_complex());
        assert_eq!(maps.dim(), (1, 1));
    }

    #[test]
    fn test_complex32_input_is_complex() {
        let c = Complex32::new(1.0, -2.0);
        let maps =
            ReductionMaps::from_job_results([vec![c], vec![c], vec![c]], NavShape::new(1, 1)).unwrap();
        match maps {
            ReductionMaps::Complex { sum, .. } => assert_eq!(sum[[0, 0]], Complex64::new(1.0, -2.0)),
            _ => panic!("expected complex maps"),
        }
    }

    #[test]
    fn test_from_stacked_splits_last_axis() {
        // 2x2 scan, last axis = [sum, y, x]
        let data = Array3::from_shape_fn((2, 2, 3), |(r, c, k)| (r * 100 + c * 10 + k) as f64);
        let maps = ReductionMaps::from_stacked(data.view().into_dyn(), NavShape::new(2, 2)).unwrap();
        match maps {
            ReductionMaps::Real { sum, y, x } => {
                assert_eq!(sum, array![[0.0, 10.0], [100.0, 110.0]]);
                assert_eq!(y, array![[1.0, 11.0], [101.0, 111.0]]);
                assert_eq!(x, array![[2.0, 12.0], [102.0, 112.0]]);
            }
            _ => panic!("expected real maps"),
        }
    }

    #[test]
    fn test_from_stacked_flat_scan() {
        // A 1D scan of 4 positions viewed as one row
        let data = Array2::from_shape_fn((4, 3), |(p, k)| (p * 3 + k) as f64);
        let maps = ReductionMaps::from_stacked(data.view().into_dyn(), NavShape::new(1, 4)).unwrap();
        assert_eq!(maps.dim(), (1, 4));
    }

    #[test]
    fn test_from_stacked_wrong_last_axis() {
        let data = Array3::<f64>::zeros((2, 2, 4));
        let err = ReductionMaps::from_stacked(data.view().into_dyn(), NavShape::new(2, 2)).unwrap_err();
        assert_eq!(err.kind(), "ShapeMismatchError");
    }

    #[test]
    fn test_real_rejects_mismatched_maps() {
        let err = ReductionMaps::real(
            Array2::zeros((2, 2)),
            Array2::zeros((2, 2)),
            Array2::zeros((2, 3)),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "ShapeMismatchError");
    }
}
