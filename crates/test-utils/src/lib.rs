//! Shared test utilities for the com-field workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float comparison macros
//! - Synthetic detector frames and a reference dense mask reducer
//! - Common test fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for elementwise approximate equality of two 2D arrays.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_array_approx_eq;
///
/// assert_array_approx_eq!(computed, expected, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_array_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = &$left;
        let right = &$right;
        assert_eq!(left.shape(), right.shape(), "array shapes differ");
        for ((idx, l), r) in left.indexed_iter().zip(right.iter()) {
            let diff = (*l as f64 - *r as f64).abs();
            if !(diff <= $epsilon as f64) {
                panic!(
                    "arrays differ at {:?}: left `{:?}`, right `{:?}` (epsilon {:?})",
                    idx, l, r, $epsilon
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_rejects_nan() {
        assert_approx_eq!(f64::NAN, 1.0, 0.001);
    }

    #[test]
    fn test_assert_array_approx_eq_passes() {
        assert_array_approx_eq!(array![[1.0, 2.0]], array![[1.0, 2.000001]], 1e-3);
    }

    #[test]
    #[should_panic(expected = "arrays differ at (0, 1)")]
    fn test_assert_array_approx_eq_reports_index() {
        assert_array_approx_eq!(array![[1.0, 2.0]], array![[1.0, 3.0]], 1e-3);
    }
}
