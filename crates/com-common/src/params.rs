//! Analysis parameters and their resolution against the detector geometry.

use crate::{ComError, ComResult, DetectorGeometry};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of masks applied per frame: sum, y-gradient, x-gradient.
pub const MASK_COUNT: usize = 3;

/// Element type the reduction interface must use for the mask stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskDtype {
    Float32,
}

/// User-supplied parameters. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComParameters {
    /// ROI center column in detector pixels (default: width / 2)
    pub cx: Option<f64>,
    /// ROI center row in detector pixels (default: height / 2)
    pub cy: Option<f64>,
    /// ROI radius in detector pixels (default: unlimited)
    pub r: Option<f64>,
    /// Hint for the reduction backend to use a sparse mask stack
    pub use_sparse: Option<bool>,
}

impl ComParameters {
    pub fn with_center(self, cx: f64, cy: f64) -> Self {
        Self {
            cx: Some(cx),
            cy: Some(cy),
            ..self
        }
    }

    pub fn with_radius(self, r: f64) -> Self {
        Self { r: Some(r), ..self }
    }

    pub fn with_sparse(self, use_sparse: bool) -> Self {
        Self {
            use_sparse: Some(use_sparse),
            ..self
        }
    }
}

/// Fully resolved parameters handed to the mask factory and reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParameters {
    pub cx: f64,
    pub cy: f64,
    /// `f64::INFINITY` means no radius limit; serialized as `null`.
    #[serde(with = "radius")]
    pub r: f64,
    pub use_sparse: bool,
    pub mask_count: usize,
    pub mask_dtype: MaskDtype,
}

/// Resolve user parameters against the detector geometry.
///
/// Defaults: `cx = width / 2`, `cy = height / 2`, `r = +inf`, `use_sparse = false`.
pub fn resolve_parameters(
    user: &ComParameters,
    geometry: &DetectorGeometry,
) -> ComResult<ResolvedParameters> {
    let cx = user.cx.unwrap_or(geometry.width as f64 / 2.0);
    let cy = user.cy.unwrap_or(geometry.height as f64 / 2.0);
    let r = user.r.unwrap_or(f64::INFINITY);
    let use_sparse = user.use_sparse.unwrap_or(false);

    if !cx.is_finite() {
        return Err(ComError::invalid_parameter("cx", format!("must be finite, got {}", cx)));
    }
    if !cy.is_finite() {
        return Err(ComError::invalid_parameter("cy", format!("must be finite, got {}", cy)));
    }
    if r.is_nan() || r < 0.0 {
        return Err(ComError::invalid_parameter(
            "r",
            format!("must be a non-negative radius, got {}", r),
        ));
    }

    debug!(cx, cy, r, use_sparse, "Resolved COM parameters");

    Ok(ResolvedParameters {
        cx,
        cy,
        r,
        use_sparse,
        mask_count: MASK_COUNT,
        mask_dtype: MaskDtype::Float32,
    })
}

mod radius {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(r: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if r.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(r)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let geometry = DetectorGeometry::new(64, 128);
        let params = resolve_parameters(&ComParameters::default(), &geometry).unwrap();
        assert_eq!(params.cx, 64.0);
        assert_eq!(params.cy, 32.0);
        assert!(params.r.is_infinite() && params.r > 0.0);
        assert!(!params.use_sparse);
        assert_eq!(params.mask_count, 3);
        assert_eq!(params.mask_dtype, MaskDtype::Float32);
    }

    #[test]
    fn test_odd_detector_center_is_fractional() {
        let geometry = DetectorGeometry::new(5, 7);
        let params = resolve_parameters(&ComParameters::default(), &geometry).unwrap();
        assert_eq!(params.cx, 3.5);
        assert_eq!(params.cy, 2.5);
    }

    #[test]
    fn test_user_values_win() {
        let geometry = DetectorGeometry::new(64, 64);
        let user = ComParameters::default()
            .with_center(10.5, 20.25)
            .with_radius(8.0)
            .with_sparse(true);
        let params = resolve_parameters(&user, &geometry).unwrap();
        assert_eq!((params.cx, params.cy, params.r), (10.5, 20.25, 8.0));
        assert!(params.use_sparse);
    }

    #[test]
    fn test_rejects_nan_radius() {
        let user = ComParameters::default().with_radius(f64::NAN);
        let err = resolve_parameters(&user, &DetectorGeometry::new(8, 8)).unwrap_err();
        assert!(matches!(err, ComError::InvalidParameter { ref param, .. } if param == "r"));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let user = ComParameters::default().with_radius(-1.0);
        assert!(resolve_parameters(&user, &DetectorGeometry::new(8, 8)).is_err());
    }

    #[test]
    fn test_rejects_infinite_center() {
        let user = ComParameters::default().with_center(f64::INFINITY, 1.0);
        let err = resolve_parameters(&user, &DetectorGeometry::new(8, 8)).unwrap_err();
        assert!(matches!(err, ComError::InvalidParameter { ref param, .. } if param == "cx"));
    }

    #[test]
    fn test_infinite_radius_serializes_as_null() {
        let params = resolve_parameters(&ComParameters::default(), &DetectorGeometry::new(4, 4))
            .unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert!(json["r"].is_null());
        assert_eq!(json["mask_dtype"], "float32");

        let back: ResolvedParameters = serde_json::from_value(json).unwrap();
        assert!(back.r.is_infinite());
    }

    #[test]
    fn test_parameters_from_partial_json() {
        let user: ComParameters = serde_json::from_str(r#"{"cx": 1.5, "r": 2.0}"#).unwrap();
        assert_eq!(user.cx, Some(1.5));
        assert_eq!(user.cy, None);
        assert_eq!(user.r, Some(2.0));
    }
}
