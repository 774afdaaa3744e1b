//! The COM analysis: parameters, masks and result packaging.

use crate::config::AnalysisConfig;
use crate::field::{curl_2d, divergence, magnitude};
use crate::masks::{com_masks_factory, MaskSpec};
use crate::reduction::{MaskReducer, ReductionElement, ReductionMaps};
use crate::result::{AnalysisResult, AnalysisResultSet, RawData};
use crate::shifts::center_shifts;
use com_common::{
    resolve_parameters, ComError, ComParameters, ComResult, DatasetShape, DetectorGeometry,
    NavShape, ResolvedParameters, MASK_COUNT,
};
use ndarray::{Array2, ArrayViewD, CowArray, Ix2};
use renderer::{visualize_simple, RgbImage};
use tracing::{debug, info};

/// Shift field of real-valued input together with its derived maps.
#[derive(Debug, Clone, PartialEq)]
pub struct RealFieldResult {
    pub x_centers: Array2<f64>,
    pub y_centers: Array2<f64>,
    pub magnitude: Array2<f64>,
    pub divergence: Array2<f64>,
    pub curl: Array2<f64>,
}

/// Shift field of complex-valued input, split into parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexFieldResult {
    pub x_real: Array2<f64>,
    pub y_real: Array2<f64>,
    pub x_imag: Array2<f64>,
    pub y_imag: Array2<f64>,
}

/// Outcome of the analysis, one variant per element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ComFieldResult {
    Real(RealFieldResult),
    Complex(ComplexFieldResult),
}

impl ComFieldResult {
    /// Compute shifts relative to `(ref_y, ref_x)` and everything derived
    /// from them.
    ///
    /// Complex maps only get their shifts split into real and imaginary
    /// parts; magnitude, divergence and curl exist for real fields only.
    pub fn from_maps(maps: &ReductionMaps, ref_y: f64, ref_x: f64) -> ComResult<Self> {
        match maps {
            ReductionMaps::Real { sum, y, x } => {
                let (y_centers, x_centers) = center_shifts(sum, y, x, ref_y, ref_x)?;
                let magnitude = magnitude(&y_centers, &x_centers)?;
                let divergence = divergence(&y_centers, &x_centers)?;
                let curl = curl_2d(&y_centers, &x_centers)?;
                Ok(ComFieldResult::Real(RealFieldResult {
                    x_centers,
                    y_centers,
                    magnitude,
                    divergence,
                    curl,
                }))
            }
            ReductionMaps::Complex { sum, y, x } => {
                let (y_centers, x_centers) = center_shifts(sum, y, x, ref_y, ref_x)?;
                Ok(ComFieldResult::Complex(ComplexFieldResult {
                    x_real: x_centers.mapv(|c| c.re),
                    y_real: y_centers.mapv(|c| c.re),
                    x_imag: x_centers.mapv(|c| c.im),
                    y_imag: y_centers.mapv(|c| c.im),
                }))
            }
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, ComFieldResult::Complex(_))
    }

    /// Package into displayable results.
    ///
    /// Real fields yield `field, magnitude, divergence, curl, x, y`, complex
    /// fields yield `x_real, y_real, x_imag, y_imag`, always in that order.
    /// Only `field` is left out of downloads.
    pub fn result_set(&self, config: &AnalysisConfig) -> ComResult<AnalysisResultSet> {
        let results = match self {
            ComFieldResult::Real(real) => {
                let (rows, cols) = real.x_centers.dim();
                let y = real.y_centers.as_standard_layout();
                let x = real.x_centers.as_standard_layout();
                let field = config.wheel.rgb_from_vector(
                    contiguous(&y)?,
                    contiguous(&x)?,
                    cols,
                    rows,
                    None,
                )?;

                vec![
                    AnalysisResult::new(
                        RawData::Pair(real.x_centers.clone(), real.y_centers.clone()),
                        field,
                        "field",
                        "field",
                        "cubehelix colorwheel visualization",
                    )
                    .excluded_from_download(),
                    scalar(&real.magnitude, config, "magnitude", "magnitude", "magnitude of the vector field")?,
                    scalar(&real.divergence, config, "divergence", "divergence", "divergence of the vector field")?,
                    scalar(&real.curl, config, "curl", "curl", "curl of the 2D vector field")?,
                    scalar(&real.x_centers, config, "x", "x", "x component of the center")?,
                    scalar(&real.y_centers, config, "y", "y", "y component of the center")?,
                ]
            }
            ComFieldResult::Complex(complex) => vec![
                scalar(&complex.x_real, config, "x_real", "x [real]", "x component of the center")?,
                scalar(&complex.y_real, config, "y_real", "y [real]", "y component of the center")?,
                scalar(&complex.x_imag, config, "x_imag", "x [imag]", "x component of the center")?,
                scalar(&complex.y_imag, config, "y_imag", "y [imag]", "y component of the center")?,
            ],
        };

        AnalysisResultSet::new(results)
    }
}

fn scalar(
    map: &Array2<f64>,
    config: &AnalysisConfig,
    key: &str,
    title: &str,
    description: &str,
) -> ComResult<AnalysisResult> {
    Ok(AnalysisResult::new(
        RawData::Single(map.clone()),
        visualize(map, config)?,
        key,
        title,
        description,
    ))
}

fn visualize(map: &Array2<f64>, config: &AnalysisConfig) -> ComResult<RgbImage> {
    let (rows, cols) = map.dim();
    let map = map.as_standard_layout();
    visualize_simple(contiguous(&map)?, cols, rows, config.colormap, config.logarithmic)
}

fn contiguous<'a>(map: &'a CowArray<'_, f64, Ix2>) -> ComResult<&'a [f64]> {
    map.as_slice()
        .ok_or_else(|| ComError::Render("map is not contiguous in memory".to_string()))
}

/// Center-of-mass analysis of one dataset.
///
/// Construction validates the dataset shape and resolves the parameters;
/// afterwards the analysis only interprets reduction output and holds no
/// mutable state.
#[derive(Debug, Clone)]
pub struct ComAnalysis {
    shape: DatasetShape,
    geometry: DetectorGeometry,
    nav: NavShape,
    params: ResolvedParameters,
    config: AnalysisConfig,
}

impl ComAnalysis {
    /// Fails with `UnsupportedGeometry` unless the signal is 2D, before the
    /// navigation shape or any parameter is looked at.
    pub fn new(shape: DatasetShape, user: &ComParameters) -> ComResult<Self> {
        let geometry = shape.detector()?;
        let nav = shape.nav_shape()?;
        let params = resolve_parameters(user, &geometry)?;

        info!(
            nav_rows = nav.height,
            nav_cols = nav.width,
            sig_height = geometry.height,
            sig_width = geometry.width,
            cx = params.cx,
            cy = params.cy,
            r = params.r,
            "Created COM analysis"
        );

        Ok(Self {
            shape,
            geometry,
            nav,
            params,
            config: AnalysisConfig::default(),
        })
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn shape(&self) -> &DatasetShape {
        &self.shape
    }

    pub fn geometry(&self) -> DetectorGeometry {
        self.geometry
    }

    pub fn nav_shape(&self) -> NavShape {
        self.nav
    }

    /// Parameters handed to the reduction backend.
    pub fn parameters(&self) -> &ResolvedParameters {
        &self.params
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The `[sum, gradient_y, gradient_x]` mask specs for this dataset.
    pub fn mask_factories(&self) -> ComResult<[MaskSpec; MASK_COUNT]> {
        com_masks_factory(&self.shape.sig, self.params.cx, self.params.cy, self.params.r)
    }

    /// Shift field and derived maps, relative to the ROI center.
    pub fn compute(&self, maps: &ReductionMaps) -> ComResult<ComFieldResult> {
        if maps.dim() != self.nav.shape() {
            return Err(ComError::shape_mismatch(format!(
                "reduction maps of shape {:?} do not match navigation shape {:?}",
                maps.dim(),
                self.nav.shape()
            )));
        }

        debug!(complex = maps.is_complex(), "Computing COM field");
        ComFieldResult::from_maps(maps, self.params.cy, self.params.cx)
    }

    /// Compute and package the results for already shaped maps.
    pub fn results(&self, maps: &ReductionMaps) -> ComResult<AnalysisResultSet> {
        let field = self.compute(maps)?;
        let results = field.result_set(&self.config)?;
        info!(
            complex = field.is_complex(),
            results = results.len(),
            "Packaged COM results"
        );
        Ok(results)
    }

    /// Results from three flat job results, one value per scan position.
    pub fn results_from_job<T: ReductionElement>(
        &self,
        job_results: [Vec<T>; MASK_COUNT],
    ) -> ComResult<AnalysisResultSet> {
        let maps = ReductionMaps::from_job_results(job_results, self.nav)?;
        self.results(&maps)
    }

    /// Results from a stacked buffer whose last axis holds `[sum, y, x]`.
    pub fn results_from_stacked<T: ReductionElement>(
        &self,
        data: ArrayViewD<'_, T>,
    ) -> ComResult<AnalysisResultSet> {
        let maps = ReductionMaps::from_stacked(data, self.nav)?;
        self.results(&maps)
    }

    /// Run the masks through `reducer` and package the outcome.
    pub fn run<R: MaskReducer>(&self, reducer: &R) -> ComResult<(ComFieldResult, AnalysisResultSet)> {
        let masks = self.mask_factories()?;
        let maps = reducer.reduce(&masks, &self.params)?;
        let field = self.compute(&maps)?;
        let results = field.result_set(&self.config)?;
        Ok((field, results))
    }
}
