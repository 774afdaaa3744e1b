//! JSON input: dataset shape, parameters and the three reduction maps.

use anyhow::{Context, Result};
use com_analysis::{AnalysisResultSet, ComAnalysis};
use com_common::{ComParameters, DatasetShape};
use num_complex::Complex64;
use serde::Deserialize;
use std::path::Path;

/// Contents of an input file.
///
/// ```json
/// {
///   "nav_shape": [2, 2],
///   "sig_shape": [256, 256],
///   "parameters": {"cx": 128.0, "cy": 128.0, "r": 40.0},
///   "maps": {"dtype": "real", "sum": [...], "y": [...], "x": [...]}
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisInput {
    pub nav_shape: Vec<usize>,
    pub sig_shape: Vec<usize>,
    #[serde(default)]
    pub parameters: ComParameters,
    pub maps: InputMaps,
}

/// Flat, row-major reduction maps. Complex values are `[re, im]` pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dtype", rename_all = "lowercase")]
pub enum InputMaps {
    Real {
        sum: Vec<f64>,
        y: Vec<f64>,
        x: Vec<f64>,
    },
    Complex {
        sum: Vec<[f64; 2]>,
        y: Vec<[f64; 2]>,
        x: Vec<[f64; 2]>,
    },
}

impl InputMaps {
    pub fn dtype(&self) -> &'static str {
        match self {
            InputMaps::Real { .. } => "real",
            InputMaps::Complex { .. } => "complex",
        }
    }
}

impl AnalysisInput {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse input file {}", path.display()))
    }

    /// Input parameters with any set fields of `overrides` taking precedence.
    pub fn parameters_with(&self, overrides: &ComParameters) -> ComParameters {
        ComParameters {
            cx: overrides.cx.or(self.parameters.cx),
            cy: overrides.cy.or(self.parameters.cy),
            r: overrides.r.or(self.parameters.r),
            use_sparse: overrides.use_sparse.or(self.parameters.use_sparse),
        }
    }

    pub fn dataset_shape(&self) -> DatasetShape {
        DatasetShape::new(self.nav_shape.clone(), self.sig_shape.clone())
    }

    /// Interpret the maps with `analysis`.
    pub fn analyze(self, analysis: &ComAnalysis) -> Result<AnalysisResultSet> {
        let results = match self.maps {
            InputMaps::Real { sum, y, x } => analysis.results_from_job([sum, y, x]),
            InputMaps::Complex { sum, y, x } => {
                let widen = |values: Vec<[f64; 2]>| {
                    values
                        .into_iter()
                        .map(|[re, im]| Complex64::new(re, im))
                        .collect::<Vec<_>>()
                };
                analysis.results_from_job([widen(sum), widen(y), widen(x)])
            }
        };
        Ok(results?)
    }
}
