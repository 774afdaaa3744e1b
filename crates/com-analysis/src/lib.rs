//! Center-of-mass (COM) analysis of 4D scanning electron microscopy data.
//!
//! Three masks are applied to every detector frame by an external reduction
//! backend: a disk-shaped ROI and the ROI weighted by the y and x pixel
//! coordinates. This crate builds those masks and turns the resulting three
//! maps over the scan grid into a shift vector field with derived quantities.
//!
//! # Architecture
//!
//! ```text
//! DatasetShape + ComParameters
//!      │
//!      ▼
//! ComAnalysis::new ──► resolve_parameters ──► com_masks_factory
//!      │                                            │
//!      │                                  MaskReducer (external)
//!      │                                            │
//!      ▼                                            ▼
//! ReductionMaps::{Real, Complex} ◄──────── [sum, y, x] maps
//!      │
//!      ├─► center_shifts
//!      │
//!      ├─► Real:    magnitude / divergence / curl_2d
//!      └─► Complex: real / imaginary split
//!               │
//!               ▼
//!          AnalysisResultSet
//! ```
//!
//! # Example
//!
//! ```ignore
//! use com_analysis::{ComAnalysis, ReductionMaps};
//! use com_common::{ComParameters, DatasetShape};
//!
//! let analysis = ComAnalysis::new(DatasetShape::new([32, 32], [256, 256]), &ComParameters::default())?;
//! let masks = analysis.mask_factories();
//! // ... run the masks over the dataset ...
//! let results = analysis.results_from_job([sum, y, x])?;
//! let curl = results.get("curl");
//! ```

pub mod analysis;
pub mod config;
pub mod field;
pub mod masks;
pub mod reduction;
pub mod result;
pub mod shifts;

// Re-export commonly used types at crate root
pub use analysis::{ComAnalysis, ComFieldResult, ComplexFieldResult, RealFieldResult};
pub use config::AnalysisConfig;
pub use field::{curl_2d, divergence, gradient, magnitude, EdgeOrder};
pub use masks::{com_masks_factory, MaskKind, MaskSpec};
pub use reduction::{MaskReducer, ReductionElement, ReductionMaps};
pub use result::{AnalysisResult, AnalysisResultSet, RawData};
pub use shifts::center_shifts;
