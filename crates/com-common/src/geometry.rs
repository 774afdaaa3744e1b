//! Detector and scan geometry.

use crate::{ComError, ComResult};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a single detector frame (signal space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorGeometry {
    /// Number of detector rows
    pub height: usize,
    /// Number of detector columns
    pub width: usize,
}

impl DetectorGeometry {
    /// Create a new detector geometry.
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Build a geometry from a signal shape, rejecting anything that is not 2D.
    pub fn from_sig_shape(sig: &[usize]) -> ComResult<Self> {
        match sig {
            [height, width] => Ok(Self::new(*height, *width)),
            _ => Err(ComError::UnsupportedGeometry { dims: sig.len() }),
        }
    }

    /// Shape as an `(rows, cols)` pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Total number of detector pixels.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    /// Check if the detector has no pixels.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

/// Scan grid over which frames are acquired (navigation space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavShape {
    pub height: usize,
    pub width: usize,
}

impl NavShape {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Build a navigation shape from a dataset's nav dimensions.
    ///
    /// Result maps are 2D images, so a 1D scan is read as a single row.
    pub fn from_nav_dims(nav: &[usize]) -> ComResult<Self> {
        match nav {
            [width] => Ok(Self::new(1, *width)),
            [height, width] => Ok(Self::new(*height, *width)),
            _ => Err(ComError::shape_mismatch(format!(
                "navigation shape {:?} cannot be viewed as a 2D scan",
                nav
            ))),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of scan positions.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full dataset shape, split into navigation and signal parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetShape {
    pub nav: Vec<usize>,
    pub sig: Vec<usize>,
}

impl DatasetShape {
    pub fn new(nav: impl Into<Vec<usize>>, sig: impl Into<Vec<usize>>) -> Self {
        Self {
            nav: nav.into(),
            sig: sig.into(),
        }
    }

    /// Detector geometry; fails for anything but a 2D signal.
    pub fn detector(&self) -> ComResult<DetectorGeometry> {
        DetectorGeometry::from_sig_shape(&self.sig)
    }

    /// Navigation shape as a 2D scan grid.
    pub fn nav_shape(&self) -> ComResult<NavShape> {
        NavShape::from_nav_dims(&self.nav)
    }
}
