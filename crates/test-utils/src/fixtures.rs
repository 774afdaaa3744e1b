//! Common test fixtures for center-of-mass analysis tests.

/// Detector geometries used across the test suite.
pub mod detector {
    /// Small 4x4 detector with a fractional center
    pub const SMALL: (usize, usize) = (4, 4);

    /// Typical 256x256 pixelated detector
    pub const MEDIPIX: (usize, usize) = (256, 256);

    /// Non-square detector
    pub const WIDE: (usize, usize) = (16, 32);
}

/// Hand-computed reduction maps for a 2x2 scan.
///
/// Positions: `(0,0)` empty frame, `(0,1)` spot at pixel `(1, 2)`,
/// `(1,0)` spot at pixel `(3, 0)`, `(1,1)` two unit pixels at `(0,0)` and `(2,2)`.
pub mod maps_2x2 {
    pub const SUM: [[f64; 2]; 2] = [[0.0, 1.0], [1.0, 2.0]];
    pub const Y: [[f64; 2]; 2] = [[0.0, 1.0], [3.0, 2.0]];
    pub const X: [[f64; 2]; 2] = [[0.0, 2.0], [0.0, 2.0]];
}
