//! Kernel-wide numeric tolerances

/// Minimum distance below which two points are considered coincident
pub const CONFUSION: f64 = 1e-7;

/// Minimum angle in radians below which two directions are considered parallel
pub const ANGULAR: f64 = 1e-9;

/// Default relative tolerance for arc-length integration
pub const LENGTH_TOLERANCE: f64 = 1e-6;

/// Default chord count when a curved primitive is discretized for
/// closest-point queries
pub const DISCRETIZATION_CHORDS: usize = 256;
