//! Field and numeric constants shared across crates.

/// Side length of the square field in inches. Both axes span `[0, FIELD_SIZE]`.
pub const FIELD_SIZE: f64 = 144.0;

/// Default number of arc-length samples taken per travel segment.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Default number of parameter steps used to sample composite curves.
pub const DEFAULT_COMPOSITE_STEPS: usize = 100;

/// Guard used for divisions by time deltas, lengths, and rates.
pub const EPSILON: f64 = 1e-9;
