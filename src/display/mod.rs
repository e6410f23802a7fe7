//! Human-readable renderings of calibration results.
pub mod trace;

pub use trace::format_calibration_trace;
