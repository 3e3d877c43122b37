use thiserror::Error;

/// Everything that can stop the scope from starting.
///
/// None of these ever reach the page: the entry point logs them and leaves
/// the canvas blank.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed waveform payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("channel length mismatch: v1 has {a} samples, v2 has {b}")]
    ChannelLengthMismatch { a: usize, b: usize },

    #[error("value range is empty or not finite: y_min={min}, y_max={max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("ms_per_pair must be positive and finite, got {0}")]
    InvalidPairInterval(f64),

    #[error("dataset request failed with HTTP status {0}")]
    Status(u16),

    #[error("browser call failed: {0}")]
    Js(String),

    #[error("element #{0} not found")]
    MissingElement(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
