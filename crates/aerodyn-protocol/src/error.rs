use thiserror::Error;

/// Errors produced while validating wire payloads.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a numeric series")]
    InvalidSeries { field: String },

    #[error("series `{field}` has {len} samples, expected {expected}")]
    LengthMismatch {
        field: String,
        len: usize,
        expected: usize,
    },

    #[error("parameter `{0}` is not a finite number")]
    NonFinite(&'static str),
}
