use thiserror::Error;

/// Errors surfaced by the encoder and the output formatters.
///
/// Internal consistency violations (codeword count mismatches, oversized
/// format words) are bugs, not inputs, and abort via `assert!` instead of
/// appearing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    /// A caller-supplied argument is outside its documented domain: a version
    /// or mask out of range, characters invalid for the declared mode, a
    /// negative border, or a malformed color string.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No version in the requested range can hold the data at the requested
    /// error correction level.
    #[error("data too long: {0}")]
    DataTooLong(String),

    /// A low-level primitive was driven outside its operating range.
    #[error("value out of range: {0}")]
    ValueOutOfRange(&'static str),
}
