use thiserror::Error;

/// Request validation errors, surfaced at the boundary as a
/// `{success: false, message}` payload, never as a panic or transport fault.
/// Provider and store failures travel as `anyhow` chains and are flattened
/// into their operation-specific boundary messages instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed path, invalid year, unsupported window size.
    /// Reported synchronously; the operation is not attempted.
    #[error("Invalid input: {0}")]
    Input(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
