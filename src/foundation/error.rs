/// Convenience result type used across squareshot.
pub type SquareshotResult<T> = Result<T, SquareshotError>;

/// Top-level error taxonomy used by the compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum SquareshotError {
    /// Bad dimensions, parameters, or upload data supplied by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected allocation or processing failure while rendering.
    #[error("render failure: {0}")]
    Render(String),

    /// Errors when serializing or deserializing render parameters.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SquareshotError {
    /// Build a [`SquareshotError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`SquareshotError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SquareshotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for caller-side input errors that retrying cannot fix.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
