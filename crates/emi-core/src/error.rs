use thiserror::Error;

/// The single rejection line shown to end users when validation fails,
/// regardless of which field was at fault.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid, positive numbers for all fields.";

#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EmiError {
    /// Collapse validation failures into the canonical user-facing message.
    /// Field-level detail stays available via `Display` for diagnostics.
    pub fn user_message(&self) -> String {
        match self {
            EmiError::InvalidInput { .. } => INVALID_INPUT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for EmiError {
    fn from(e: serde_json::Error) -> Self {
        EmiError::SerializationError(e.to_string())
    }
}
