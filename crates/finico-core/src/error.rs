use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinicoError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Goal unreachable: success probability {target_probability} not reached \
         (best {best_probability:.4}) with contributions up to {max_contribution}"
    )]
    GoalUnreachableWithinBounds {
        target_probability: f64,
        best_probability: f64,
        max_contribution: f64,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinicoError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FinicoError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FinicoError {
    fn from(e: serde_json::Error) -> Self {
        FinicoError::SerializationError(e.to_string())
    }
}
