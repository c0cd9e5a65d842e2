use super::{EvaluationError, StructuralError, ValidationError};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}
