// errors.rs
use thiserror::Error;

/// Error del dominio del marketplace de workflows
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DomainError {
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
