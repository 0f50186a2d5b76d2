//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("please enter at least one number")]
    EmptyInput,

    #[error("no saved tree with id: {0}")]
    RecordNotFound(String),

    #[error("not a finite number: {0}")]
    InvalidValue(f64),
}
