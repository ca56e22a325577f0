// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("Invalid delivery state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unparseable timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
