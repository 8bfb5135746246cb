//! The module contains the error the engine can throw.
//!
//! Every variant belongs to one [`ErrorKind`]:
//!
//! - [`Validation`], [`InvalidAmount`], [`ExistingKey`] and
//!   [`ExceedsOutstanding`] are validation failures (bad input, duplicate
//!   unique key, overpayment).
//! - [`KeyNotFound`] is thrown when a referenced row is absent.
//! - [`Consistency`] is thrown when an operation would break an invariant of
//!   already persisted state (e.g. editing a cancelled invoice).
//! - [`Database`] wraps storage failures.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`ExceedsOutstanding`]: EngineError::ExceedsOutstanding
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Consistency`]: EngineError::Consistency
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification surfaced to callers together with the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Consistency,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Consistency => "consistency_error",
            Self::Internal => "internal_error",
        }
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Payment exceeds outstanding balance: {0}")]
    ExceedsOutstanding(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Inconsistent state: {0}")]
    Consistency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::InvalidAmount(_)
            | Self::ExistingKey(_)
            | Self::ExceedsOutstanding(_) => ErrorKind::Validation,
            Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::Consistency(_) => ErrorKind::Consistency,
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::ExceedsOutstanding(a), Self::ExceedsOutstanding(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Consistency(a), Self::Consistency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
