//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a project, donation or user is not found.
//! - [`Closed`] thrown when a fully invested project is modified.
//! - [`AlreadyInvested`] thrown when a project that received money is removed.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Closed`]: EngineError::Closed
//!  [`AlreadyInvested`]: EngineError::AlreadyInvested
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Project \"{0}\" is closed and cannot be modified")]
    Closed(String),
    #[error("Project \"{0}\" already received donations and cannot be removed")]
    AlreadyInvested(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Closed(a), Self::Closed(b)) => a == b,
            (Self::AlreadyInvested(a), Self::AlreadyInvested(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
