// src/backend/error.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Human-readable problems in the order they were found. Display shows the first one.
    #[error("{}", .0.first().map(String::as_str).unwrap_or("validation failed"))]
    Validation(Vec<String>),

    #[error("Entry already exists: {0}")]
    DuplicateEntry(String),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Deliberately the same text for unknown users and wrong passwords.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("The account of the current session cannot be deleted")]
    SelfDeletionForbidden,

    #[error("No active session")]
    NotAuthenticated,

    #[error("Backup rejected: {0}")]
    CorruptBackup(String),

    #[error("Storage error: {0}")]
    StorageFailure(String),
}

impl RegistryError {
    /// Builds a single-problem validation error.
    pub fn invalid(problem: impl Into<String>) -> Self {
        RegistryError::Validation(vec![problem.into()])
    }

    /// The list of problems carried by a validation error, empty for other kinds.
    pub fn problems(&self) -> &[String] {
        match self {
            RegistryError::Validation(problems) => problems,
            _ => &[],
        }
    }
}

impl From<validator::ValidationErrors> for RegistryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut problems: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        // field_errors() iterates a HashMap
        problems.sort();
        RegistryError::Validation(problems)
    }
}
