use thiserror::Error;

use crate::contract::model::UserId;

/// Errors surfaced to consumers of the users API, whichever transport is used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersAdminError {
    /// Transport failure, no response received.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-2xx response that is not a per-id 404.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("User not found: {id}")]
    NotFound { id: UserId },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl UsersAdminError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(id: UserId) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
