// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with short user-facing messages.

/// Error returned by every client operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response was received from the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// Authorization failed even after the refresh path; stored tokens were cleared.
    #[error("Session expired")]
    SessionExpired,

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Client storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not logged in")]
    NotAuthenticated,
}

impl ClientError {
    pub const SESSION_EXPIRED_MESSAGE: &'static str = "Session expired. Please log in again.";
    pub const NETWORK_MESSAGE: &'static str = "Could not reach the server. Please try again.";

    /// Short message suitable for showing to the user.
    ///
    /// Never includes transport details; backend `detail` strings are passed
    /// through since the backend writes them for end users.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => Self::NETWORK_MESSAGE.to_string(),
            ClientError::SessionExpired => Self::SESSION_EXPIRED_MESSAGE.to_string(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::StorageUnavailable(_) => "Local storage is unavailable.".to_string(),
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::NotAuthenticated => "Please log in first.".to_string(),
        }
    }

    /// Check if this error means the session is gone and the user must log in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// HTTP status reported by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<crate::storage::StorageError> for ClientError {
    fn from(err: crate::storage::StorageError) -> Self {
        ClientError::StorageUnavailable(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

