//! Error types for the apartments API client.
//!
//! # Design
//! The service reports failures as a non-2xx status with an optional JSON
//! `{"message": ...}` body. `Service` always carries a displayable message:
//! the service's own when it sent one, `GENERIC_FAILURE` otherwise.
//! `Transport` covers the case where no response came back at all.

use serde::Deserialize;
use thiserror::Error;

/// Message used when a failed response has no usable `message` field.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Errors returned by `ApartmentClient` and `Api`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No response was received.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Build a `Service` error from a failed response body.
    pub fn from_failure(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorPayload {
            message: Option<String>,
        }

        let message = serde_json::from_str::<ErrorPayload>(body)
            .ok()
            .and_then(|payload| payload.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        ApiError::Service { status, message }
    }

    /// HTTP status of a service-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}
