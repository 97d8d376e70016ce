//! Error types for XZStore
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.
//!
//! The taxonomy mirrors the three network parties involved in a login:
//! transport failures ([`StoreError::Network`]), store-side error
//! responses ([`StoreError::StoreServer`]), and discharge-authority
//! failures ([`StoreError::Discharge`]). Local conditions (missing
//! credentials, keyring access) have their own variants so callers can
//! react without string matching.

use thiserror::Error;

/// Main error type for XZStore operations
///
/// This enum encompasses all possible errors that can occur during
/// credential negotiation, authorized requests, and credential storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Client construction or configuration errors (bad base URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (DNS, connection refused, timeout)
    ///
    /// Never retried by this crate; retry policy belongs to the caller.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the store
    ///
    /// Carries the status code and response body so the caller can decide
    /// whether a retry makes sense.
    #[error("Store server error: status={status}, body={body}")]
    StoreServer {
        /// HTTP status code returned by the store
        status: u16,
        /// Response body, drained for diagnostics
        body: String,
    },

    /// A third-party caveat could not be discharged
    ///
    /// The authority was unreachable, denied the request, or returned a
    /// proof that failed local validation. Login aborts; nothing is
    /// persisted.
    #[error("Discharge failed: {0}")]
    Discharge(String),

    /// A 2xx response did not match the protocol contract
    ///
    /// Missing `macaroon` field or a non-JSON body. Indicates a protocol
    /// or version mismatch rather than a transient condition, so it is
    /// never retried.
    #[error("Malformed store response: {0}")]
    MalformedResponse(String),

    /// No credential is stored for this application and store host
    #[error("Not logged in")]
    NotLoggedIn,

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for XZStore operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
