// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `JuControl` library.
//!
//! The hierarchy mirrors the layers of the client: transport failures
//! ([`ProtocolError`]), payload shape problems ([`ParseError`]) and
//! per-register decode failures ([`CodecError`]). Register decode failures
//! never abort a fetch; they are collected in the decode diagnostics instead.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while interpreting an API response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A request needing a session token was attempted before a successful login.
    #[error("not logged in")]
    NotLoggedIn,

    /// The client configuration cannot serve the requested operation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Returns true if calling `login()` again may resolve this error.
    ///
    /// This covers a missing token and a fetch answered with a non-OK
    /// status, which is how the vendor reports an expired session.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn | Self::Parse(ParseError::StatusNotOk { .. })
        )
    }
}

/// Errors related to HTTP communication with the API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The HTTP client could not be constructed.
    #[cfg(feature = "http")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connection, DNS or other transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be interpreted as JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} - {reason}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Any failure that fits none of the other categories.
    #[error("unknown transport failure: {0}")]
    Unknown(String),
}

/// Errors related to the shape of API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required key is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// The response envelope carries a status other than OK.
    #[error("API reported status {status:?}")]
    StatusNotOk {
        /// The status string as sent by the server.
        status: String,
    },

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors raised while decoding a single hex register value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The raw string does not have the length the register layout requires.
    #[error("expected {expected} characters, got {actual}")]
    InvalidLength {
        /// Required length in characters.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },

    /// The string contains characters that are not hex digits.
    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),

    /// A structured register does not contain exactly one `:` separator.
    #[error("expected exactly one ':' separator, found {0}")]
    MissingSeparator(usize),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
