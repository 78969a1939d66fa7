// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for the JU-Control HTTP API.
//!
//! The [`Transport`] trait is the seam between the session logic and the
//! network: one request, one attempt, a typed failure on error. The
//! [`HttpTransport`] implementation (feature `http`) uses `reqwest`.

#[cfg(test)]
pub(crate) mod fake;
#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

use std::fmt;

use serde_json::Value;

use crate::error::ProtocolError;

/// Content type sent with JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP methods used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Query; the response body is parsed as JSON.
    Get,
    /// Fire-and-forget update.
    Put,
    /// Fire-and-forget partial update.
    Patch,
    /// Fire-and-forget submission.
    Post,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Post => "POST",
        }
    }

    /// Returns true if the response body of this method is parsed.
    #[must_use]
    pub const fn returns_body(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for transports that can issue requests to the API.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issues a single request.
    ///
    /// For [`Method::Get`] the parsed JSON body is returned; other methods
    /// return `None` once the server acknowledged the request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `url` - Absolute URL including the query string
    /// * `body` - Optional JSON body
    /// * `headers` - Extra request headers
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` classifying the failure. No retries are made.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Option<Value>, ProtocolError>;
}

/// Appends percent-encoded query parameters to a base URL.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::protocol::build_url;
///
/// let url = build_url(
///     "https://www.myjudo.eu/interface",
///     &[("group", "register"), ("command", "get device data")],
/// );
/// assert_eq!(
///     url,
///     "https://www.myjudo.eu/interface?group=register&command=get%20device%20data"
/// );
/// ```
#[must_use]
pub fn build_url(base: &str, query: &[(&str, &str)]) -> String {
    let mut url = base.to_string();
    let mut separator = if base.contains('?') { '&' } else { '?' };
    for (key, value) in query {
        url.push(separator);
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
        separator = '&';
    }
    url
}

/// Returns the URL without its query string, for logging.
///
/// Queries carry the session token and password hash.
pub(crate) fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
