// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport implementation using `reqwest`.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::protocol::{Method, Transport, redact_query};

/// HTTP transport for the JU-Control API.
///
/// Every request is bounded by the configured timeout, which covers the
/// connection, the request and reading the body.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use jucontrol_lib::protocol::{HttpTransport, Method, Transport};
///
/// # async fn example() -> Result<(), jucontrol_lib::ProtocolError> {
/// let transport = HttpTransport::new(Duration::from_secs(10))?;
/// let body = transport
///     .request(Method::Get, "https://www.myjudo.eu/interface?group=register", None, &[])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { client, timeout })
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Maps a `reqwest` failure onto the transport taxonomy.
    fn classify(&self, err: reqwest::Error) -> ProtocolError {
        // Error URLs would carry the token and password hash.
        let err = err.without_url();
        if err.is_timeout() {
            ProtocolError::Timeout(self.timeout_ms())
        } else if err.is_connect() || err.is_request() {
            ProtocolError::Network(describe(&err))
        } else if err.is_decode() || err.is_body() {
            ProtocolError::MalformedResponse(describe(&err))
        } else {
            ProtocolError::Unknown(describe(&err))
        }
    }
}

/// Renders an error followed by its source chain.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Option<Value>, ProtocolError> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(redact_query(url).to_string()));
        }

        let mut builder = match method {
            Method::Get => self.client.get(url),
            Method::Put => self.client.put(url),
            Method::Patch => self.client.patch(url),
            Method::Post => self.client.post(url),
        };

        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        if let Some(body) = body {
            let has_content_type = headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !has_content_type {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            let bytes =
                serde_json::to_vec(body).map_err(|e| ProtocolError::Unknown(e.to_string()))?;
            builder = builder.body(bytes);
        }

        tracing::debug!(method = %method, url = %redact_query(url), "Sending HTTP request");

        let response = builder.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        if !method.returns_body() {
            tracing::debug!(method = %method, status = status.as_u16(), "Request acknowledged");
            return Ok(None);
        }

        let text = response.text().await.map_err(|e| self.classify(e))?;

        tracing::debug!(bytes = text.len(), "Received HTTP response");

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ProtocolError::MalformedResponse(e.to_string()))
    }
}
