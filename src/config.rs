// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client configuration.

use std::time::Duration;

use crate::error::ProtocolError;
#[cfg(feature = "http")]
use crate::protocol::HttpTransport;

/// Connection settings for a [`JuControlClient`](crate::JuControlClient).
///
/// # Examples
///
/// ```
/// use jucontrol_lib::ClientConfig;
/// use std::time::Duration;
///
/// // Defaults: vendor endpoint, 10 second timeout
/// let config = ClientConfig::new();
/// assert_eq!(config.endpoint(), "https://www.myjudo.eu/interface");
///
/// // With all options
/// let config = ClientConfig::new()
///     .with_endpoint("https://staging.example.com/interface")
///     .with_timeout(Duration::from_secs(5))
///     .with_flag_url("https://flags.example.com/devices/1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    endpoint: String,
    timeout: Duration,
    flag_url: Option<String>,
}

impl ClientConfig {
    /// Vendor API endpoint used for login and data queries.
    pub const DEFAULT_ENDPOINT: &'static str = "https://www.myjudo.eu/interface";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration pointing at the vendor endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            flag_url: None,
        }
    }

    /// Sets the API endpoint (scheme, host and path, no query).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the URL targeted by `set_flag`.
    ///
    /// There is no default: the remote flag is not part of the vendor
    /// protocol and must be configured explicitly.
    #[must_use]
    pub fn with_flag_url(mut self, url: impl Into<String>) -> Self {
        self.flag_url = Some(url.into());
        self
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the flag URL if set.
    #[must_use]
    pub fn flag_url(&self) -> Option<&str> {
        self.flag_url.as_deref()
    }

    /// Checks that the configured URLs are absolute HTTP(S) URLs.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` naming the offending URL.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        fn has_scheme(url: &str) -> bool {
            url.starts_with("http://") || url.starts_with("https://")
        }

        // The endpoint query is built per request.
        if !has_scheme(&self.endpoint) || self.endpoint.contains('?') {
            return Err(ProtocolError::InvalidAddress(self.endpoint.clone()));
        }
        if let Some(url) = self.flag_url.as_deref().filter(|url| !has_scheme(url)) {
            return Err(ProtocolError::InvalidAddress(url.to_string()));
        }
        Ok(())
    }

    /// Creates an `HttpTransport` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a URL is invalid or the HTTP client cannot be created.
    #[cfg(feature = "http")]
    pub fn build_transport(&self) -> Result<HttpTransport, ProtocolError> {
        self.validate()?;
        HttpTransport::new(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint(), "https://www.myjudo.eu/interface");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.flag_url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = ClientConfig::new()
            .with_endpoint("http://127.0.0.1:8080/interface")
            .with_timeout(Duration::from_millis(250))
            .with_flag_url("http://127.0.0.1:8080/flag");

        assert_eq!(config.endpoint(), "http://127.0.0.1:8080/interface");
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.flag_url(), Some("http://127.0.0.1:8080/flag"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_missing_scheme() {
        let config = ClientConfig::new().with_endpoint("www.myjudo.eu/interface");
        assert!(matches!(
            config.validate(),
            Err(ProtocolError::InvalidAddress(ref url)) if url == "www.myjudo.eu/interface"
        ));
    }

    #[test]
    fn config_rejects_query_in_endpoint() {
        let config = ClientConfig::new().with_endpoint("https://host/interface?token=x");
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_rejects_bad_flag_url() {
        let config = ClientConfig::new().with_flag_url("ftp://host/flag");
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "http")]
    #[test]
    fn config_build_transport() {
        let config = ClientConfig::new().with_timeout(Duration::from_secs(3));
        let transport = config.build_transport().unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(3));
    }
}
