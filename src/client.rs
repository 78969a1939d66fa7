// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for a JU-Control account.

use serde_json::json;

use crate::auth::{AuthSession, Credentials};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::protocol::{JSON_CONTENT_TYPE, Method, Transport};
#[cfg(feature = "http")]
use crate::protocol::HttpTransport;
use crate::telemetry::{self, DecodedMetrics};

/// Client for the JU-Control cloud API.
///
/// Combines the session, the transport and the telemetry decoder. Each
/// operation issues a single request; retries and polling are left to the
/// caller.
///
/// # Type Parameter
///
/// `T` is the transport; [`HttpTransport`](crate::protocol::HttpTransport)
/// for real use.
///
/// # Examples
///
/// ```no_run
/// use jucontrol_lib::JuControlClient;
///
/// # async fn example() -> jucontrol_lib::Result<()> {
/// let client = JuControlClient::new("user@example.com", "secret")?;
///
/// if client.login().await? {
///     let metrics = client.fetch_metrics().await?;
///     if let Some(liters) = metrics.total_water_consumed() {
///         println!("Total water: {liters} L");
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JuControlClient<T> {
    session: AuthSession<T>,
    flag_url: Option<String>,
}

#[cfg(feature = "http")]
impl JuControlClient<HttpTransport> {
    /// Creates a client for the vendor endpoint with default settings.
    ///
    /// The password is hashed immediately; the plaintext is not kept.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self> {
        Self::with_config(&ClientConfig::new(), username, password)
    }

    /// Creates a client with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL is invalid or the HTTP client
    /// cannot be created.
    pub fn with_config(
        config: &ClientConfig,
        username: impl Into<String>,
        password: &str,
    ) -> Result<Self> {
        let transport = config.build_transport()?;
        Ok(Self::with_transport(
            transport,
            config,
            Credentials::new(username, password),
        ))
    }
}

impl<T: Transport> JuControlClient<T> {
    /// Creates a client on top of an existing transport.
    ///
    /// The configuration is used as is; call [`ClientConfig::validate`]
    /// first if it comes from user input.
    #[must_use]
    pub fn with_transport(transport: T, config: &ClientConfig, credentials: Credentials) -> Self {
        Self {
            session: AuthSession::new(transport, config.endpoint(), credentials),
            flag_url: config.flag_url().map(ToOwned::to_owned),
        }
    }

    /// Returns the underlying session.
    #[must_use]
    pub fn session(&self) -> &AuthSession<T> {
        &self.session
    }

    /// Returns the user name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.session.credentials().username()
    }

    /// Returns true if a session token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Drops the session token.
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Logs in to the API.
    ///
    /// Returns `Ok(false)` if the API rejected the credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the request failed or the response was malformed.
    pub async fn login(&self) -> Result<bool> {
        self.session.login().await
    }

    /// Fetches and decodes the telemetry of all devices on the account.
    ///
    /// # Errors
    ///
    /// - `Error::NotLoggedIn` if [`login`](Self::login) has not succeeded
    /// - `Error::Protocol` if the request failed
    /// - `Error::Parse` if the response was not OK or had an unexpected shape;
    ///   [`Error::requires_login`] tells whether logging in again may help
    pub async fn fetch_metrics(&self) -> Result<DecodedMetrics> {
        let body = self.session.fetch(&[]).await?;
        let metrics = telemetry::decode_value(body)?;

        tracing::debug!(
            user = %self.username(),
            metrics = metrics.iter().count(),
            failures = metrics.diagnostics().failure_count(),
            "Fetched device metrics"
        );
        Ok(metrics)
    }

    /// Sets the remote flag to `value`.
    ///
    /// Sends `PATCH <flag url>` with the JSON body `{"title": value}`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidConfiguration` if no flag URL is configured; no
    ///   request is made
    /// - `Error::Protocol` if the request failed
    pub async fn set_flag(&self, value: &str) -> Result<()> {
        let url = self.flag_url.as_deref().ok_or_else(|| {
            Error::InvalidConfiguration("no flag URL configured".to_string())
        })?;

        let body = json!({ "title": value });
        self.session
            .transport()
            .request(
                Method::Patch,
                url,
                Some(&body),
                &[("Content-type", JSON_CONTENT_TYPE)],
            )
            .await?;

        tracing::debug!(value, "Remote flag set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{ParseError, ProtocolError};
    use crate::protocol::fake::FakeTransport;

    fn client(config: &ClientConfig) -> JuControlClient<FakeTransport> {
        JuControlClient::with_transport(
            FakeTransport::default(),
            config,
            Credentials::new("alice", "password"),
        )
    }

    fn transport(client: &JuControlClient<FakeTransport>) -> &FakeTransport {
        client.session().transport()
    }

    #[tokio::test]
    async fn fetch_metrics_end_to_end() {
        let client = client(&ClientConfig::new());
        transport(&client).push_json(json!({"status": "OK", "token": "abc"}));
        transport(&client).push_json(json!({
            "status": "ok",
            "data": [{
                "data": [{
                    "data": {
                        "8": {"st": "ok", "data": "01000000"},
                        "9": null,
                        "lu": {"st": "ok", "data": "0"}
                    }
                }]
            }]
        }));

        assert!(client.login().await.unwrap());
        let metrics = client.fetch_metrics().await.unwrap();

        assert_eq!(metrics.total_water_consumed(), Some(1));
        assert_eq!(metrics.total_soft_water_consumed(), None);

        let requests = transport(&client).requests();
        assert!(requests[1].1.starts_with("https://www.myjudo.eu/interface?token=abc&"));
    }

    #[tokio::test]
    async fn fetch_metrics_requires_login() {
        let client = client(&ClientConfig::new());

        let err = client.fetch_metrics().await.unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
        assert!(err.requires_login());
        assert!(transport(&client).requests().is_empty());
    }

    #[tokio::test]
    async fn expired_token_asks_for_login() {
        let client = client(&ClientConfig::new());
        transport(&client).push_json(json!({"status": "OK", "token": "old"}));
        transport(&client).push_json(json!({"status": "error"}));

        client.login().await.unwrap();
        let err = client.fetch_metrics().await.unwrap_err();

        assert!(matches!(err, Error::Parse(ParseError::StatusNotOk { .. })));
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn fetch_metrics_surfaces_transport_failure() {
        let client = client(&ClientConfig::new());
        transport(&client).push_json(json!({"status": "OK", "token": "abc"}));
        transport(&client).push(Err(ProtocolError::Network("connection refused".to_string())));

        client.login().await.unwrap();
        let err = client.fetch_metrics().await.unwrap_err();

        assert!(matches!(err, Error::Protocol(ProtocolError::Network(_))));
        assert!(!err.requires_login());
    }

    #[tokio::test]
    async fn set_flag_patches_configured_url() {
        let config = ClientConfig::new().with_flag_url("https://flags.example.com/1");
        let client = client(&config);
        transport(&client).push(Ok(None));

        client.set_flag("on").await.unwrap();

        let requests = transport(&client).requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, Method::Patch);
        assert_eq!(requests[0].1, "https://flags.example.com/1");
        assert_eq!(requests[0].2, Some(json!({"title": "on"})));
    }

    #[tokio::test]
    async fn set_flag_without_url_is_a_configuration_error() {
        let client = client(&ClientConfig::new());

        let err = client.set_flag("on").await.unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(transport(&client).requests().is_empty());
    }

    #[test]
    fn client_accessors() {
        let client = client(&ClientConfig::new());
        assert_eq!(client.username(), "alice");
        assert!(!client.is_logged_in());
        client.logout();
        assert!(!client.is_logged_in());
    }
}
