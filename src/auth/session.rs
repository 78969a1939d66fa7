// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session token management.

use parking_lot::RwLock;
use serde_json::Value;

use crate::auth::Credentials;
use crate::error::{Error, ParseError};
use crate::protocol::{Method, Transport, build_url};
use crate::telemetry::is_ok_status;

const GROUP: &str = "register";
const LOGIN_COMMAND: &str = "login";
const FETCH_COMMAND: &str = "get device data";
const ROLE: &str = "customer";

/// Keys [`AuthSession::fetch`] sets itself.
const RESERVED_KEYS: [&str; 3] = ["token", "group", "command"];

/// An authenticated session with the JU-Control API.
///
/// Starts logged out. [`login`](Self::login) stores the token returned by the
/// API; [`fetch`](Self::fetch) attaches it to data queries. Tokens are never
/// refreshed automatically: when the API stops accepting one, call `login`
/// again.
///
/// The token is kept behind a lock so the session can be shared, but the
/// API expects one request in flight per session.
pub struct AuthSession<T> {
    transport: T,
    endpoint: String,
    credentials: Credentials,
    token: RwLock<Option<String>>,
}

impl<T: Transport> AuthSession<T> {
    /// Creates a logged-out session.
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport used for every request
    /// * `endpoint` - API endpoint without query string
    /// * `credentials` - User name and password digest
    #[must_use]
    pub fn new(transport: T, endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            credentials,
            token: RwLock::new(None),
        }
    }

    /// Returns the credentials of this session.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns true if a token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.token.read().is_some()
    }

    /// Drops the stored token. The API has no logout call.
    pub fn logout(&self) {
        *self.token.write() = None;
    }

    /// Logs in and stores the returned token.
    ///
    /// Any previously stored token is dropped first, so after a failed
    /// login the session is logged out.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` if the API rejected
    /// the credentials.
    ///
    /// # Errors
    ///
    /// - `Error::Protocol` if the request failed
    /// - `Error::Parse` if the response lacks `status`, or lacks `token`
    ///   despite an OK status
    pub async fn login(&self) -> Result<bool, Error> {
        self.logout();

        let query = [
            ("group", GROUP),
            ("command", LOGIN_COMMAND),
            ("name", LOGIN_COMMAND),
            ("user", self.credentials.username()),
            ("password", self.credentials.password_hash()),
            ("role", ROLE),
        ];
        let url = build_url(&self.endpoint, &query);

        let response = self
            .transport
            .request(Method::Get, &url, None, &[])
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Login request failed"))?
            .ok_or_else(|| ParseError::UnexpectedFormat("empty login response".to_string()))?;

        let status = response
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("status".to_string()))?;

        if !is_ok_status(status) {
            tracing::warn!(user = %self.credentials.username(), status, "Login rejected");
            return Ok(false);
        }

        let token = response
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("token".to_string()))?;

        *self.token.write() = Some(token.to_string());
        tracing::info!(user = %self.credentials.username(), "Logged in");
        Ok(true)
    }

    /// Issues a `get device data` query with the session token.
    ///
    /// `params` are appended to the query; `token`, `group` and `command`
    /// are always set by the session and are dropped from `params`.
    ///
    /// # Errors
    ///
    /// - `Error::NotLoggedIn` if no token is stored; no request is made
    /// - `Error::Protocol` if the request failed
    /// - `Error::Parse` if the response has no body
    pub async fn fetch(&self, params: &[(&str, &str)]) -> Result<Value, Error> {
        let token = self.token.read().clone().ok_or(Error::NotLoggedIn)?;

        let mut query = vec![
            ("token", token.as_str()),
            ("group", GROUP),
            ("command", FETCH_COMMAND),
        ];
        query.extend(
            params
                .iter()
                .filter(|(key, _)| !RESERVED_KEYS.contains(key))
                .copied(),
        );
        let url = build_url(&self.endpoint, &query);

        let response = self.transport.request(Method::Get, &url, None, &[]).await?;
        response.ok_or_else(|| ParseError::UnexpectedFormat("empty response body".to_string()).into())
    }
}

impl<T> std::fmt::Debug for AuthSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("endpoint", &self.endpoint)
            .field("credentials", &self.credentials)
            .field("logged_in", &self.token.read().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::fake::FakeTransport;

    fn session() -> AuthSession<FakeTransport> {
        AuthSession::new(
            FakeTransport::default(),
            "https://host/interface",
            Credentials::new("alice", "password"),
        )
    }

    #[tokio::test]
    async fn login_success_stores_token() {
        let session = session();
        session
            .transport()
            .push_json(json!({"status": "OK", "token": "abc"}));

        assert!(session.login().await.unwrap());
        assert!(session.is_logged_in());

        let requests = session.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, Method::Get);
        assert_eq!(
            requests[0].1,
            "https://host/interface?group=register&command=login&name=login&user=alice\
             &password=5f4dcc3b5aa765d61d8327deb882cf99&role=customer"
        );
    }

    #[tokio::test]
    async fn login_status_is_case_insensitive() {
        let session = session();
        session
            .transport()
            .push_json(json!({"status": "ok", "token": "abc"}));

        assert!(session.login().await.unwrap());
    }

    #[tokio::test]
    async fn login_rejected_leaves_token_unset() {
        let session = session();
        session.transport().push_json(json!({"status": "FAIL"}));

        assert!(!session.login().await.unwrap());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn login_transport_failure_is_an_error() {
        let session = session();
        session.transport().push(Err(ProtocolError::Timeout(10_000)));

        let err = session.login().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::Timeout(10_000))));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn login_ok_without_token_is_a_parse_error() {
        let session = session();
        session.transport().push_json(json!({"status": "OK"}));

        let err = session.login().await.unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingField(ref f)) if f == "token"));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn failed_relogin_logs_out() {
        let session = session();
        session
            .transport()
            .push_json(json!({"status": "OK", "token": "abc"}));
        session.transport().push_json(json!({"status": "FAIL"}));

        assert!(session.login().await.unwrap());
        assert!(!session.login().await.unwrap());
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn fetch_before_login_makes_no_request() {
        let session = session();

        let err = session.fetch(&[]).await.unwrap_err();
        assert!(matches!(err, Error::NotLoggedIn));
        assert!(session.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn fetch_attaches_token() {
        let session = session();
        session
            .transport()
            .push_json(json!({"status": "OK", "token": "abc"}));
        session
            .transport()
            .push_json(json!({"status": "OK", "data": []}));

        session.login().await.unwrap();
        let body = session
            .fetch(&[("serial", "42"), ("token", "forged")])
            .await
            .unwrap();

        assert_eq!(body["status"], "OK");
        let requests = session.transport().requests();
        assert_eq!(
            requests[1].1,
            "https://host/interface?token=abc&group=register&command=get%20device%20data&serial=42"
        );
    }

    #[tokio::test]
    async fn logout_drops_token() {
        let session = session();
        session
            .transport()
            .push_json(json!({"status": "OK", "token": "abc"}));
        session.login().await.unwrap();

        session.logout();
        assert!(!session.is_logged_in());
        assert!(matches!(session.fetch(&[]).await, Err(Error::NotLoggedIn)));
    }

    #[test]
    fn debug_hides_token_and_hash() {
        let rendered = format!("{:?}", session());
        assert!(rendered.contains("logged_in: false"));
        assert!(!rendered.contains("5f4dcc3b"));
    }
}
