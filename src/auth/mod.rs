// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authentication against the JU-Control API.
//!
//! The API authenticates with the user name and the lowercase hex MD5 digest
//! of the password, and answers with a session token that must be passed on
//! every data query. [`AuthSession`] owns both and builds the requests.

mod session;

pub use session::AuthSession;

use std::fmt;

/// Returns the lowercase hex MD5 digest the API expects as password.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::auth::hash_password;
///
/// assert_eq!(hash_password("password"), "5f4dcc3b5aa765d61d8327deb882cf99");
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    format!("{:x}", md5::compute(password.as_bytes()))
}

/// Login credentials. Only the password digest is kept.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password_hash: String,
}

impl Credentials {
    /// Creates credentials, hashing the plaintext password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_password(password),
        }
    }

    /// Creates credentials from an existing MD5 hex digest.
    #[must_use]
    pub fn from_hash(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into().to_ascii_lowercase(),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password digest sent to the API.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
