// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for unit tests.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ProtocolError;
use crate::protocol::{Method, Transport};

/// In-memory transport replaying queued responses.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<Result<Option<Value>, ProtocolError>>>,
    requests: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl FakeTransport {
    pub(crate) fn push(&self, response: Result<Option<Value>, ProtocolError>) {
        self.responses.lock().push_back(response);
    }

    pub(crate) fn push_json(&self, value: Value) {
        self.push(Ok(Some(value)));
    }

    pub(crate) fn requests(&self) -> Vec<(Method, String, Option<Value>)> {
        self.requests.lock().clone()
    }
}

impl Transport for FakeTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        _headers: &[(&str, &str)],
    ) -> Result<Option<Value>, ProtocolError> {
        self.requests
            .lock()
            .push((method, url.to_string(), body.cloned()));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ProtocolError::Unknown("no response queued".to_string())))
    }
}
