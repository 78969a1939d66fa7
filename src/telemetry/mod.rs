// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device telemetry parsing for JU-Control responses.
//!
//! The `get device data` command answers with a nested structure:
//!
//! ```text
//! { status, data: [                     // devices
//!     { serialnumber, installation_date, status, sv, hv, data: [   // channels
//!         { da, dt, sv, hv, data: { "<id>": { st, data } | null, "lu": ... } }
//!     ] }
//! ] }
//! ```
//!
//! Only registers with an OK status marker are decoded. The `lu` heartbeat
//! entry is ignored, and registers that fail their decode rule are left out
//! of the result and recorded in [`DecodeDiagnostics`].
//!
//! # Examples
//!
//! ```
//! use jucontrol_lib::telemetry::parse_device_data;
//!
//! let payload = r#"{
//!     "status": "ok",
//!     "data": [{
//!         "serialnumber": "123456",
//!         "data": [{
//!             "da": "1",
//!             "data": {
//!                 "8": {"st": "ok", "data": "01000000"},
//!                 "9": null,
//!                 "lu": {"st": "ok", "data": "12"}
//!             }
//!         }]
//!     }]
//! }"#;
//!
//! let metrics = parse_device_data(payload).unwrap();
//! assert_eq!(metrics.total_water_consumed(), Some(1));
//! assert_eq!(metrics.total_soft_water_consumed(), None);
//! ```

mod envelope;
mod metrics;
mod parser;

pub use envelope::{DeviceRecord, FieldValue, RegisterEntry, TelemetryEnvelope};
pub(crate) use envelope::is_ok_status;
pub use metrics::{ChannelInfo, DecodeDiagnostics, DecodedMetrics, DeviceInfo, FieldFailure};
pub use parser::{decode, decode_value, parse_device_data};
