// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `JuControl` Lib - A Rust client for JUDO water treatment appliances.
//!
//! This library talks to the JU-Control cloud API (`myjudo.eu`): it logs in,
//! fetches the telemetry of the devices registered to the account and decodes
//! the vendor's packed hex registers into physical values.
//!
//! # Supported Metrics
//!
//! - **Total water consumed** (register 8, liters)
//! - **Total soft water consumed** (register 9, liters)
//! - **Water hardness** (register 90)
//! - **Regeneration count** (register 791)
//!
//! Other registers reported with an OK status are kept as raw hex strings.
//!
//! # Quick Start
//!
//! ```no_run
//! use jucontrol_lib::JuControlClient;
//!
//! #[tokio::main]
//! async fn main() -> jucontrol_lib::Result<()> {
//!     let client = JuControlClient::new("user@example.com", "secret")?;
//!
//!     if !client.login().await? {
//!         eprintln!("credentials rejected");
//!         return Ok(());
//!     }
//!
//!     let metrics = client.fetch_metrics().await?;
//!     for (metric, value) in metrics.iter() {
//!         println!("{metric}: {value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Decoding Without Network Access
//!
//! ```
//! use jucontrol_lib::codec::byte_swap_reverse;
//!
//! // Registers are transmitted little-endian
//! assert_eq!(byte_swap_reverse("12345678").unwrap(), 0x7856_3412);
//! ```
//!
//! # Sessions
//!
//! Tokens are not refreshed automatically. When a fetch fails with an error
//! for which [`Error::requires_login`] is true, call `login()` again.

pub mod auth;
mod client;
pub mod codec;
mod config;
pub mod error;
pub mod protocol;
pub mod telemetry;

pub use auth::{AuthSession, Credentials};
pub use client::JuControlClient;
pub use codec::{FieldId, Metric, RegisterRule};
pub use config::ClientConfig;
pub use error::{CodecError, Error, ParseError, ProtocolError, Result};
#[cfg(feature = "http")]
pub use protocol::HttpTransport;
pub use protocol::{Method, Transport};
pub use telemetry::{DecodeDiagnostics, DecodedMetrics, DeviceInfo};
