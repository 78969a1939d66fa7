// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walks a telemetry envelope and decodes the known registers.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codec::{FieldId, HEARTBEAT_FIELD, RegisterRule};
use crate::error::ParseError;
use crate::telemetry::envelope::{FieldValue, TelemetryEnvelope};
use crate::telemetry::metrics::{DecodeDiagnostics, DecodedMetrics, DeviceInfo};

/// Outcome of inspecting one register map entry.
enum Register {
    Usable(FieldId, String),
    Skipped,
}

/// Decides whether a register takes part in decoding.
///
/// The error string describes why a register was malformed.
fn inspect(key: &str, value: Option<&Value>) -> Result<Register, String> {
    if key == HEARTBEAT_FIELD {
        return Ok(Register::Skipped);
    }
    let Some(value) = value else {
        return Ok(Register::Skipped);
    };

    let field = FieldValue::from_json(value).map_err(|e| e.to_string())?;
    if !field.is_ok() {
        return Ok(Register::Skipped);
    }
    let Some(data) = field.data() else {
        return Ok(Register::Skipped);
    };

    let id = key.parse::<FieldId>().map_err(|e| e.to_string())?;
    Ok(Register::Usable(id, data.to_string()))
}

/// Decodes a validated telemetry envelope into metrics.
///
/// Registers are collected across every device and channel; when the same
/// id appears more than once the last occurrence wins. Each collected
/// register with a decode rule is then decoded. Malformed registers are
/// recorded in the diagnostics and never abort the decode.
///
/// # Errors
///
/// Returns `ParseError` if the envelope status is not OK or a required
/// structural key is missing. See [`TelemetryEnvelope::validate`].
pub fn decode(envelope: &TelemetryEnvelope) -> Result<DecodedMetrics, ParseError> {
    let devices = envelope.validate()?;

    let mut diagnostics = DecodeDiagnostics::default();
    let mut registers: BTreeMap<FieldId, String> = BTreeMap::new();

    for device in devices {
        for entry in device.entries() {
            for (key, value) in entry.fields() {
                match inspect(key, value) {
                    Ok(Register::Usable(id, data)) => {
                        registers.insert(id, data);
                    }
                    Ok(Register::Skipped) => diagnostics.skipped += 1,
                    Err(reason) => {
                        tracing::warn!(field = %key, %reason, "Malformed register");
                        diagnostics.record(key, reason);
                    }
                }
            }
        }
    }

    let mut values = BTreeMap::new();
    let mut raw_registers = BTreeMap::new();

    for (id, raw) in registers {
        let Some(rule) = RegisterRule::for_field(id) else {
            raw_registers.insert(id, raw);
            continue;
        };
        match rule.decode(&raw) {
            Ok(value) => {
                values.insert(rule.metric(), value);
            }
            Err(e) => {
                tracing::warn!(field = %id, metric = %rule.metric(), error = %e, "Register decode failed");
                diagnostics.record(id.to_string(), e.to_string());
            }
        }
    }

    tracing::debug!(
        decoded = values.len(),
        raw = raw_registers.len(),
        skipped = diagnostics.skipped,
        failed = diagnostics.failure_count(),
        "Decoded device data"
    );

    let devices = devices.iter().map(DeviceInfo::from).collect();
    Ok(DecodedMetrics::new(values, raw_registers, devices, diagnostics))
}

/// Decodes an already parsed JSON response.
///
/// # Errors
///
/// Returns `ParseError` if the value is not an envelope or fails validation.
pub fn decode_value(value: Value) -> Result<DecodedMetrics, ParseError> {
    decode(&TelemetryEnvelope::from_value(value)?)
}

/// Parses and decodes a raw `get device data` response body.
///
/// # Errors
///
/// Returns `ParseError` if the body is not JSON, is not an envelope, or
/// fails validation.
pub fn parse_device_data(payload: &str) -> Result<DecodedMetrics, ParseError> {
    let envelope: TelemetryEnvelope = serde_json::from_str(payload)?;
    decode(&envelope)
}
