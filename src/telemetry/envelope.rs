// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire types for the `get device data` response.
//!
//! The structs mirror the JSON nesting: envelope, devices, channels, and
//! a per-channel map of register id to register value. Metadata fields are
//! optional and accept either strings or numbers; structural keys are
//! checked by [`TelemetryEnvelope::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ParseError;

/// Returns true if an API status marker means success.
///
/// The marker must be exactly `ok` in any letter case.
pub(crate) fn is_ok_status(status: &str) -> bool {
    status.eq_ignore_ascii_case("ok")
}

/// Accepts a string, number or boolean and keeps its textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Top-level response of the `get device data` command.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::telemetry::TelemetryEnvelope;
///
/// let json = r#"{"status":"ok","data":[{"serialnumber":"1234","data":[{"da":"1","data":{}}]}]}"#;
/// let envelope: TelemetryEnvelope = serde_json::from_str(json).unwrap();
///
/// assert!(envelope.is_ok());
/// assert_eq!(envelope.validate().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryEnvelope {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,

    #[serde(default)]
    data: Option<Vec<DeviceRecord>>,
}

impl TelemetryEnvelope {
    /// Converts an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the value does not have the envelope shape.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        serde_json::from_value(value).map_err(ParseError::from)
    }

    /// Returns the raw status marker.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns true if the status marker is OK (case-insensitive).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.as_deref().is_some_and(is_ok_status)
    }

    /// Checks the status marker and every required structural key.
    ///
    /// Returns the device records once the whole tree is known to have
    /// the expected shape.
    ///
    /// # Errors
    ///
    /// - `ParseError::MissingField` naming the JSON path of the first
    ///   missing key (`status`, `data`, `data[i].data`, `data[i].data[j].data`)
    /// - `ParseError::StatusNotOk` if the envelope status is not OK
    pub fn validate(&self) -> Result<&[DeviceRecord], ParseError> {
        let status = self
            .status
            .as_deref()
            .ok_or_else(|| ParseError::MissingField("status".to_string()))?;

        if !is_ok_status(status) {
            return Err(ParseError::StatusNotOk {
                status: status.to_string(),
            });
        }

        let devices = self
            .data
            .as_deref()
            .ok_or_else(|| ParseError::MissingField("data".to_string()))?;

        for (i, device) in devices.iter().enumerate() {
            let entries = device
                .entries
                .as_deref()
                .ok_or_else(|| ParseError::MissingField(format!("data[{i}].data")))?;

            if let Some(j) = entries.iter().position(|entry| entry.fields.is_none()) {
                return Err(ParseError::MissingField(format!("data[{i}].data[{j}].data")));
            }
        }

        Ok(devices)
    }
}

/// One physical appliance registered to the account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "serialnumber", default, deserialize_with = "lenient_string")]
    serial_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    installation_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,

    #[serde(rename = "sv", default, deserialize_with = "lenient_string")]
    software_version: Option<String>,

    #[serde(rename = "hv", default, deserialize_with = "lenient_string")]
    hardware_version: Option<String>,

    #[serde(rename = "data", default)]
    entries: Option<Vec<RegisterEntry>>,
}

impl DeviceRecord {
    /// Returns the serial number.
    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    /// Returns the installation date as sent by the API.
    #[must_use]
    pub fn installation_date(&self) -> Option<&str> {
        self.installation_date.as_deref()
    }

    /// Returns the online status marker.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the software version.
    #[must_use]
    pub fn software_version(&self) -> Option<&str> {
        self.software_version.as_deref()
    }

    /// Returns the hardware version.
    #[must_use]
    pub fn hardware_version(&self) -> Option<&str> {
        self.hardware_version.as_deref()
    }

    /// Returns the channels of this device (empty if the key is missing).
    #[must_use]
    pub fn entries(&self) -> &[RegisterEntry] {
        self.entries.as_deref().unwrap_or_default()
    }
}

/// One logical channel of a device with its register map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterEntry {
    #[serde(rename = "da", default, deserialize_with = "lenient_string")]
    address: Option<String>,

    #[serde(rename = "dt", default, deserialize_with = "lenient_string")]
    device_type: Option<String>,

    #[serde(rename = "sv", default, deserialize_with = "lenient_string")]
    software_version: Option<String>,

    #[serde(rename = "hv", default, deserialize_with = "lenient_string")]
    hardware_version: Option<String>,

    #[serde(rename = "data", default)]
    fields: Option<BTreeMap<String, Option<Value>>>,
}

impl RegisterEntry {
    /// Returns the channel address.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns the channel device type.
    #[must_use]
    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }

    /// Returns the channel software version.
    #[must_use]
    pub fn software_version(&self) -> Option<&str> {
        self.software_version.as_deref()
    }

    /// Returns the channel hardware version.
    #[must_use]
    pub fn hardware_version(&self) -> Option<&str> {
        self.hardware_version.as_deref()
    }

    /// Iterates over the raw register map in id order.
    ///
    /// A `None` value is a register the API reported as `null`.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .flatten()
            .map(|(id, value)| (id.as_str(), value.as_ref()))
    }
}

/// A single register value: a status marker and its hex payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    status: String,
    data: Option<String>,
}

impl FieldValue {
    /// Interprets one entry of a register map.
    ///
    /// # Errors
    ///
    /// - `ParseError::UnexpectedFormat` if the value is not a JSON object
    /// - `ParseError::MissingField` if the `st` marker is missing
    /// - `ParseError::InvalidValue` if `data` is neither a string nor null
    pub fn from_json(value: &Value) -> Result<Self, ParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::UnexpectedFormat(format!("register value {value}")))?;

        let status = object
            .get("st")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("st".to_string()))?
            .to_string();

        let data = match object.get("data") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                return Err(ParseError::InvalidValue {
                    field: "data".to_string(),
                    message: format!("expected hex string, got {other}"),
                });
            }
        };

        Ok(Self { status, data })
    }

    /// Returns the status marker.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns true if the status marker is OK (case-insensitive).
    #[must_use]
    pub fn is_ok(&self) -> bool {
        is_ok_status(&self.status)
    }

    /// Returns the hex payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> TelemetryEnvelope {
        TelemetryEnvelope::from_value(value).unwrap()
    }

    #[test]
    fn status_is_case_insensitive() {
        assert!(is_ok_status("OK"));
        assert!(is_ok_status("ok"));
        assert!(is_ok_status("Ok"));
        assert!(!is_ok_status("ko"));
        assert!(!is_ok_status("FAIL"));
        assert!(!is_ok_status(" ok "));
        assert!(!is_ok_status(""));
    }

    #[test]
    fn padded_status_is_not_ok() {
        let env = envelope(json!({"status": " ok ", "data": []}));
        assert!(!env.is_ok());
        assert!(matches!(env.validate(), Err(ParseError::StatusNotOk { .. })));
    }

    #[test]
    fn device_metadata_accepts_numbers() {
        let env = envelope(json!({
            "status": "ok",
            "data": [{
                "serialnumber": 123_456,
                "installation_date": "2021-03-01",
                "status": "online",
                "sv": 2.1,
                "hv": "1",
                "data": [{"da": 1, "dt": "0x33", "data": {}}]
            }]
        }));

        let devices = env.validate().unwrap();
        let device = &devices[0];
        assert_eq!(device.serial_number(), Some("123456"));
        assert_eq!(device.installation_date(), Some("2021-03-01"));
        assert_eq!(device.software_version(), Some("2.1"));
        assert_eq!(device.entries()[0].address(), Some("1"));
        assert_eq!(device.entries()[0].device_type(), Some("0x33"));
    }

    #[test]
    fn validate_reports_missing_status() {
        let env = envelope(json!({"data": []}));
        let err = env.validate().unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "status"));
    }

    #[test]
    fn validate_rejects_non_ok_status() {
        let env = envelope(json!({"status": "error"}));
        assert!(matches!(
            env.validate(),
            Err(ParseError::StatusNotOk { ref status }) if status == "error"
        ));
    }

    #[test]
    fn validate_reports_nested_missing_keys() {
        let env = envelope(json!({"status": "OK"}));
        assert!(matches!(env.validate(), Err(ParseError::MissingField(ref f)) if f == "data"));

        let env = envelope(json!({"status": "OK", "data": [{"serialnumber": "1"}]}));
        assert!(
            matches!(env.validate(), Err(ParseError::MissingField(ref f)) if f == "data[0].data")
        );

        let env = envelope(json!({
            "status": "OK",
            "data": [{"data": [{"da": "1", "data": {}}, {"da": "2"}]}]
        }));
        assert!(matches!(
            env.validate(),
            Err(ParseError::MissingField(ref f)) if f == "data[0].data[1].data"
        ));
    }

    #[test]
    fn register_map_keeps_nulls() {
        let env = envelope(json!({
            "status": "OK",
            "data": [{"data": [{"data": {"8": {"st": "OK", "data": "01000000"}, "9": null}}]}]
        }));
        let devices = env.validate().unwrap();
        let fields: Vec<_> = devices[0].entries()[0].fields().collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "8");
        assert!(fields[0].1.is_some());
        assert_eq!(fields[1], ("9", None));
    }

    #[test]
    fn field_value_from_json() {
        let value = FieldValue::from_json(&json!({"st": "ok", "data": "0100"})).unwrap();
        assert!(value.is_ok());
        assert_eq!(value.data(), Some("0100"));

        let value = FieldValue::from_json(&json!({"st": "KO", "data": null})).unwrap();
        assert!(!value.is_ok());
        assert_eq!(value.data(), None);
    }

    #[test]
    fn field_value_rejects_malformed() {
        assert!(matches!(
            FieldValue::from_json(&json!("0100")),
            Err(ParseError::UnexpectedFormat(_))
        ));
        assert!(matches!(
            FieldValue::from_json(&json!({"data": "0100"})),
            Err(ParseError::MissingField(_))
        ));
        assert!(matches!(
            FieldValue::from_json(&json!({"st": "OK", "data": 100})),
            Err(ParseError::InvalidValue { .. })
        ));
    }
}
