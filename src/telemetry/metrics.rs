// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded telemetry produced by a single fetch.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::{FieldId, Metric};
use crate::telemetry::envelope::DeviceRecord;

/// Metrics decoded from one telemetry response.
///
/// A metric is present only if its register was reported with an OK status
/// and had the layout its decode rule expects. Absence means the value is
/// currently unknown, never zero.
///
/// Serializes as a flat map keyed by [`Metric::key`], omitting absent metrics.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::telemetry::parse_device_data;
/// use jucontrol_lib::Metric;
///
/// let json = r#"{"status":"ok","data":[{"data":[{"data":{"8":{"st":"ok","data":"10000000"}}}]}]}"#;
/// let metrics = parse_device_data(json).unwrap();
///
/// assert_eq!(metrics.total_water_consumed(), Some(16));
/// assert_eq!(metrics.get(Metric::WaterHardness), None);
/// assert_eq!(serde_json::to_string(&metrics).unwrap(), r#"{"total_water_consumed":16}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedMetrics {
    #[serde(flatten)]
    values: BTreeMap<Metric, u32>,

    #[serde(skip)]
    raw_registers: BTreeMap<FieldId, String>,

    #[serde(skip)]
    devices: Vec<DeviceInfo>,

    #[serde(skip)]
    diagnostics: DecodeDiagnostics,
}

impl DecodedMetrics {
    pub(crate) fn new(
        values: BTreeMap<Metric, u32>,
        raw_registers: BTreeMap<FieldId, String>,
        devices: Vec<DeviceInfo>,
        diagnostics: DecodeDiagnostics,
    ) -> Self {
        Self {
            values,
            raw_registers,
            devices,
            diagnostics,
        }
    }

    /// Returns the value of a metric, if it was decoded.
    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<u32> {
        self.values.get(&metric).copied()
    }

    /// Iterates over the decoded metrics in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, u32)> + '_ {
        self.values.iter().map(|(metric, value)| (*metric, *value))
    }

    /// Returns true if no metric could be decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total water consumed, in liters.
    #[must_use]
    pub fn total_water_consumed(&self) -> Option<u32> {
        self.get(Metric::TotalWaterConsumed)
    }

    /// Total softened water consumed, in liters.
    #[must_use]
    pub fn total_soft_water_consumed(&self) -> Option<u32> {
        self.get(Metric::TotalSoftWaterConsumed)
    }

    /// Number of regeneration cycles.
    #[must_use]
    pub fn regeneration_count(&self) -> Option<u32> {
        self.get(Metric::RegenerationCount)
    }

    /// Water hardness register value.
    #[must_use]
    pub fn water_hardness(&self) -> Option<u32> {
        self.get(Metric::WaterHardness)
    }

    /// Registers reported OK that have no decode rule, keyed by id.
    ///
    /// Their meaning is not known; they are kept verbatim.
    #[must_use]
    pub fn raw_registers(&self) -> &BTreeMap<FieldId, String> {
        &self.raw_registers
    }

    /// Returns the raw payload of an undecoded register.
    #[must_use]
    pub fn raw_register(&self, id: FieldId) -> Option<&str> {
        self.raw_registers.get(&id).map(String::as_str)
    }

    /// Metadata of the devices in the response.
    #[must_use]
    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    /// What was skipped or failed while decoding.
    #[must_use]
    pub fn diagnostics(&self) -> &DecodeDiagnostics {
        &self.diagnostics
    }
}

/// Metadata of one appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Serial number.
    pub serial_number: Option<String>,
    /// Installation date as sent by the API.
    pub installation_date: Option<String>,
    /// Online status marker.
    pub online_status: Option<String>,
    /// Software version.
    pub software_version: Option<String>,
    /// Hardware version.
    pub hardware_version: Option<String>,
    /// Channels of the device.
    pub channels: Vec<ChannelInfo>,
}

impl From<&DeviceRecord> for DeviceInfo {
    fn from(record: &DeviceRecord) -> Self {
        let owned = |s: Option<&str>| s.map(ToOwned::to_owned);
        Self {
            serial_number: owned(record.serial_number()),
            installation_date: owned(record.installation_date()),
            online_status: owned(record.status()),
            software_version: owned(record.software_version()),
            hardware_version: owned(record.hardware_version()),
            channels: record
                .entries()
                .iter()
                .map(|entry| ChannelInfo {
                    address: owned(entry.address()),
                    device_type: owned(entry.device_type()),
                    software_version: owned(entry.software_version()),
                    hardware_version: owned(entry.hardware_version()),
                })
                .collect(),
        }
    }
}

/// Metadata of one device channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    /// Channel address.
    pub address: Option<String>,
    /// Channel device type.
    pub device_type: Option<String>,
    /// Channel software version.
    pub software_version: Option<String>,
    /// Channel hardware version.
    pub hardware_version: Option<String>,
}

/// Registers that did not contribute to the metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeDiagnostics {
    /// Registers ignored on purpose: heartbeat, null, non-OK status or no payload.
    pub skipped: usize,
    /// Registers that were malformed or failed their decode rule.
    pub failures: Vec<FieldFailure>,
}

impl DecodeDiagnostics {
    pub(crate) fn record(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(FieldFailure {
            field: field.into(),
            reason: reason.into(),
        });
    }

    /// Number of registers that failed to decode.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if no register failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A register that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    /// Register id as sent by the API.
    pub field: String,
    /// Why the register was rejected.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DecodedMetrics {
        let mut values = BTreeMap::new();
        values.insert(Metric::WaterHardness, 20);
        values.insert(Metric::TotalWaterConsumed, 1500);
        DecodedMetrics::new(values, BTreeMap::new(), Vec::new(), DecodeDiagnostics::default())
    }

    #[test]
    fn iter_follows_reporting_order() {
        let metrics = sample();
        let keys: Vec<_> = metrics.iter().map(|(m, _)| m).collect();
        assert_eq!(keys, vec![Metric::TotalWaterConsumed, Metric::WaterHardness]);
    }

    #[test]
    fn serializes_present_metrics_only() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total_water_consumed": 1500, "water_hardness": 20})
        );
    }

    #[test]
    fn empty_metrics() {
        let metrics = DecodedMetrics::default();
        assert!(metrics.is_empty());
        assert_eq!(metrics.total_soft_water_consumed(), None);
        assert!(metrics.diagnostics().is_clean());
    }

    #[test]
    fn diagnostics_record_failures() {
        let mut diagnostics = DecodeDiagnostics::default();
        diagnostics.record("8", "expected 8 characters, got 6");
        assert_eq!(diagnostics.failure_count(), 1);
        assert_eq!(diagnostics.failures[0].field, "8");
        assert!(!diagnostics.is_clean());
    }
}
