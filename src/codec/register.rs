// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register identifiers and the decode rule table.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::codec::hex::{
    REGENERATION_HEX_LEN, U16_HEX_LEN, U32_HEX_LEN, byte_swap_reverse, regeneration_count,
    swap_u16,
};
use crate::error::{CodecError, ParseError};

/// Field id used by the API as a liveness marker. Never a measurement.
pub const HEARTBEAT_FIELD: &str = "lu";

/// Numeric identifier of a register within a device channel.
///
/// The API sends ids as decimal strings (`"8"`, `"791"`); they are compared
/// by numeric value, so `"08"` and `"8"` address the same register.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::codec::FieldId;
///
/// let id: FieldId = "791".parse().unwrap();
/// assert_eq!(id, FieldId::new(791));
/// assert!("lu".parse::<FieldId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldId(u32);

impl FieldId {
    /// Creates a field id from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for FieldId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| ParseError::InvalidValue {
                field: format!("field id {s:?}"),
                message: e.to_string(),
            })
    }
}

/// A decoded physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total water that passed the appliance, in liters.
    TotalWaterConsumed,
    /// Total softened water, in liters.
    TotalSoftWaterConsumed,
    /// Number of regeneration cycles run so far.
    RegenerationCount,
    /// Water hardness as reported by the appliance (raw register value).
    WaterHardness,
}

impl Metric {
    /// All metrics, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::TotalWaterConsumed,
        Self::TotalSoftWaterConsumed,
        Self::RegenerationCount,
        Self::WaterHardness,
    ];

    /// Returns the stable key used when metrics are serialized.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::TotalWaterConsumed => "total_water_consumed",
            Self::TotalSoftWaterConsumed => "total_soft_water_consumed",
            Self::RegenerationCount => "regeneration_count",
            Self::WaterHardness => "water_hardness",
        }
    }

    /// Returns the unit of the metric, if it has one.
    #[must_use]
    pub const fn unit(&self) -> Option<&'static str> {
        match self {
            Self::TotalWaterConsumed | Self::TotalSoftWaterConsumed => Some("L"),
            Self::RegenerationCount | Self::WaterHardness => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// How a known register is laid out and what it measures.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::codec::{FieldId, Metric, RegisterRule};
///
/// let rule = RegisterRule::for_field(FieldId::new(8)).unwrap();
/// assert_eq!(rule.metric(), Metric::TotalWaterConsumed);
/// assert_eq!(rule.decode("01000000").unwrap(), 1);
///
/// assert!(RegisterRule::for_field(FieldId::new(94)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRule {
    /// 32-bit little-endian counter.
    Counter32(Metric),
    /// 16-bit little-endian value.
    Value16(Metric),
    /// Structured `:`-separated register holding a 16-bit counter.
    StructuredCounter(Metric),
}

/// Register id to rule mapping.
const RULES: [(FieldId, RegisterRule); 4] = [
    (
        FieldId::new(8),
        RegisterRule::Counter32(Metric::TotalWaterConsumed),
    ),
    (
        FieldId::new(9),
        RegisterRule::Counter32(Metric::TotalSoftWaterConsumed),
    ),
    (
        FieldId::new(90),
        RegisterRule::Value16(Metric::WaterHardness),
    ),
    (
        FieldId::new(791),
        RegisterRule::StructuredCounter(Metric::RegenerationCount),
    ),
];

impl RegisterRule {
    /// Looks up the rule for a register id. Unknown ids have no rule.
    #[must_use]
    pub fn for_field(id: FieldId) -> Option<Self> {
        RULES
            .iter()
            .find(|(rule_id, _)| *rule_id == id)
            .map(|(_, rule)| *rule)
    }

    /// Returns the metric this register feeds.
    #[must_use]
    pub const fn metric(&self) -> Metric {
        match self {
            Self::Counter32(m) | Self::Value16(m) | Self::StructuredCounter(m) => *m,
        }
    }

    /// Returns the exact raw length the register must have.
    #[must_use]
    pub const fn expected_len(&self) -> usize {
        match self {
            Self::Counter32(_) => U32_HEX_LEN,
            Self::Value16(_) => U16_HEX_LEN,
            Self::StructuredCounter(_) => REGENERATION_HEX_LEN,
        }
    }

    /// Decodes the raw register string.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the string does not match the register layout.
    pub fn decode(&self, raw: &str) -> Result<u32, CodecError> {
        match self {
            Self::Counter32(_) => byte_swap_reverse(raw),
            Self::Value16(_) => swap_u16(raw).map(u32::from),
            Self::StructuredCounter(_) => regeneration_count(raw).map(u32::from),
        }
    }
}
