// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register value decoding.
//!
//! JU-Control devices report each register as a hex-digit string whose
//! layout depends on the register id. This module holds the pure decoders
//! and the table mapping register ids to their layout and meaning.
//!
//! | Id  | Layout                         | Metric                      |
//! |-----|--------------------------------|-----------------------------|
//! | 8   | 8 hex digits, little-endian    | total water (liters)        |
//! | 9   | 8 hex digits, little-endian    | total soft water (liters)   |
//! | 90  | 4 hex digits, little-endian    | water hardness              |
//! | 791 | 66 chars, `:` + 65 char record | regeneration count          |

mod hex;
mod register;

pub use hex::{
    REGENERATION_HEX_LEN, U16_HEX_LEN, U32_HEX_LEN, byte_swap_reverse, regeneration_count,
    swap_u16,
};
pub use register::{FieldId, HEARTBEAT_FIELD, Metric, RegisterRule};
