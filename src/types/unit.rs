// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature unit handling.
//!
//! The kettle reports its unit with every temperature frame, and the valid
//! setpoint range depends on it. All temperatures on the wire are single
//! unitless bytes; the unit only matters for interpretation and clamping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Temperature unit reported by the kettle.
///
/// The unit is taken from the most recently received temperature frame;
/// until one arrives the driver assumes Celsius.
///
/// # Examples
///
/// ```
/// use stagg_lib::types::TempUnit;
///
/// assert_eq!(TempUnit::Celsius.setpoint_min(), 65);
/// assert_eq!(TempUnit::Celsius.setpoint_max(), 100);
/// assert_eq!(TempUnit::Fahrenheit.setpoint_min(), 160);
/// assert_eq!(TempUnit::Fahrenheit.setpoint_max(), 212);
///
/// // Out-of-range setpoints are pulled to the nearest bound.
/// assert_eq!(TempUnit::Fahrenheit.clamp_setpoint(250), 212);
/// assert_eq!(TempUnit::Celsius.clamp_setpoint(40), 65);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TempUnit {
    /// Degrees Celsius.
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TempUnit {
    /// Decodes the unit byte carried in temperature frames.
    ///
    /// The kettle sends `1` for Fahrenheit; every other value is treated
    /// as Celsius.
    #[must_use]
    pub fn from_wire(byte: u8) -> Self {
        if byte == 1 { Self::Fahrenheit } else { Self::Celsius }
    }

    /// Lowest setpoint the kettle accepts in this unit.
    #[must_use]
    pub const fn setpoint_min(self) -> u8 {
        match self {
            Self::Celsius => 65,
            Self::Fahrenheit => 160,
        }
    }

    /// Highest setpoint the kettle accepts in this unit.
    #[must_use]
    pub const fn setpoint_max(self) -> u8 {
        match self {
            Self::Celsius => 100,
            Self::Fahrenheit => 212,
        }
    }

    /// Clamps a requested setpoint to the range the kettle accepts.
    #[must_use]
    pub fn clamp_setpoint(self, value: u8) -> u8 {
        value.clamp(self.setpoint_min(), self.setpoint_max())
    }

    /// Single-letter unit suffix, as shown on the kettle display.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
