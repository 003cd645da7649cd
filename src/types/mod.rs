// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the driver.
//!
//! # Types
//!
//! - [`TempUnit`] - Celsius/Fahrenheit, with the per-unit setpoint bounds
//! - [`ConnectionPhase`] - connection lifecycle phase

mod phase;
mod unit;

pub use phase::ConnectionPhase;
pub use unit::TempUnit;
