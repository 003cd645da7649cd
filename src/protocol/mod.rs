// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocol for the Fellow Stagg EKG+ BLE serial service.
//!
//! The protocol was reverse engineered from BLE traffic captures. Both
//! directions use the same two-byte marker `EF DD` between frames; incoming
//! state frames are a type byte followed by a type-specific number of
//! payload bytes, outgoing command frames are a fixed 8-byte shape with a
//! sequence number and a weak running checksum.
//!
//! There is no length field and no real integrity check, so the decoder in
//! [`FrameDecoder`] has to resynchronize on the markers and treat anything
//! it cannot account for as best-effort data.

mod codec;
mod frame;

pub use codec::{COMMAND_FRAME_LEN, encode_command};
pub use frame::{Frame, FrameDecoder};

use uuid::{Uuid, uuid};

/// Marker bytes preceding every frame, in both directions.
pub const FRAME_MARKER: [u8; 2] = [0xEF, 0xDD];

/// UUID of the kettle's SPS (serial over BLE) service.
pub const SERVICE_UUID: Uuid = uuid!("00001820-0000-1000-8000-00805f9b34fb");

/// UUID of the serial channel characteristic under [`SERVICE_UUID`].
pub const SERIAL_CHARACTERISTIC_UUID: Uuid = uuid!("00002a80-0000-1000-8000-00805f9b34fb");

/// Fixed handshake written once after connecting.
///
/// Appears to tell the kettle the client speaks its protocol; the bytes are
/// a magic number captured from the vendor app and have no known structure
/// beyond the leading frame marker.
pub const INIT_HANDSHAKE: [u8; 20] = [
    0xEF, 0xDD, 0x0B, 0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x30, 0x31,
    0x32, 0x33, 0x34, 0x9A, 0x6D,
];

/// Total length (type byte included) of each known frame type.
pub const FRAME_LENGTHS: [usize; 9] = [
    3, // 0 = power
    3, // 1 = hold
    4, // 2 = target temperature
    4, // 3 = current temperature
    4, // 4 = countdown while lifted
    4, // 5 = unknown, usually 05 FF FF FF
    3, // 6 = unknown, possibly boiled/holding
    3, // 7 = unknown, usually 07 00 00
    3, // 8 = kettle lifted
];

/// Expected total frame length for a type byte, if the type is known.
#[must_use]
pub fn expected_frame_len(frame_type: u8) -> Option<usize> {
    FRAME_LENGTHS.get(usize::from(frame_type)).copied()
}

/// Type bytes of the frames the driver models.
pub mod frame_type {
    /// Power on/off report.
    pub const POWER: u8 = 0;
    /// Temperature-hold on/off report.
    pub const HOLD: u8 = 1;
    /// Target temperature report.
    pub const TARGET_TEMP: u8 = 2;
    /// Current temperature report.
    pub const CURRENT_TEMP: u8 = 3;
    /// Countdown report, sent while the kettle is lifted.
    pub const COUNTDOWN: u8 = 4;
    /// Lifted-from-base report.
    pub const LIFTED: u8 = 8;
}
