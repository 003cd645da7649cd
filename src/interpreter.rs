// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame interpretation.
//!
//! Maps one decoded [`Frame`] onto the [`DeviceState`] vocabulary. The
//! stream self-heals, so nothing here returns an error: a frame that cannot
//! be fully accounted for (an unmodeled type, say, or a truncated capture)
//! is reported once per distinct payload through the state's unknown-frame
//! cache, and whatever fields *are* readable are still applied.

use crate::protocol::{Frame, frame_type};
use crate::state::{DeviceState, StateChange};
use crate::types::TempUnit;

/// Outcome of interpreting a single frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Update to apply to the device state, if the frame carried one.
    pub change: Option<StateChange>,
    /// Payload newly recorded in the unknown-frame cache. `Some` exactly
    /// when a diagnostic should be surfaced; exact repeats stay `None`.
    pub unmodeled: Option<Vec<u8>>,
}

/// Interprets a frame against the current device state.
///
/// The state is only touched through its unknown-frame cache here; applying
/// the returned change is the caller's job, so it can observe whether the
/// state actually moved.
pub fn interpret(frame: &Frame, state: &mut DeviceState) -> Interpretation {
    let mut needs_report = !frame.is_well_formed();

    let change = match frame.frame_type() {
        frame_type::POWER => match frame.byte(1) {
            Some(0) => Some(StateChange::Power(false)),
            Some(1) => Some(StateChange::Power(true)),
            Some(value) => {
                tracing::debug!(value, "unknown power state value");
                needs_report = true;
                None
            }
            None => None,
        },
        frame_type::HOLD => match frame.byte(1) {
            Some(0) => Some(StateChange::Hold(false)),
            Some(1) => Some(StateChange::Hold(true)),
            Some(value) => {
                tracing::debug!(value, "unknown hold state value");
                needs_report = true;
                None
            }
            None => None,
        },
        frame_type::TARGET_TEMP => temperature_change(frame, StateChange::TargetTemp),
        frame_type::CURRENT_TEMP => temperature_change(frame, StateChange::CurrentTemp),
        frame_type::COUNTDOWN => frame.byte(1).map(StateChange::Countdown),
        frame_type::LIFTED => match frame.byte(1) {
            // Inverted on the wire: 0 means off the base.
            Some(0) => Some(StateChange::Lifted(true)),
            Some(1) => Some(StateChange::Lifted(false)),
            Some(value) => {
                tracing::debug!(value, "unknown lifted state value");
                needs_report = true;
                None
            }
            None => None,
        },
        _ => {
            needs_report = true;
            None
        }
    };

    let unmodeled = if needs_report && state.record_unknown(frame.frame_type(), frame.bytes()) {
        tracing::warn!(
            frame_type = frame.frame_type(),
            payload = format!("{:02X?}", frame.bytes()),
            "unrecognized frame data"
        );
        Some(frame.bytes().to_vec())
    } else {
        None
    };

    Interpretation { change, unmodeled }
}

/// Temperature frames carry a value byte and a unit byte; best-effort
/// captures may be missing either.
fn temperature_change(frame: &Frame, make: fn(u8) -> StateChange) -> Option<StateChange> {
    let mut changes = Vec::new();
    if let Some(value) = frame.byte(1) {
        changes.push(make(value));
    }
    if let Some(unit) = frame.byte(2) {
        changes.push(StateChange::Unit(TempUnit::from_wire(unit)));
    }
    match changes.len() {
        0 => None,
        1 => changes.pop(),
        _ => Some(StateChange::Batch(changes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a frame exactly as the decoder would emit it, including the
    /// short best-effort captures produced during resynchronization.
    fn frame(bytes: &[u8]) -> Frame {
        Frame::new(bytes.to_vec())
    }

    #[test]
    fn power_frames() {
        let mut state = DeviceState::new();

        let on = interpret(&frame(&[0x00, 0x01, 0x00]), &mut state);
        assert_eq!(on.change, Some(StateChange::Power(true)));
        assert_eq!(on.unmodeled, None);

        let off = interpret(&frame(&[0x00, 0x00, 0x00]), &mut state);
        assert_eq!(off.change, Some(StateChange::Power(false)));
    }

    #[test]
    fn unknown_power_value_reports_and_leaves_power_alone() {
        let mut state = DeviceState::new();
        state.apply(&StateChange::Power(true));

        let result = interpret(&frame(&[0x00, 0x07, 0x00]), &mut state);
        assert_eq!(result.change, None);
        assert_eq!(result.unmodeled, Some(vec![0x00, 0x07, 0x00]));
        assert!(state.is_on());

        // Same bad value again: suppressed.
        let again = interpret(&frame(&[0x00, 0x07, 0x00]), &mut state);
        assert_eq!(again.unmodeled, None);
    }

    #[test]
    fn hold_frames() {
        let mut state = DeviceState::new();
        let on = interpret(&frame(&[0x01, 0x01, 0x00]), &mut state);
        assert_eq!(on.change, Some(StateChange::Hold(true)));
    }

    #[test]
    fn target_temperature_carries_unit() {
        let mut state = DeviceState::new();
        let result = interpret(&frame(&[0x02, 0xC8, 0x01, 0x00]), &mut state);
        assert_eq!(
            result.change,
            Some(StateChange::Batch(vec![
                StateChange::TargetTemp(200),
                StateChange::Unit(TempUnit::Fahrenheit),
            ]))
        );
        assert_eq!(result.unmodeled, None);
    }

    #[test]
    fn current_temperature_celsius() {
        let mut state = DeviceState::new();
        let result = interpret(&frame(&[0x03, 0x47, 0x00, 0x00]), &mut state);
        let change = result.change.unwrap();
        assert!(state.apply(&change));
        assert_eq!(state.current_temp(), 0x47);
        assert_eq!(state.unit(), TempUnit::Celsius);
    }

    #[test]
    fn countdown_frame() {
        let mut state = DeviceState::new();
        let result = interpret(&frame(&[0x04, 0x09, 0x00, 0x00]), &mut state);
        assert_eq!(result.change, Some(StateChange::Countdown(9)));
    }

    #[test]
    fn lifted_is_inverted() {
        let mut state = DeviceState::new();
        let lifted = interpret(&frame(&[0x08, 0x00, 0x00]), &mut state);
        assert_eq!(lifted.change, Some(StateChange::Lifted(true)));

        let on_base = interpret(&frame(&[0x08, 0x01, 0x00]), &mut state);
        assert_eq!(on_base.change, Some(StateChange::Lifted(false)));
    }

    #[test]
    fn unmodeled_types_report_once_per_payload() {
        let mut state = DeviceState::new();

        let first = interpret(&frame(&[0x05, 0xFF, 0xFF, 0xFF]), &mut state);
        assert_eq!(first.change, None);
        assert_eq!(first.unmodeled, Some(vec![0x05, 0xFF, 0xFF, 0xFF]));

        let repeat = interpret(&frame(&[0x05, 0xFF, 0xFF, 0xFF]), &mut state);
        assert_eq!(repeat.unmodeled, None);

        let changed = interpret(&frame(&[0x05, 0xFF, 0x00, 0xFF]), &mut state);
        assert_eq!(changed.unmodeled, Some(vec![0x05, 0xFF, 0x00, 0xFF]));
    }

    #[test]
    fn out_of_range_type_is_reported() {
        let mut state = DeviceState::new();
        let result = interpret(&frame(&[0x2A, 0x01, 0x02]), &mut state);
        assert_eq!(result.change, None);
        assert_eq!(result.unmodeled, Some(vec![0x2A, 0x01, 0x02]));
    }

    #[test]
    fn truncated_power_frame_still_applies_best_effort() {
        let mut state = DeviceState::new();
        // Two captured bytes instead of three: malformed but salvageable.
        let result = interpret(&frame(&[0x00, 0x01]), &mut state);
        assert_eq!(result.change, Some(StateChange::Power(true)));
        assert_eq!(result.unmodeled, Some(vec![0x00, 0x01]));
    }

    #[test]
    fn truncated_temperature_applies_present_fields() {
        let mut state = DeviceState::new();
        // Value byte present, unit byte missing.
        let result = interpret(&frame(&[0x02, 0xC8]), &mut state);
        assert_eq!(result.change, Some(StateChange::TargetTemp(200)));
        assert_eq!(result.unmodeled, Some(vec![0x02, 0xC8]));

        // Value and unit byte present, trailing byte missing.
        let result = interpret(&frame(&[0x02, 0xC8, 0x01]), &mut state);
        assert_eq!(
            result.change,
            Some(StateChange::Batch(vec![
                StateChange::TargetTemp(200),
                StateChange::Unit(TempUnit::Fahrenheit),
            ]))
        );
    }
}
