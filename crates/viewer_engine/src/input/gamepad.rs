//! Gamepad polling with edge detection
//!
//! Gamepads only expose continuous state, so each frame the poller reads every slot,
//! normalizes the axes through a [`GamepadProfile`], and compares the result with the
//! slot's previous snapshot. Only values that changed produce events.
//!
//! Emission order is deterministic: slots ascending, then within a slot all axes
//! ascending followed by all buttons ascending.

use serde::{Deserialize, Serialize};

use super::{GamepadAxis, GamepadButton, InputEvent};
use crate::platform::{GamepadSource, RawGamepad};

/// Number of gamepad slots polled each frame
pub const MAX_GAMEPADS: usize = 2;
/// Axes tracked per gamepad
pub const MAX_GAMEPAD_AXES: usize = GamepadAxis::ALL.len();
/// Buttons tracked per gamepad
pub const MAX_GAMEPAD_BUTTONS: usize = GamepadButton::ALL.len();

/// Splits one bidirectional axis into two unidirectional ones
///
/// Some pads report both triggers on a single axis: one trigger pushes it positive, the
/// other negative. After the split `axis` holds `max(raw, 0)` and `negative_axis` holds
/// `-min(raw, 0)`, both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSplit {
    /// Shared source axis; keeps the positive half
    pub axis: usize,
    /// Receives the negated negative half
    pub negative_axis: usize,
}

/// Device-specific axis fix-ups applied before change detection
///
/// The default matches XInput-style pads read through GLFW: the right stick's vertical
/// axis is inverted and both triggers share axis 2. This mapping was derived from one
/// controller model, so it is configuration rather than a rule; use
/// [`GamepadProfile::identity`] for hardware that reports sane values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadProfile {
    /// Axes whose sign is flipped
    pub flip_axes: Vec<usize>,
    /// Optional trigger split, applied after flipping
    pub trigger_split: Option<TriggerSplit>,
}

impl GamepadProfile {
    /// Profile for XInput-style pads
    pub fn xinput() -> Self {
        Self {
            flip_axes: vec![GamepadAxis::RightThumbY.index()],
            trigger_split: Some(TriggerSplit {
                axis: GamepadAxis::LeftTrigger.index(),
                negative_axis: GamepadAxis::RightTrigger.index(),
            }),
        }
    }

    /// Profile that leaves raw values untouched
    pub const fn identity() -> Self {
        Self {
            flip_axes: Vec::new(),
            trigger_split: None,
        }
    }

    /// Normalize `axes` in place; indices outside the slice are ignored
    pub fn apply(&self, axes: &mut [f32]) {
        for &index in &self.flip_axes {
            if let Some(value) = axes.get_mut(index) {
                *value = -*value;
            }
        }

        if let Some(split) = self.trigger_split {
            if split.axis < axes.len() && split.negative_axis < axes.len() {
                let raw = axes[split.axis];
                axes[split.negative_axis] = if raw < 0.0 { -raw } else { 0.0 };
                axes[split.axis] = if raw > 0.0 { raw } else { 0.0 };
            }
        }
    }
}

impl Default for GamepadProfile {
    fn default() -> Self {
        Self::xinput()
    }
}

/// Post-normalization state of one slot, kept only for diffing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct GamepadSnapshot {
    axes: [f32; MAX_GAMEPAD_AXES],
    buttons: [bool; MAX_GAMEPAD_BUTTONS],
}

impl GamepadSnapshot {
    /// Copy raw state into fixed arrays, padding short reads with zero / released
    fn capture(raw: &RawGamepad, profile: &GamepadProfile) -> Self {
        let mut snapshot = Self::default();
        for (slot, value) in snapshot.axes.iter_mut().zip(&raw.axes) {
            *slot = *value;
        }
        for (slot, value) in snapshot.buttons.iter_mut().zip(&raw.buttons) {
            *slot = *value;
        }
        profile.apply(&mut snapshot.axes);
        snapshot
    }
}

/// Per-frame gamepad poller owning one snapshot per slot
#[derive(Debug, Clone, Default)]
pub struct GamepadPoller {
    profile: GamepadProfile,
    snapshots: [GamepadSnapshot; MAX_GAMEPADS],
}

impl GamepadPoller {
    /// Create a poller with zeroed snapshots
    pub fn new(profile: GamepadProfile) -> Self {
        Self {
            profile,
            snapshots: [GamepadSnapshot::default(); MAX_GAMEPADS],
        }
    }

    /// Active normalization profile
    pub const fn profile(&self) -> &GamepadProfile {
        &self.profile
    }

    /// Replace the normalization profile; snapshots are kept
    pub fn set_profile(&mut self, profile: GamepadProfile) {
        self.profile = profile;
    }

    /// Poll every slot once and return the changes since the previous poll
    ///
    /// Absent devices are skipped and keep their last snapshot.
    #[allow(clippy::float_cmp)]
    pub fn poll<S>(&mut self, source: &S) -> Vec<InputEvent>
    where
        S: GamepadSource + ?Sized,
    {
        let mut events = Vec::new();

        for (gamepad, previous) in self.snapshots.iter_mut().enumerate() {
            let Some(raw) = source.read_gamepad(gamepad) else {
                continue;
            };
            let current = GamepadSnapshot::capture(&raw, &self.profile);

            // Exact comparison: any change is an edge, deadzones belong to the delegate
            for ((axis, value), old) in GamepadAxis::ALL
                .into_iter()
                .zip(current.axes)
                .zip(previous.axes)
            {
                if value != old {
                    events.push(InputEvent::GamepadAxisMoved { gamepad, axis, value });
                }
            }
            for ((button, down), old) in GamepadButton::ALL
                .into_iter()
                .zip(current.buttons)
                .zip(previous.buttons)
            {
                if down != old {
                    events.push(InputEvent::GamepadButtonChanged { gamepad, button, down });
                }
            }

            *previous = current;
        }

        if !events.is_empty() {
            log::trace!("Gamepad poll produced {} events", events.len());
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    /// Source whose slots the test rewrites between polls
    #[derive(Default)]
    struct FakePads {
        slots: RefCell<[Option<RawGamepad>; MAX_GAMEPADS]>,
    }

    impl FakePads {
        fn set(&self, slot: usize, axes: &[f32], buttons: &[bool]) {
            self.slots.borrow_mut()[slot] = Some(RawGamepad {
                axes: axes.to_vec(),
                buttons: buttons.to_vec(),
            });
        }

        fn unplug(&self, slot: usize) {
            self.slots.borrow_mut()[slot] = None;
        }
    }

    impl GamepadSource for FakePads {
        fn read_gamepad(&self, slot: usize) -> Option<RawGamepad> {
            self.slots.borrow().get(slot).cloned().flatten()
        }
    }

    fn axis_event(gamepad: usize, axis: GamepadAxis, value: f32) -> InputEvent {
        InputEvent::GamepadAxisMoved { gamepad, axis, value }
    }

    #[test]
    fn test_absent_pads_produce_nothing() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::default();
        assert!(poller.poll(&pads).is_empty());
    }

    #[test]
    fn test_resting_pad_is_silent_on_first_poll() {
        let pads = FakePads::default();
        pads.set(0, &[0.0; 8], &[false; 12]);
        let mut poller = GamepadPoller::new(GamepadProfile::identity());
        assert!(poller.poll(&pads).is_empty());
    }

    #[test]
    fn test_second_poll_with_same_state_is_silent() {
        let pads = FakePads::default();
        pads.set(0, &[0.5, -0.25, 0.0, 0.9], &[true, false, true]);
        pads.set(1, &[0.1], &[false, true]);
        let mut poller = GamepadPoller::default();

        assert!(!poller.poll(&pads).is_empty());
        assert!(poller.poll(&pads).is_empty());
    }

    #[test]
    fn test_only_changed_axis_fires() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::new(GamepadProfile::identity());

        pads.set(0, &[0.0, 0.0, 0.3], &[]);
        assert_eq!(poller.poll(&pads), vec![axis_event(0, GamepadAxis::LeftTrigger, 0.3)]);

        pads.set(0, &[0.0, 0.0, 0.3], &[]);
        assert!(poller.poll(&pads).is_empty());

        pads.set(0, &[0.0, 0.0, 0.31], &[]);
        assert_eq!(poller.poll(&pads), vec![axis_event(0, GamepadAxis::LeftTrigger, 0.31)]);
    }

    #[test]
    fn test_button_edges() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::default();

        pads.set(1, &[], &[false, false, false, true]);
        assert_eq!(
            poller.poll(&pads),
            vec![InputEvent::GamepadButtonChanged { gamepad: 1, button: GamepadButton::Y, down: true }]
        );

        pads.set(1, &[], &[false; 12]);
        assert_eq!(
            poller.poll(&pads),
            vec![InputEvent::GamepadButtonChanged { gamepad: 1, button: GamepadButton::Y, down: false }]
        );
    }

    #[test]
    fn test_trigger_split_is_consistent() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::default();

        pads.set(0, &[0.0, 0.0, -0.6], &[]);
        let events = poller.poll(&pads);
        assert_eq!(events.len(), 1);
        match events[0] {
            InputEvent::GamepadAxisMoved { gamepad, axis, value } => {
                assert_eq!(gamepad, 0);
                assert_eq!(axis, GamepadAxis::RightTrigger);
                assert_relative_eq!(value, 0.6);
            }
            other => panic!("unexpected event {other:?}"),
        }

        // Same raw reading keeps the same split, so nothing fires
        pads.set(0, &[0.0, 0.0, -0.6], &[]);
        assert!(poller.poll(&pads).is_empty());

        // Swinging positive moves the left trigger and releases the right one
        pads.set(0, &[0.0, 0.0, 0.4], &[]);
        assert_eq!(
            poller.poll(&pads),
            vec![
                axis_event(0, GamepadAxis::LeftTrigger, 0.4),
                axis_event(0, GamepadAxis::RightTrigger, 0.0),
            ]
        );
    }

    #[test]
    fn test_profile_apply() {
        let mut axes = [0.0, 0.0, -0.6, 0.5, 0.0, 0.0, 0.0, 0.0];
        GamepadProfile::xinput().apply(&mut axes);
        assert_relative_eq!(axes[2], 0.0);
        assert_relative_eq!(axes[3], -0.5);
        assert_relative_eq!(axes[7], 0.6);

        let mut short = [0.2, 0.3];
        GamepadProfile::xinput().apply(&mut short);
        assert_eq!(short, [0.2, 0.3]);
    }

    #[test]
    fn test_emission_order_is_slot_axes_buttons() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::new(GamepadProfile::identity());
        pads.set(1, &[0.0, 1.0], &[true]);
        pads.set(0, &[0.0, 0.0, 0.0, 0.0, 0.5], &[false, true]);

        assert_eq!(
            poller.poll(&pads),
            vec![
                axis_event(0, GamepadAxis::RightThumbX, 0.5),
                InputEvent::GamepadButtonChanged { gamepad: 0, button: GamepadButton::B, down: true },
                axis_event(1, GamepadAxis::LeftThumbY, 1.0),
                InputEvent::GamepadButtonChanged { gamepad: 1, button: GamepadButton::A, down: true },
            ]
        );
    }

    #[test]
    fn test_unplugged_pad_keeps_snapshot() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::new(GamepadProfile::identity());
        pads.set(0, &[0.7], &[]);
        assert_eq!(poller.poll(&pads).len(), 1);

        pads.unplug(0);
        assert!(poller.poll(&pads).is_empty());

        // Replugged in the same position: no change against the kept snapshot
        pads.set(0, &[0.7], &[]);
        assert!(poller.poll(&pads).is_empty());
    }

    #[test]
    fn test_extra_axes_and_buttons_are_truncated() {
        let pads = FakePads::default();
        let mut poller = GamepadPoller::new(GamepadProfile::identity());
        pads.set(0, &[0.0; 12], &[true; 20]);
        assert_eq!(poller.poll(&pads).len(), MAX_GAMEPAD_BUTTONS);
    }
}
