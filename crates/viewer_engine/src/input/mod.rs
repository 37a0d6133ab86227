//! Input index spaces and the discrete input event shape
//!
//! Every input source ends up as one [`InputEvent`] delivered synchronously to the
//! window's [`ControlDelegate`]. Nothing here is queued or retained between frames.

pub mod gamepad;
pub mod router;

use crate::window::{ControlDelegate, Window};

pub use gamepad::{GamepadPoller, GamepadProfile, TriggerSplit};
pub use router::{InputEventRouter, Routed};

/// Keyboard key index
///
/// Printable keys use their capital ASCII code (`'A'` is 65, space is 32). Keys without
/// a printable character live in a reserved block starting at [`KeyIndex::SPECIAL`],
/// which never overlaps the ASCII range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyIndex(u32);

impl KeyIndex {
    /// Space bar
    pub const SPACE: Self = Self(32);
    /// Start of the reserved block for non-printable keys
    pub const SPECIAL: Self = Self(256);
    /// Escape
    pub const ESC: Self = Self(257);
    /// F1; F2 to F25 follow consecutively, see [`KeyIndex::function`]
    pub const F1: Self = Self(258);
    /// F2
    pub const F2: Self = Self(259);
    /// F3
    pub const F3: Self = Self(260);
    /// F4
    pub const F4: Self = Self(261);
    /// F5
    pub const F5: Self = Self(262);
    /// F6
    pub const F6: Self = Self(263);
    /// F7
    pub const F7: Self = Self(264);
    /// F8
    pub const F8: Self = Self(265);
    /// F9
    pub const F9: Self = Self(266);
    /// F10
    pub const F10: Self = Self(267);
    /// F11
    pub const F11: Self = Self(268);
    /// F12
    pub const F12: Self = Self(269);
    /// Up arrow
    pub const UP: Self = Self(283);
    /// Down arrow
    pub const DOWN: Self = Self(284);
    /// Left arrow
    pub const LEFT: Self = Self(285);
    /// Right arrow
    pub const RIGHT: Self = Self(286);
    /// Left shift
    pub const LEFT_SHIFT: Self = Self(287);
    /// Right shift
    pub const RIGHT_SHIFT: Self = Self(288);
    /// Left control
    pub const LEFT_CTRL: Self = Self(289);
    /// Right control
    pub const RIGHT_CTRL: Self = Self(290);
    /// Left alt
    pub const LEFT_ALT: Self = Self(291);
    /// Right alt
    pub const RIGHT_ALT: Self = Self(292);
    /// Tab
    pub const TAB: Self = Self(293);
    /// Enter / return
    pub const ENTER: Self = Self(294);
    /// Backspace
    pub const BACKSPACE: Self = Self(295);
    /// Insert
    pub const INSERT: Self = Self(296);
    /// Delete
    pub const DELETE: Self = Self(297);
    /// Page up
    pub const PAGE_UP: Self = Self(298);
    /// Page down
    pub const PAGE_DOWN: Self = Self(299);
    /// Home
    pub const HOME: Self = Self(300);
    /// End
    pub const END: Self = Self(301);
    /// Keypad 0; keypad 1 to 9 follow consecutively, see [`KeyIndex::pad_digit`]
    pub const PAD_0: Self = Self(302);
    /// Keypad divide
    pub const PAD_DIVIDE: Self = Self(312);
    /// Keypad multiply
    pub const PAD_MULTIPLY: Self = Self(313);
    /// Keypad subtract
    pub const PAD_SUBTRACT: Self = Self(314);
    /// Keypad add
    pub const PAD_ADD: Self = Self(315);
    /// Keypad decimal point
    pub const PAD_DECIMAL: Self = Self(316);
    /// Keypad equals
    pub const PAD_EQUAL: Self = Self(317);
    /// Keypad enter
    pub const PAD_ENTER: Self = Self(318);
    /// Num lock
    pub const PAD_NUM_LOCK: Self = Self(319);
    /// Caps lock
    pub const CAPS_LOCK: Self = Self(320);
    /// Scroll lock
    pub const SCROLL_LOCK: Self = Self(321);
    /// Pause
    pub const PAUSE: Self = Self(322);
    /// Left super / windows / command
    pub const LEFT_SUPER: Self = Self(323);
    /// Right super / windows / command
    pub const RIGHT_SUPER: Self = Self(324);

    /// Wrap a raw index
    pub const fn from_code(code: u32) -> Self {
        Self(code)
    }

    /// Raw index value
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Index of a printable character; lowercase letters map to their capital
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        (upper == ' ' || upper.is_ascii_graphic()).then(|| Self(u32::from(upper)))
    }

    /// The printable character this key stands for, if any
    pub fn as_char(self) -> Option<char> {
        if self.is_printable() {
            char::from_u32(self.0)
        } else {
            None
        }
    }

    /// Whether the index lies in the printable ASCII range
    pub const fn is_printable(self) -> bool {
        self.0 < Self::SPECIAL.0
    }

    /// Function key `F<n>` for `n` in 1..=25
    pub const fn function(n: u32) -> Option<Self> {
        if matches!(n, 1..=25) {
            Some(Self(Self::F1.0 + n - 1))
        } else {
            None
        }
    }

    /// Keypad digit `n` for `n` in 0..=9
    pub const fn pad_digit(n: u32) -> Option<Self> {
        if n <= 9 {
            Some(Self(Self::PAD_0.0 + n))
        } else {
            None
        }
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

impl MouseButton {
    /// Zero-based button index
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Gamepad axes, in the order the poller reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    /// Left stick horizontal
    LeftThumbX,
    /// Left stick vertical
    LeftThumbY,
    /// Left trigger, 0 released to 1 pressed
    LeftTrigger,
    /// Right stick vertical
    RightThumbY,
    /// Right stick horizontal
    RightThumbX,
    /// Unassigned
    Reserved0,
    /// Unassigned
    Reserved1,
    /// Right trigger, 0 released to 1 pressed
    RightTrigger,
}

impl GamepadAxis {
    /// Every axis, indexed by its position
    pub const ALL: [Self; 8] = [
        Self::LeftThumbX,
        Self::LeftThumbY,
        Self::LeftTrigger,
        Self::RightThumbY,
        Self::RightThumbX,
        Self::Reserved0,
        Self::Reserved1,
        Self::RightTrigger,
    ];

    /// Zero-based axis index
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Gamepad buttons, in the order the poller reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    /// A / cross
    A,
    /// B / circle
    B,
    /// X / square
    X,
    /// Y / triangle
    Y,
    /// Left bumper
    LeftShoulder,
    /// Right bumper
    RightShoulder,
    /// Back / select
    Back,
    /// Start
    Start,
    /// Left stick click
    LeftThumb,
    /// Right stick click
    RightThumb,
    /// Unassigned
    Reserved0,
    /// Unassigned
    Reserved1,
}

impl GamepadButton {
    /// Every button, indexed by its position
    pub const ALL: [Self; 12] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::Back,
        Self::Start,
        Self::LeftThumb,
        Self::RightThumb,
        Self::Reserved0,
        Self::Reserved1,
    ];

    /// Zero-based button index
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One discrete input occurrence for the control delegate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to window coordinates, y downwards
    MouseMoved {
        /// Horizontal position
        x: i32,
        /// Vertical position
        y: i32,
    },
    /// Mouse button pressed or released
    MouseButtonChanged {
        /// Which button
        button: MouseButton,
        /// Pressed when true
        down: bool,
    },
    /// Wheel moved to an absolute position
    WheelMoved {
        /// Accumulated wheel position
        position: i32,
    },
    /// Key pressed or released
    KeyChanged {
        /// Which key
        key: KeyIndex,
        /// Pressed when true
        down: bool,
    },
    /// Gamepad axis changed value
    GamepadAxisMoved {
        /// Gamepad slot
        gamepad: usize,
        /// Which axis
        axis: GamepadAxis,
        /// New normalized position
        value: f32,
    },
    /// Gamepad button pressed or released
    GamepadButtonChanged {
        /// Gamepad slot
        gamepad: usize,
        /// Which button
        button: GamepadButton,
        /// Pressed when true
        down: bool,
    },
}

impl InputEvent {
    /// Deliver the event to the matching delegate method
    pub fn dispatch<C>(self, controller: &mut C, window: &Window)
    where
        C: ControlDelegate + ?Sized,
    {
        match self {
            Self::MouseMoved { x, y } => controller.mouse_moved(window, x, y),
            Self::MouseButtonChanged { button, down } => {
                controller.mouse_button_changed(window, button, down);
            }
            Self::WheelMoved { position } => controller.wheel_moved(window, position),
            Self::KeyChanged { key, down } => controller.key_changed(window, key, down),
            Self::GamepadAxisMoved { gamepad, axis, value } => {
                controller.gamepad_axis_moved(window, gamepad, axis, value);
            }
            Self::GamepadButtonChanged { gamepad, button, down } => {
                controller.gamepad_button_changed(window, gamepad, button, down);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_and_reserved_ranges_are_disjoint() {
        for c in ' '..='~' {
            let key = KeyIndex::from_char(c).expect("printable");
            assert!(key.is_printable());
            assert!(key < KeyIndex::SPECIAL);
        }
        assert!(!KeyIndex::ESC.is_printable());
        assert!(KeyIndex::SPECIAL < KeyIndex::ESC);
        assert_eq!(KeyIndex::RIGHT_SUPER.code(), 324);
    }

    #[test]
    fn test_letters_are_capitalized() {
        assert_eq!(KeyIndex::from_char('a'), Some(KeyIndex::from_code(65)));
        assert_eq!(KeyIndex::from_char('A').and_then(KeyIndex::as_char), Some('A'));
        assert_eq!(KeyIndex::from_char('\n'), None);
        assert_eq!(KeyIndex::ESC.as_char(), None);
    }

    #[test]
    fn test_function_and_pad_blocks() {
        assert_eq!(KeyIndex::function(1), Some(KeyIndex::F1));
        assert_eq!(KeyIndex::function(12), Some(KeyIndex::F12));
        assert_eq!(KeyIndex::function(25).map(KeyIndex::code), Some(282));
        assert_eq!(KeyIndex::function(0), None);
        assert_eq!(KeyIndex::function(26), None);
        assert_eq!(KeyIndex::pad_digit(9).map(KeyIndex::code), Some(311));
        assert_eq!(KeyIndex::pad_digit(10), None);
        // Block after F25 starts with the arrows
        assert_eq!(KeyIndex::UP.code(), KeyIndex::F1.code() + 25);
    }

    #[test]
    fn test_enum_indices_match_positions() {
        for (i, axis) in GamepadAxis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
        for (i, button) in GamepadButton::ALL.iter().enumerate() {
            assert_eq!(button.index(), i);
        }
        assert_eq!(GamepadAxis::RightTrigger.index(), 7);
        assert_eq!(MouseButton::Middle.index(), 2);
    }
}
