//! Collaborator traits installed on the main window
//!
//! The window owns no rendering or input policy of its own. It forwards lifecycle
//! notifications and frames to a [`ViewDelegate`] and input to a [`ControlDelegate`].
//! Both are shared with the code that installed them, hence the `Rc<RefCell<_>>`
//! aliases.
//!
//! Every callback receives the [`Window`] so a delegate can query the size, change the
//! title, clear the screen or swap the other delegate from inside a callback.

use std::cell::RefCell;
use std::rc::Rc;

use super::Window;
use crate::input::{GamepadAxis, GamepadButton, KeyIndex, MouseButton};

/// Produces frames and reacts to size changes
///
/// Only [`render`](ViewDelegate::render) is required. The window guarantees that
/// `start` and `stop` alternate: a view never sees two starts without a stop between
/// them.
pub trait ViewDelegate {
    /// The view became active on a visible window
    ///
    /// Fires when the window opens with this view installed, or when the view is
    /// installed on an already visible window. A [`reset`](ViewDelegate::reset) with the
    /// current size always follows.
    fn start(&mut self, _window: &Window) {}

    /// The drawable area is now `width` x `height` pixels
    fn reset(&mut self, _window: &Window, _width: u32, _height: u32) {}

    /// The view is being replaced or the window is closing
    fn stop(&mut self, _window: &Window) {}

    /// Draw one frame into the current back buffer
    fn render(&mut self, window: &Window);
}

/// Reacts to user input and per-frame notifications
///
/// Every method defaults to a no-op, so a controller implements only what it needs.
/// Calls arrive synchronously from inside [`Window::update`]; nothing is queued.
pub trait ControlDelegate {
    /// The controller became active on a visible window
    fn start(&mut self, _window: &Window) {}

    /// The controller is being replaced or the window is closing
    fn stop(&mut self, _window: &Window) {}

    /// A frame is about to be rendered
    ///
    /// Runs before the view's render in the same update, so state advanced here is
    /// what the frame shows.
    fn view_will_render(&mut self, _window: &Window) {}

    /// Cursor moved to window coordinates `(x, y)`, y pointing down
    fn mouse_moved(&mut self, _window: &Window, _x: i32, _y: i32) {}

    /// A mouse button was pressed or released
    fn mouse_button_changed(&mut self, _window: &Window, _button: MouseButton, _down: bool) {}

    /// The wheel moved to an absolute `position`
    fn wheel_moved(&mut self, _window: &Window, _position: i32) {}

    /// A key was pressed or released
    fn key_changed(&mut self, _window: &Window, _key: KeyIndex, _down: bool) {}

    /// A gamepad axis changed value
    fn gamepad_axis_moved(
        &mut self,
        _window: &Window,
        _gamepad: usize,
        _axis: GamepadAxis,
        _value: f32,
    ) {
    }

    /// A gamepad button was pressed or released
    fn gamepad_button_changed(
        &mut self,
        _window: &Window,
        _gamepad: usize,
        _button: GamepadButton,
        _down: bool,
    ) {
    }
}

/// A view shared between the window and its installer
pub type SharedView = Rc<RefCell<dyn ViewDelegate>>;

/// A controller shared between the window and its installer
pub type SharedController = Rc<RefCell<dyn ControlDelegate>>;
