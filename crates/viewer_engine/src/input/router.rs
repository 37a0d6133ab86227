//! Platform event routing
//!
//! Maps each [`PlatformEvent`] to exactly one destination: the view's reset, the
//! window's close handling, or one control-delegate call. Nothing is filtered or
//! coalesced here; the window drops controller events when no controller is installed.

use super::InputEvent;
use crate::platform::PlatformEvent;

/// Where a routed platform event goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routed {
    /// Forward to the view delegate's reset
    ViewReset {
        /// New drawable width
        width: u32,
        /// New drawable height
        height: u32,
    },
    /// Stop both delegates and let the platform close the window
    Close,
    /// Forward to the control delegate
    Control(InputEvent),
}

/// Translates platform events into routed calls
///
/// The only state is the wheel accumulator: platforms report scroll offsets, while the
/// control delegate receives an absolute wheel position.
#[derive(Debug, Default)]
pub struct InputEventRouter {
    wheel: f64,
}

impl InputEventRouter {
    /// Create a router with the wheel at position zero
    pub const fn new() -> Self {
        Self { wheel: 0.0 }
    }

    /// Return the wheel to position zero (a freshly opened window)
    pub fn reset(&mut self) {
        self.wheel = 0.0;
    }

    /// Current absolute wheel position
    #[allow(clippy::cast_possible_truncation)]
    pub fn wheel_position(&self) -> i32 {
        self.wheel.round() as i32
    }

    /// Route one platform event
    #[allow(clippy::cast_possible_truncation)]
    pub fn route(&mut self, event: PlatformEvent) -> Routed {
        let routed = match event {
            PlatformEvent::Resized { width, height } => Routed::ViewReset { width, height },
            PlatformEvent::CloseRequested => Routed::Close,
            PlatformEvent::CursorMoved { x, y } => Routed::Control(InputEvent::MouseMoved {
                x: x.floor() as i32,
                y: y.floor() as i32,
            }),
            PlatformEvent::Scrolled { offset } => {
                self.wheel += offset;
                Routed::Control(InputEvent::WheelMoved {
                    position: self.wheel_position(),
                })
            }
            PlatformEvent::MouseButton { button, down } => {
                Routed::Control(InputEvent::MouseButtonChanged { button, down })
            }
            PlatformEvent::Key { key, down } => Routed::Control(InputEvent::KeyChanged { key, down }),
        };
        log::trace!("Routed {:?} -> {:?}", event, routed);
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyIndex, MouseButton};

    #[test]
    fn test_each_event_routes_once() {
        let mut router = InputEventRouter::new();
        let a = KeyIndex::from_char('A').expect("printable");

        assert_eq!(
            router.route(PlatformEvent::Key { key: a, down: true }),
            Routed::Control(InputEvent::KeyChanged { key: a, down: true })
        );
        assert_eq!(
            router.route(PlatformEvent::Key { key: a, down: false }),
            Routed::Control(InputEvent::KeyChanged { key: a, down: false })
        );
        assert_eq!(
            router.route(PlatformEvent::MouseButton { button: MouseButton::Middle, down: true }),
            Routed::Control(InputEvent::MouseButtonChanged { button: MouseButton::Middle, down: true })
        );
        assert_eq!(
            router.route(PlatformEvent::Resized { width: 640, height: 480 }),
            Routed::ViewReset { width: 640, height: 480 }
        );
        assert_eq!(router.route(PlatformEvent::CloseRequested), Routed::Close);
    }

    #[test]
    fn test_cursor_is_floored_to_pixels() {
        let mut router = InputEventRouter::new();
        assert_eq!(
            router.route(PlatformEvent::CursorMoved { x: 10.7, y: 3.2 }),
            Routed::Control(InputEvent::MouseMoved { x: 10, y: 3 })
        );
        assert_eq!(
            router.route(PlatformEvent::CursorMoved { x: -0.5, y: 0.0 }),
            Routed::Control(InputEvent::MouseMoved { x: -1, y: 0 })
        );
    }

    #[test]
    fn test_wheel_reports_absolute_position() {
        let mut router = InputEventRouter::new();
        let positions: Vec<_> = [1.0, 1.0, -3.0]
            .into_iter()
            .map(|offset| router.route(PlatformEvent::Scrolled { offset }))
            .collect();

        assert_eq!(
            positions,
            vec![
                Routed::Control(InputEvent::WheelMoved { position: 1 }),
                Routed::Control(InputEvent::WheelMoved { position: 2 }),
                Routed::Control(InputEvent::WheelMoved { position: -1 }),
            ]
        );

        router.reset();
        assert_eq!(router.wheel_position(), 0);
    }
}
