//! GLFW-based window management for OpenGL rendering
//!
//! Creates the OS window with an OpenGL 3.3 core context, translates GLFW's queued
//! window events into [`PlatformEvent`]s, and reads joystick state for the gamepad
//! poller.
//!
//! GLFW only tolerates one thread driving it, which is why [`GlfwBackend`] is neither
//! `Send` nor `Sync` and the [`Window`](crate::window::Window) singleton is per thread.

use glfw::{Action, Context, JoystickId, Key, WindowEvent};

use super::{
    ContextRequest, GamepadSource, Platform, PlatformEvent, RawGamepad, WindowBackend,
    WindowError, WindowResult,
};
use crate::input::{KeyIndex, MouseButton};

/// Creates GLFW windows; the default [`Platform`]
#[derive(Debug, Default)]
pub struct GlfwPlatform;

impl Platform for GlfwPlatform {
    fn create_window(&mut self, request: &ContextRequest) -> WindowResult<Box<dyn WindowBackend>> {
        Ok(Box::new(GlfwBackend::new(request)?))
    }
}

fn log_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {:?}: {}", error, description);
}

/// GLFW window wrapper owning the context and the event receiver
///
/// Field order matters: the window is destroyed before the library handle is dropped.
pub struct GlfwBackend {
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, WindowEvent)>,
    glfw: glfw::Glfw,
    closed: bool,
    fullscreen: bool,
    windowed_pos: (i32, i32),
}

impl GlfwBackend {
    /// Initialize GLFW and open a window as described by `request`
    ///
    /// # Errors
    /// [`WindowError::InitializationFailed`] if GLFW cannot start,
    /// [`WindowError::CreationFailed`] if the window or context cannot be created.
    pub fn new(request: &ContextRequest) -> WindowResult<Self> {
        let mut glfw = glfw::init(log_glfw_error).map_err(|e| {
            log::error!("GLFW initialization failed: {:?}", e);
            WindowError::InitializationFailed
        })?;

        let (major, minor) = request.version;
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
        glfw.window_hint(glfw::WindowHint::ContextVersion(major, minor));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlDebugContext(request.debug));
        glfw.window_hint(glfw::WindowHint::Samples(Some(request.sample_count)));
        glfw.window_hint(glfw::WindowHint::DepthBits(Some(24)));
        glfw.window_hint(glfw::WindowHint::StencilBits(Some(8)));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let created = if request.windowed {
            glfw.create_window(
                request.width,
                request.height,
                &request.title,
                glfw::WindowMode::Windowed,
            )
        } else {
            glfw.with_primary_monitor(|glfw, monitor| {
                let mode = monitor.map_or(glfw::WindowMode::Windowed, |m| {
                    glfw::WindowMode::FullScreen(m)
                });
                glfw.create_window(request.width, request.height, &request.title, mode)
            })
        };
        // Dropping `glfw` on this path terminates the library again
        let (mut window, events) = created.ok_or(WindowError::CreationFailed)?;

        window.make_current();
        gl::load_with(|symbol| window.get_proc_address(symbol) as *const _);
        glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_scroll_polling(true);
        window.set_mouse_button_polling(true);
        window.set_key_polling(true);

        let windowed_pos = window.get_pos();
        Ok(Self {
            window,
            events,
            glfw,
            closed: false,
            fullscreen: !request.windowed,
            windowed_pos,
        })
    }
}

impl GamepadSource for GlfwBackend {
    fn read_gamepad(&self, slot: usize) -> Option<RawGamepad> {
        let id = JoystickId::from_i32(i32::try_from(slot).ok()?)?;
        let joystick = self.glfw.get_joystick(id);
        if !joystick.is_present() {
            return None;
        }
        Some(RawGamepad {
            axes: joystick.get_axes(),
            buttons: joystick
                .get_buttons()
                .into_iter()
                .map(|state| state == Action::Press as i32)
                .collect(),
        })
    }
}

impl WindowBackend for GlfwBackend {
    fn is_open(&self) -> bool {
        !self.closed && !self.window.should_close()
    }

    fn mark_closed(&mut self) {
        self.closed = true;
        self.window.set_should_close(true);
        self.window.hide();
    }

    fn context_version(&self) -> (u32, u32) {
        let version = self.window.get_context_version();
        (
            u32::try_from(version.major).unwrap_or(0),
            u32::try_from(version.minor).unwrap_or(0),
        )
    }

    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (clamp_dimension(width), clamp_dimension(height))
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.window.set_size(
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        if fullscreen == self.fullscreen {
            return;
        }
        let (width, height) = self.window.get_size();
        let (width, height) = (clamp_dimension(width), clamp_dimension(height));

        if fullscreen {
            self.windowed_pos = self.window.get_pos();
            let window = &mut self.window;
            let switched = self.glfw.with_primary_monitor(|_, monitor| {
                let Some(monitor) = monitor else {
                    return false;
                };
                let refresh_rate = monitor.get_video_mode().map(|mode| mode.refresh_rate);
                window.set_monitor(
                    glfw::WindowMode::FullScreen(monitor),
                    0,
                    0,
                    width,
                    height,
                    refresh_rate,
                );
                true
            });
            if !switched {
                log::warn!("No primary monitor available, staying windowed");
                return;
            }
        } else {
            let (x, y) = self.windowed_pos;
            self.window
                .set_monitor(glfw::WindowMode::Windowed, x, y, width, height, None);
        }
        self.fullscreen = fullscreen;
    }

    #[allow(unsafe_code)]
    fn clear(&mut self, rgba: [f32; 4]) {
        let [r, g, b, a] = rgba;
        // SAFETY: the context created in `new` is current on this thread and the GL
        // function pointers were loaded right after it was made current.
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        self.glfw.poll_events();
        glfw::flush_messages(&self.events)
            .filter_map(|(_, event)| translate_event(event))
            .collect()
    }
}

fn clamp_dimension(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Map a GLFW window event into the viewer's event shape
///
/// Events the viewer has no use for, key repeats, and keys or buttons without a viewer
/// index yield `None`.
pub fn translate_event(event: WindowEvent) -> Option<PlatformEvent> {
    match event {
        WindowEvent::FramebufferSize(width, height) => Some(PlatformEvent::Resized {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
        }),
        WindowEvent::Close => Some(PlatformEvent::CloseRequested),
        WindowEvent::CursorPos(x, y) => Some(PlatformEvent::CursorMoved { x, y }),
        WindowEvent::Scroll(_, offset) => Some(PlatformEvent::Scrolled { offset }),
        WindowEvent::MouseButton(button, action, _) => Some(PlatformEvent::MouseButton {
            button: translate_mouse_button(button)?,
            down: action_down(action)?,
        }),
        WindowEvent::Key(key, _, action, _) => {
            let Some(index) = translate_key(key) else {
                log::trace!("Dropping key {:?} without a viewer index", key);
                return None;
            };
            Some(PlatformEvent::Key {
                key: index,
                down: action_down(action)?,
            })
        }
        _ => None,
    }
}

const fn action_down(action: Action) -> Option<bool> {
    match action {
        Action::Press => Some(true),
        Action::Release => Some(false),
        Action::Repeat => None,
    }
}

/// Map GLFW's first three mouse buttons to left, right, middle
pub const fn translate_mouse_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Map a GLFW key to a viewer key index
///
/// GLFW numbers printable keys by their ASCII code, so those pass straight through.
pub fn translate_key(key: Key) -> Option<KeyIndex> {
    let code = key as i32;
    if (32..=96).contains(&code) {
        return u32::try_from(code).ok().map(KeyIndex::from_code);
    }

    let f1 = Key::F1 as i32;
    if (f1..=Key::F25 as i32).contains(&code) {
        return KeyIndex::function(u32::try_from(code - f1 + 1).ok()?);
    }
    let kp0 = Key::Kp0 as i32;
    if (kp0..=Key::Kp9 as i32).contains(&code) {
        return KeyIndex::pad_digit(u32::try_from(code - kp0).ok()?);
    }

    let index = match key {
        Key::Escape => KeyIndex::ESC,
        Key::Up => KeyIndex::UP,
        Key::Down => KeyIndex::DOWN,
        Key::Left => KeyIndex::LEFT,
        Key::Right => KeyIndex::RIGHT,
        Key::LeftShift => KeyIndex::LEFT_SHIFT,
        Key::RightShift => KeyIndex::RIGHT_SHIFT,
        Key::LeftControl => KeyIndex::LEFT_CTRL,
        Key::RightControl => KeyIndex::RIGHT_CTRL,
        Key::LeftAlt => KeyIndex::LEFT_ALT,
        Key::RightAlt => KeyIndex::RIGHT_ALT,
        Key::Tab => KeyIndex::TAB,
        Key::Enter => KeyIndex::ENTER,
        Key::Backspace => KeyIndex::BACKSPACE,
        Key::Insert => KeyIndex::INSERT,
        Key::Delete => KeyIndex::DELETE,
        Key::PageUp => KeyIndex::PAGE_UP,
        Key::PageDown => KeyIndex::PAGE_DOWN,
        Key::Home => KeyIndex::HOME,
        Key::End => KeyIndex::END,
        Key::KpDivide => KeyIndex::PAD_DIVIDE,
        Key::KpMultiply => KeyIndex::PAD_MULTIPLY,
        Key::KpSubtract => KeyIndex::PAD_SUBTRACT,
        Key::KpAdd => KeyIndex::PAD_ADD,
        Key::KpDecimal => KeyIndex::PAD_DECIMAL,
        Key::KpEqual => KeyIndex::PAD_EQUAL,
        Key::KpEnter => KeyIndex::PAD_ENTER,
        Key::NumLock => KeyIndex::PAD_NUM_LOCK,
        Key::CapsLock => KeyIndex::CAPS_LOCK,
        Key::ScrollLock => KeyIndex::SCROLL_LOCK,
        Key::Pause => KeyIndex::PAUSE,
        Key::LeftSuper => KeyIndex::LEFT_SUPER,
        Key::RightSuper => KeyIndex::RIGHT_SUPER,
        _ => return None,
    };
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys_keep_ascii_codes() {
        assert_eq!(translate_key(Key::A), KeyIndex::from_char('A'));
        assert_eq!(translate_key(Key::Z), KeyIndex::from_char('Z'));
        assert_eq!(translate_key(Key::Num7), KeyIndex::from_char('7'));
        assert_eq!(translate_key(Key::Space), Some(KeyIndex::SPACE));
        assert_eq!(translate_key(Key::GraveAccent), KeyIndex::from_char('`'));
    }

    #[test]
    fn test_named_keys_use_reserved_block() {
        assert_eq!(translate_key(Key::Escape), Some(KeyIndex::ESC));
        assert_eq!(translate_key(Key::F1), Some(KeyIndex::F1));
        assert_eq!(translate_key(Key::F25), KeyIndex::function(25));
        assert_eq!(translate_key(Key::Kp5), KeyIndex::pad_digit(5));
        assert_eq!(translate_key(Key::Left), Some(KeyIndex::LEFT));
        assert_eq!(translate_key(Key::RightSuper), Some(KeyIndex::RIGHT_SUPER));

        for key in [Key::Escape, Key::F12, Key::Up, Key::KpEnter, Key::Pause] {
            let index = translate_key(key).expect("mapped");
            assert!(!index.is_printable(), "{key:?} landed in printable range");
        }
    }

    #[test]
    fn test_keys_without_index_are_dropped() {
        assert_eq!(translate_key(Key::Menu), None);
        assert_eq!(translate_key(Key::PrintScreen), None);
        assert_eq!(translate_key(Key::Unknown), None);
        assert_eq!(
            translate_event(WindowEvent::Key(Key::Menu, 0, Action::Press, glfw::Modifiers::empty())),
            None
        );
    }

    #[test]
    fn test_key_repeat_is_not_an_edge() {
        let mods = glfw::Modifiers::empty();
        assert_eq!(
            translate_event(WindowEvent::Key(Key::W, 17, Action::Press, mods)),
            Some(PlatformEvent::Key { key: KeyIndex::from_code(u32::from(b'W')), down: true })
        );
        assert_eq!(translate_event(WindowEvent::Key(Key::W, 17, Action::Repeat, mods)), None);
        assert_eq!(
            translate_event(WindowEvent::Key(Key::W, 17, Action::Release, mods)),
            Some(PlatformEvent::Key { key: KeyIndex::from_code(u32::from(b'W')), down: false })
        );
    }

    #[test]
    fn test_mouse_and_window_events() {
        let mods = glfw::Modifiers::empty();
        assert_eq!(
            translate_event(WindowEvent::MouseButton(glfw::MouseButton::Button2, Action::Press, mods)),
            Some(PlatformEvent::MouseButton { button: MouseButton::Right, down: true })
        );
        assert_eq!(
            translate_event(WindowEvent::MouseButton(glfw::MouseButton::Button5, Action::Press, mods)),
            None
        );
        assert_eq!(
            translate_event(WindowEvent::FramebufferSize(800, -1)),
            Some(PlatformEvent::Resized { width: 800, height: 0 })
        );
        assert_eq!(translate_event(WindowEvent::Close), Some(PlatformEvent::CloseRequested));
        assert_eq!(
            translate_event(WindowEvent::Scroll(0.5, -1.0)),
            Some(PlatformEvent::Scrolled { offset: -1.0 })
        );
        assert_eq!(translate_event(WindowEvent::Focus(true)), None);
    }
}
