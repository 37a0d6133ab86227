//! Platform windowing seam
//!
//! The [`Window`](crate::window::Window) never talks to the operating system directly.
//! It asks a [`Platform`] to create a [`WindowBackend`] (an OS window plus its OpenGL
//! context) and then drives that backend once per frame.
//!
//! # Module Organization
//!
//! - **`glfw_window`**: the production backend, built on the `glfw` crate
//! - **`scripted`** (tests only): an in-memory backend driven by test code
//!
//! Backends translate their native events into [`PlatformEvent`] before handing them
//! over, so key and button index spaces are already normalized at this boundary.

pub mod glfw_window;
#[cfg(test)]
pub(crate) mod scripted;

use thiserror::Error;

use crate::input::{KeyIndex, MouseButton};

pub use glfw_window::GlfwPlatform;

/// Lowest OpenGL version the viewer can render with
pub const MIN_CONTEXT_VERSION: (u32, u32) = (3, 3);

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library could not be initialized
    #[error("Windowing system initialization failed")]
    InitializationFailed,

    /// The OS window or its context could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// The created context is older than [`MIN_CONTEXT_VERSION`]
    #[error("OpenGL {major}.{minor} context is below the required 3.3")]
    UnsupportedContext {
        /// Reported major version
        major: u32,
        /// Reported minor version
        minor: u32,
    },

    /// `open` was called on a window that is already open
    #[error("Window is already open")]
    AlreadyOpen,
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Parameters for creating the OS window and its context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRequest {
    /// Preferred usable width
    pub width: u32,
    /// Preferred usable height
    pub height: u32,
    /// MSAA samples for the default framebuffer (0 disables)
    pub sample_count: u32,
    /// Desktop window rather than fullscreen
    pub windowed: bool,
    /// Initial title
    pub title: String,
    /// Requested OpenGL version
    pub version: (u32, u32),
    /// Ask for a debug context
    pub debug: bool,
}

impl ContextRequest {
    /// Request an OpenGL 3.3 core context, with a debug context in debug builds
    pub fn new(width: u32, height: u32, sample_count: u32, windowed: bool) -> Self {
        Self {
            width,
            height,
            sample_count,
            windowed,
            title: "Scene Viewer".to_string(),
            version: MIN_CONTEXT_VERSION,
            debug: cfg!(debug_assertions),
        }
    }

    /// Set the initial title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Native window event, already mapped into viewer index spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// Drawable area changed size (pixels)
    Resized {
        /// New width
        width: u32,
        /// New height
        height: u32,
    },
    /// The user asked to close the window
    CloseRequested,
    /// Cursor position in window coordinates, y downwards
    CursorMoved {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Vertical wheel offset since the previous scroll event
    Scrolled {
        /// Offset in wheel steps
        offset: f64,
    },
    /// Mouse button pressed or released
    MouseButton {
        /// Which button
        button: MouseButton,
        /// Pressed when true
        down: bool,
    },
    /// Keyboard key pressed or released
    Key {
        /// Viewer key index
        key: KeyIndex,
        /// Pressed when true
        down: bool,
    },
}

/// Continuous state of one gamepad as read from the platform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGamepad {
    /// Axis positions, typically in [-1, 1]
    pub axes: Vec<f32>,
    /// Button states, pressed when true
    pub buttons: Vec<bool>,
}

/// Anything that can report gamepad state by slot
pub trait GamepadSource {
    /// Read the gamepad in `slot`, or `None` when no device is present
    fn read_gamepad(&self, slot: usize) -> Option<RawGamepad>;
}

/// An open OS window with a current OpenGL context
///
/// Dropping the backend releases the window and its context.
///
/// # Thread Safety
/// Not `Send`: windowing libraries expect every call on the thread that created the
/// window.
pub trait WindowBackend: GamepadSource {
    /// Whether the window is still shown (no close has been honoured)
    fn is_open(&self) -> bool;

    /// Hide the window and report it as closed from now on
    fn mark_closed(&mut self);

    /// OpenGL version of the created context
    fn context_version(&self) -> (u32, u32);

    /// Drawable area size in pixels
    fn size(&self) -> (u32, u32);

    /// Resize the usable area
    fn set_size(&mut self, width: u32, height: u32);

    /// Set the title bar text
    fn set_title(&mut self, title: &str);

    /// Switch between fullscreen and windowed mode
    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Clear the colour buffer to `rgba`
    fn clear(&mut self, rgba: [f32; 4]);

    /// Present the back buffer, possibly waiting for vertical sync
    fn swap_buffers(&mut self);

    /// Collect the events queued since the previous call, in arrival order
    fn poll_events(&mut self) -> Vec<PlatformEvent>;
}

/// Factory for [`WindowBackend`]s
pub trait Platform {
    /// Create the OS window and context described by `request`
    ///
    /// # Errors
    /// [`WindowError::InitializationFailed`] or [`WindowError::CreationFailed`] when the
    /// windowing system or the window cannot be brought up. Partially created resources
    /// are released before returning.
    fn create_window(&mut self, request: &ContextRequest) -> WindowResult<Box<dyn WindowBackend>>;
}
