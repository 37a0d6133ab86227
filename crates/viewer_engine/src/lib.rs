//! # Viewer Engine
//!
//! Window lifecycle and input dispatch for a real-time 3D scene viewer.
//!
//! ## Features
//!
//! - **Single main window**: one OpenGL 3.3 window per UI thread, reachable through
//!   [`Window::main_window`]
//! - **Pluggable delegates**: a [`ViewDelegate`] renders, a [`ControlDelegate`] reacts to
//!   input, and both are started and stopped as the window opens, closes or swaps them
//! - **Uniform input**: mouse, keyboard and up to two gamepads arrive as discrete calls on
//!   the control delegate, with gamepad edges synthesized from polled state
//! - **Replaceable platform**: the GLFW backend sits behind the [`platform::Platform`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use viewer_engine::prelude::*;
//!
//! struct Blank;
//!
//! impl ViewDelegate for Blank {
//!     fn render(&mut self, window: &Window) {
//!         window.clear([0.1, 0.1, 0.2, 1.0]);
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = Window::main_window();
//!     window.set_view(Some(Rc::new(RefCell::new(Blank))));
//!     window.open(1024, 576, 4, true)?;
//!     while window.is_visible() {
//!         window.update();
//!     }
//!     window.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod config;
pub mod foundation;
pub mod input;
pub mod platform;
pub mod window;

pub use platform::{WindowError, WindowResult};
pub use window::{ControlDelegate, ViewDelegate, Window};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ViewerConfig, WindowConfig},
        config::{Config, ConfigError},
        foundation::{cache::Cached, time::Timer},
        input::{
            gamepad::{GamepadProfile, TriggerSplit},
            GamepadAxis, GamepadButton, KeyIndex, MouseButton,
        },
        window::{
            ControlDelegate, DelegateState, SharedController, SharedView, ViewDelegate, Window,
        },
        WindowError, WindowResult,
    };
}
