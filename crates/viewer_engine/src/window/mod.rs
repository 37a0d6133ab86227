//! The main window
//!
//! One [`Window`] exists per UI thread. It owns the platform window and its OpenGL
//! context, the installed view and controller, the input router and the gamepad poller,
//! and drives them all from [`Window::update`].
//!
//! # Lifecycle
//!
//! ```text
//! main_window() ─▶ set_view / set_controller ─▶ open ─▶ update … update ─▶ close
//!                      (silent while hidden)     │                         │
//!                                          view.start               controller.stop
//!                                          view.reset                view.stop
//!                                          controller.start          release context
//! ```
//!
//! Within one update the order is fixed: controller pre-render, view render (or a
//! fallback clear), buffer swap, queued platform events, one gamepad poll.

mod delegate;
mod lifecycle;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::core::config::WindowConfig;
use crate::input::{GamepadPoller, GamepadProfile, InputEvent, InputEventRouter, Routed};
use crate::platform::{
    ContextRequest, GlfwPlatform, Platform, PlatformEvent, WindowBackend, WindowError,
    WindowResult, MIN_CONTEXT_VERSION,
};

pub use delegate::{ControlDelegate, SharedController, SharedView, ViewDelegate};
pub use lifecycle::DelegateState;

use lifecycle::{deliver, hand_over, with_delegate, DelegateSlot, Transition};

/// Clear colour shown while no view is installed
pub const FALLBACK_CLEAR_COLOR: [f32; 4] = [0.25, 0.0, 0.0, 0.0];

thread_local! {
    static MAIN_WINDOW: RefCell<Option<Window>> = const { RefCell::new(None) };
}

struct WindowState {
    platform: RefCell<Box<dyn Platform>>,
    backend: RefCell<Option<Box<dyn WindowBackend>>>,
    view: RefCell<DelegateSlot<dyn ViewDelegate>>,
    controller: RefCell<DelegateSlot<dyn ControlDelegate>>,
    router: RefCell<InputEventRouter>,
    gamepads: RefCell<GamepadPoller>,
    /// Delegates have been started and not yet stopped
    active: Cell<bool>,
    stopping: Cell<bool>,
}

/// Handle to the main window
///
/// Cloning is cheap and every clone refers to the same window. Obtain it through
/// [`Window::main_window`].
///
/// # Thread Safety
/// Not `Send`: the windowing library must be driven from the thread that created the
/// window, so each thread sees its own main window.
#[derive(Clone)]
pub struct Window {
    state: Rc<WindowState>,
}

impl Window {
    fn new() -> Self {
        Self {
            state: Rc::new(WindowState {
                platform: RefCell::new(Box::new(GlfwPlatform)),
                backend: RefCell::new(None),
                view: RefCell::new(DelegateSlot::new()),
                controller: RefCell::new(DelegateSlot::new()),
                router: RefCell::new(InputEventRouter::new()),
                gamepads: RefCell::new(GamepadPoller::default()),
                active: Cell::new(false),
                stopping: Cell::new(false),
            }),
        }
    }

    /// The main window of this thread, created on first access
    ///
    /// Creation only allocates; the OS window appears with [`open`](Self::open). After
    /// [`close`](Self::close) the next call creates a fresh window with no delegates.
    pub fn main_window() -> Self {
        MAIN_WINDOW.with(|slot| {
            slot.borrow_mut()
                .get_or_insert_with(|| {
                    log::debug!("Creating main window");
                    Self::new()
                })
                .clone()
        })
    }

    /// Replace the factory used by the next [`open`](Self::open)
    pub fn set_platform(&self, platform: Box<dyn Platform>) {
        if self.state.backend.borrow().is_some() {
            log::warn!("Platform replaced while open; it takes effect after close");
        }
        *self.state.platform.borrow_mut() = platform;
    }

    /// Replace the gamepad normalization profile
    pub fn set_gamepad_profile(&self, profile: GamepadProfile) {
        self.state.gamepads.borrow_mut().set_profile(profile);
    }

    /// Create the OS window with an OpenGL 3.3 core context
    ///
    /// `sample_count` is the MSAA level of the default framebuffer. On success any
    /// installed view is started and told the current size, then any installed
    /// controller is started.
    ///
    /// # Errors
    /// - [`WindowError::AlreadyOpen`] if a platform window already exists, including one
    ///   the user closed; call [`close`](Self::close) first
    /// - [`WindowError::InitializationFailed`] / [`WindowError::CreationFailed`] from the
    ///   platform
    /// - [`WindowError::UnsupportedContext`] if the context is older than 3.3; the
    ///   window is destroyed again before returning
    pub fn open(
        &self,
        width: u32,
        height: u32,
        sample_count: u32,
        windowed: bool,
    ) -> WindowResult<()> {
        self.open_request(&ContextRequest::new(width, height, sample_count, windowed))
    }

    /// [`open`](Self::open) with size, samples, mode and title from `config`
    ///
    /// # Errors
    /// Same as [`open`](Self::open).
    pub fn open_with_config(&self, config: &WindowConfig) -> WindowResult<()> {
        let request = ContextRequest::new(
            config.width,
            config.height,
            config.sample_count,
            config.windowed,
        )
        .with_title(config.title.as_str());
        self.open_request(&request)
    }

    fn open_request(&self, request: &ContextRequest) -> WindowResult<()> {
        if self.state.backend.borrow().is_some() {
            return Err(WindowError::AlreadyOpen);
        }

        log::info!(
            "Opening {}x{} {} window with {} samples",
            request.width,
            request.height,
            if request.windowed { "windowed" } else { "fullscreen" },
            request.sample_count
        );
        let backend = self
            .state
            .platform
            .borrow_mut()
            .create_window(request)
            .inspect_err(|e| log::error!("Window creation failed: {}", e))?;

        let (major, minor) = backend.context_version();
        if (major, minor) < MIN_CONTEXT_VERSION {
            log::error!("OpenGL {}.{} context is too old, releasing window", major, minor);
            drop(backend);
            return Err(WindowError::UnsupportedContext { major, minor });
        }
        log::info!("OpenGL {}.{} context ready", major, minor);

        *self.state.backend.borrow_mut() = Some(backend);
        self.state.router.borrow_mut().reset();
        self.start_delegates();
        Ok(())
    }

    /// Whether the window is open and not closed by the user
    pub fn is_visible(&self) -> bool {
        self.state
            .backend
            .borrow()
            .as_ref()
            .is_some_and(|backend| backend.is_open())
    }

    /// Run one frame
    ///
    /// Does nothing while the window is not visible.
    pub fn update(&self) {
        if !self.is_visible() {
            return;
        }

        if let Some(controller) = self.controller() {
            self.notify(&controller, "controller", |c| c.view_will_render(self));
        }
        // The controller may have closed the window
        if !self.state.active.get() {
            return;
        }
        match self.view() {
            Some(view) => {
                self.notify(&view, "view", |v| v.render(self));
            }
            None => {
                self.try_backend(|backend| backend.clear(FALLBACK_CLEAR_COLOR));
            }
        }

        let events = self
            .try_backend(|backend| {
                backend.swap_buffers();
                backend.poll_events()
            })
            .unwrap_or_default();
        for event in events {
            self.handle_event(event);
        }

        // A close request in this frame has already stopped the delegates
        if self.state.active.get() {
            self.poll_gamepads();
        }
    }

    /// Stop the delegates and release the platform window
    ///
    /// If this is the thread's main window, the next [`main_window`](Self::main_window)
    /// call creates a new one.
    pub fn close(&self) {
        self.stop_delegates();

        // Take first so no borrow is held while the backend tears down
        let backend = self.state.backend.borrow_mut().take();
        if let Some(backend) = backend {
            log::info!("Closing window");
            drop(backend);
        }

        let cleared = MAIN_WINDOW.try_with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot
                .as_ref()
                .is_some_and(|main| Rc::ptr_eq(&main.state, &self.state))
            {
                *slot = None;
            }
        });
        if cleared.is_err() {
            log::debug!("Main window slot already destroyed");
        }
    }

    /// Resize the usable area; views are told on the next update
    pub fn resize(&self, width: u32, height: u32) {
        self.with_open_backend("resize", |backend| backend.set_size(width, height));
    }

    /// Set the title bar text
    pub fn set_title(&self, title: &str) {
        self.with_open_backend("set_title", |backend| backend.set_title(title));
    }

    /// Switch between fullscreen on the primary monitor and windowed mode
    pub fn set_fullscreen(&self, fullscreen: bool) {
        self.with_open_backend("set_fullscreen", |backend| {
            backend.set_fullscreen(fullscreen);
        });
    }

    /// Clear the colour buffer; intended for use from [`ViewDelegate::render`]
    pub fn clear(&self, rgba: [f32; 4]) {
        self.with_open_backend("clear", |backend| backend.clear(rgba));
    }

    /// Drawable area size, or `None` before open
    pub fn size(&self) -> Option<(u32, u32)> {
        self.try_backend(|backend| backend.size())
    }

    /// The installed view
    pub fn view(&self) -> Option<SharedView> {
        self.state.view.borrow().get()
    }

    /// The installed controller
    pub fn controller(&self) -> Option<SharedController> {
        self.state.controller.borrow().get()
    }

    /// Lifecycle state of the view slot
    pub fn view_state(&self) -> DelegateState {
        self.state.view.borrow().state(self.state.active.get())
    }

    /// Lifecycle state of the controller slot
    pub fn controller_state(&self) -> DelegateState {
        self.state.controller.borrow().state(self.state.active.get())
    }

    /// Install `view`, or remove the current one with `None`
    ///
    /// On a visible window the old view is stopped, then the new one is started and
    /// reset to the current size. On a hidden window nothing is called until
    /// [`open`](Self::open). Installing the current view again does nothing.
    pub fn set_view(&self, view: Option<SharedView>) {
        let (width, height) = self.size().unwrap_or_default();
        hand_over(
            &self.state.view,
            view,
            self.state.active.get(),
            "view",
            |old| old.stop(self),
            |new| {
                new.start(self);
                new.reset(self, width, height);
            },
        );
        self.deliver_deferred();
    }

    /// Install `controller`, or remove the current one with `None`
    ///
    /// Same start/stop rules as [`set_view`](Self::set_view), without the reset.
    pub fn set_controller(&self, controller: Option<SharedController>) {
        hand_over(
            &self.state.controller,
            controller,
            self.state.active.get(),
            "controller",
            |old| old.stop(self),
            |new| new.start(self),
        );
        self.deliver_deferred();
    }

    fn start_delegates(&self) {
        self.state.active.set(true);

        if let Some(view) = self.view() {
            log::debug!("Starting view");
            self.view_transition(&view, Transition::Start);
        }
        if let Some(controller) = self.controller() {
            log::debug!("Starting controller");
            self.controller_transition(&controller, Transition::Start);
        }
        self.deliver_deferred();
    }

    /// Controller first, so a controller that removes its view while stopping still
    /// leaves exactly one view stop.
    fn stop_delegates(&self) {
        if !self.state.active.get() || self.state.stopping.replace(true) {
            return;
        }

        if let Some(controller) = self.controller() {
            log::debug!("Stopping controller");
            self.controller_transition(&controller, Transition::Stop);
        }
        if let Some(view) = self.view() {
            log::debug!("Stopping view");
            self.view_transition(&view, Transition::Stop);
        }

        self.state.active.set(false);
        self.state.stopping.set(false);
        self.deliver_deferred();
    }

    fn view_transition(&self, view: &SharedView, transition: Transition) {
        let (width, height) = self.size().unwrap_or_default();
        deliver(&self.state.view, view, transition, "view", |v| match transition {
            Transition::Start => {
                v.start(self);
                v.reset(self, width, height);
            }
            Transition::Stop => v.stop(self),
        });
    }

    fn controller_transition(&self, controller: &SharedController, transition: Transition) {
        deliver(
            &self.state.controller,
            controller,
            transition,
            "controller",
            |c| match transition {
                Transition::Start => c.start(self),
                Transition::Stop => c.stop(self),
            },
        );
    }

    /// Hand queued starts and stops to delegates whose callbacks have returned
    ///
    /// Delegates still inside a callback stay queued for a later call.
    fn deliver_deferred(&self) {
        let views = self.state.view.borrow_mut().take_deferred();
        for (view, transition) in views {
            self.view_transition(&view, transition);
        }
        let controllers = self.state.controller.borrow_mut().take_deferred();
        for (controller, transition) in controllers {
            self.controller_transition(&controller, transition);
        }
    }

    /// Run a delegate callback, then deliver the transitions it caused on itself
    fn notify<D: ?Sized>(&self, delegate: &Rc<RefCell<D>>, role: &str, f: impl FnOnce(&mut D)) {
        with_delegate(delegate, role, f);
        self.deliver_deferred();
    }

    fn handle_event(&self, event: PlatformEvent) {
        let routed = self.state.router.borrow_mut().route(event);
        if !self.state.active.get() {
            log::trace!("Dropping {:?} after delegates stopped", routed);
            return;
        }

        match routed {
            Routed::ViewReset { width, height } => {
                if let Some(view) = self.view() {
                    self.notify(&view, "view", |v| v.reset(self, width, height));
                }
            }
            Routed::Close => {
                log::info!("Close requested");
                self.stop_delegates();
                self.try_backend(|backend| backend.mark_closed());
            }
            Routed::Control(input) => self.dispatch(input),
        }
    }

    fn poll_gamepads(&self) {
        let events = {
            let backend = self.state.backend.borrow();
            let Some(backend) = backend.as_deref() else {
                return;
            };
            self.state.gamepads.borrow_mut().poll(backend)
        };

        for input in events {
            // A callback may have closed the window mid-batch
            if !self.state.active.get() {
                break;
            }
            self.dispatch(input);
        }
    }

    fn dispatch(&self, input: InputEvent) {
        if let Some(controller) = self.controller() {
            self.notify(&controller, "controller", |c| input.dispatch(c, self));
        }
    }

    fn try_backend<R>(&self, f: impl FnOnce(&mut dyn WindowBackend) -> R) -> Option<R> {
        let mut backend = self.state.backend.borrow_mut();
        let backend = backend.as_deref_mut()?;
        Some(f(backend))
    }

    fn with_open_backend(&self, operation: &str, f: impl FnOnce(&mut dyn WindowBackend)) {
        if self.try_backend(f).is_none() {
            log::warn!("Window::{} called before open, ignoring", operation);
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("open", &self.state.backend.borrow().is_some())
            .field("visible", &self.is_visible())
            .field("view", &self.view_state())
            .field("controller", &self.controller_state())
            .finish_non_exhaustive()
    }
}
