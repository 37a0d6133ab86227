//! In-memory platform for driving the window from tests
//!
//! A [`ScriptedPlatform`] hands out [`ScriptedBackend`]s that share one [`Script`] with
//! the test. The test queues events, plugs gamepads and inspects what the window did;
//! every visible platform action is appended to a [`Journal`] that delegates can write to
//! as well, so cross-component ordering can be asserted on a single list.

use std::cell::RefCell;
use std::rc::Rc;

use super::{
    ContextRequest, GamepadSource, Platform, PlatformEvent, RawGamepad, WindowBackend,
    WindowError, WindowResult, MIN_CONTEXT_VERSION,
};
use crate::input::gamepad::MAX_GAMEPADS;

/// Ordered record of calls shared between the platform and test delegates
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub(crate) fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Return and forget everything recorded so far
    pub(crate) fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Platform state the test controls
#[derive(Debug)]
pub(crate) struct Script {
    pub fail_creation: bool,
    pub context_version: (u32, u32),
    pub size: (u32, u32),
    pub pending: Vec<PlatformEvent>,
    pub gamepads: [Option<RawGamepad>; MAX_GAMEPADS],
    pub gamepad_reads: usize,
    pub swaps: usize,
    pub clears: Vec<[f32; 4]>,
    pub titles: Vec<String>,
    pub fullscreen: bool,
    pub closed: bool,
    pub live_backends: usize,
    pub last_request: Option<ContextRequest>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            fail_creation: false,
            context_version: MIN_CONTEXT_VERSION,
            size: (0, 0),
            pending: Vec::new(),
            gamepads: Default::default(),
            gamepad_reads: 0,
            swaps: 0,
            clears: Vec::new(),
            titles: Vec::new(),
            fullscreen: false,
            closed: false,
            live_backends: 0,
            last_request: None,
        }
    }
}

/// Window factory backed by a shared [`Script`]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedPlatform {
    script: Rc<RefCell<Script>>,
    journal: Journal,
}

impl ScriptedPlatform {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            script: Rc::default(),
            journal,
        }
    }

    /// Mutable access to the shared script
    pub(crate) fn script(&self) -> std::cell::RefMut<'_, Script> {
        self.script.borrow_mut()
    }

    /// Queue events for the next `poll_events`
    pub(crate) fn push_events(&self, events: impl IntoIterator<Item = PlatformEvent>) {
        self.script.borrow_mut().pending.extend(events);
    }

    pub(crate) fn set_gamepad(&self, slot: usize, axes: &[f32], buttons: &[bool]) {
        self.script.borrow_mut().gamepads[slot] = Some(RawGamepad {
            axes: axes.to_vec(),
            buttons: buttons.to_vec(),
        });
    }
}

impl Platform for ScriptedPlatform {
    fn create_window(&mut self, request: &ContextRequest) -> WindowResult<Box<dyn WindowBackend>> {
        let mut script = self.script.borrow_mut();
        script.last_request = Some(request.clone());
        if script.fail_creation {
            return Err(WindowError::CreationFailed);
        }
        script.size = (request.width, request.height);
        script.fullscreen = !request.windowed;
        script.closed = false;
        script.live_backends += 1;
        self.journal.push("platform.create");

        Ok(Box::new(ScriptedBackend {
            script: Rc::clone(&self.script),
            journal: self.journal.clone(),
        }))
    }
}

/// Open "window" whose behaviour comes from the shared [`Script`]
#[derive(Debug)]
pub(crate) struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
    journal: Journal,
}

impl GamepadSource for ScriptedBackend {
    fn read_gamepad(&self, slot: usize) -> Option<RawGamepad> {
        let mut script = self.script.borrow_mut();
        script.gamepad_reads += 1;
        script.gamepads.get(slot).cloned().flatten()
    }
}

impl WindowBackend for ScriptedBackend {
    fn is_open(&self) -> bool {
        !self.script.borrow().closed
    }

    fn mark_closed(&mut self) {
        self.script.borrow_mut().closed = true;
        self.journal.push("platform.hide");
    }

    fn context_version(&self) -> (u32, u32) {
        self.script.borrow().context_version
    }

    fn size(&self) -> (u32, u32) {
        self.script.borrow().size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let mut script = self.script.borrow_mut();
        script.size = (width, height);
        // Real platforms report the new framebuffer size on the next event pump
        script.pending.push(PlatformEvent::Resized { width, height });
    }

    fn set_title(&mut self, title: &str) {
        self.script.borrow_mut().titles.push(title.to_string());
        self.journal.push(format!("platform.title {title}"));
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.script.borrow_mut().fullscreen = fullscreen;
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        self.script.borrow_mut().clears.push(rgba);
        self.journal.push("platform.clear");
    }

    fn swap_buffers(&mut self) {
        self.script.borrow_mut().swaps += 1;
        self.journal.push("platform.swap");
    }

    fn poll_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.script.borrow_mut().pending)
    }
}

impl Drop for ScriptedBackend {
    fn drop(&mut self) {
        self.script.borrow_mut().live_backends -= 1;
        self.journal.push("platform.release");
    }
}
