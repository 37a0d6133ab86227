//! Delegate slots and their start/stop transitions
//!
//! Each slot is in one of three states. The window's `active` flag (delegates have been
//! started and not yet stopped) decides whether an installed delegate is merely attached
//! or live:
//!
//! ```text
//!   Detached ──install──▶ AttachedInvisible ──open──▶ AttachedActive
//!      ▲                                                   │
//!      └──────────── replace / close (stop fires) ─────────┘
//! ```
//!
//! Callbacks never run while a `RefCell` borrow of the slot is held, so delegates can
//! call back into the window freely. A start or stop aimed at a delegate that is inside
//! one of its own callbacks is queued on the slot and delivered, in order, once that
//! callback returns.

use std::cell::RefCell;
use std::rc::Rc;

/// Where a delegate slot stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateState {
    /// Nothing installed
    Detached,
    /// Installed, waiting for the window to become visible
    AttachedInvisible,
    /// Installed and started
    AttachedActive,
}

/// Lifecycle call on a delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Start,
    Stop,
}

/// Holds the currently installed delegate, if any
pub(crate) struct DelegateSlot<D: ?Sized> {
    delegate: Option<Rc<RefCell<D>>>,
    /// Transitions waiting for their delegate's callback to return
    deferred: Vec<(Rc<RefCell<D>>, Transition)>,
}

impl<D: ?Sized> DelegateSlot<D> {
    pub(crate) const fn new() -> Self {
        Self {
            delegate: None,
            deferred: Vec::new(),
        }
    }

    /// Another handle to the installed delegate
    pub(crate) fn get(&self) -> Option<Rc<RefCell<D>>> {
        self.delegate.clone()
    }

    pub(crate) const fn state(&self, active: bool) -> DelegateState {
        match (self.delegate.is_some(), active) {
            (false, _) => DelegateState::Detached,
            (true, false) => DelegateState::AttachedInvisible,
            (true, true) => DelegateState::AttachedActive,
        }
    }

    /// Whether `candidate` is the very delegate already installed
    ///
    /// Compares allocations only; vtable pointers of the same type may differ between
    /// codegen units.
    pub(crate) fn holds(&self, candidate: Option<&Rc<RefCell<D>>>) -> bool {
        match (&self.delegate, candidate) {
            (None, None) => true,
            (Some(current), Some(candidate)) => {
                Rc::as_ptr(current).cast::<()>() == Rc::as_ptr(candidate).cast::<()>()
            }
            _ => false,
        }
    }

    fn set(&mut self, delegate: Option<Rc<RefCell<D>>>) {
        self.delegate = delegate;
    }

    /// Queued transitions, oldest first, leaving the queue empty
    pub(crate) fn take_deferred(&mut self) -> Vec<(Rc<RefCell<D>>, Transition)> {
        std::mem::take(&mut self.deferred)
    }

    fn is_deferring(&self, delegate: &Rc<RefCell<D>>) -> bool {
        self.deferred
            .iter()
            .any(|(queued, _)| Rc::as_ptr(queued).cast::<()>() == Rc::as_ptr(delegate).cast::<()>())
    }
}

/// Swap the delegate in `slot` for `incoming`
///
/// While `active`, the outgoing delegate is stopped before detachment and the incoming
/// one started after attachment. Otherwise the swap is silent. Installing the delegate
/// that is already there does nothing.
pub(crate) fn hand_over<D: ?Sized>(
    slot: &RefCell<DelegateSlot<D>>,
    incoming: Option<Rc<RefCell<D>>>,
    active: bool,
    role: &str,
    stop: impl FnOnce(&mut D),
    start: impl FnOnce(&mut D),
) {
    if slot.borrow().holds(incoming.as_ref()) {
        log::debug!("Ignoring reinstall of the current {role}");
        return;
    }

    let outgoing = slot.borrow().get();
    if active {
        if let Some(outgoing) = &outgoing {
            log::debug!("Stopping outgoing {role}");
            deliver(slot, outgoing, Transition::Stop, role, stop);
        }
    }

    slot.borrow_mut().set(incoming.clone());

    if active {
        if let Some(incoming) = &incoming {
            log::debug!("Starting incoming {role}");
            deliver(slot, incoming, Transition::Start, role, start);
        }
    } else {
        log::debug!("Installed {role} on invisible window");
    }
}

/// Apply `transition` to `delegate` through `f`, or queue it on `slot`
///
/// The transition is queued when the delegate is mid-callback, or when earlier
/// transitions for it are still queued, so start and stop keep their order.
pub(crate) fn deliver<D: ?Sized>(
    slot: &RefCell<DelegateSlot<D>>,
    delegate: &Rc<RefCell<D>>,
    transition: Transition,
    role: &str,
    f: impl FnOnce(&mut D),
) {
    let queued = slot.borrow().is_deferring(delegate);
    match delegate.try_borrow_mut() {
        Ok(mut borrowed) if !queued => f(&mut *borrowed),
        _ => {
            log::debug!("Deferring {role} {transition:?} until its callback returns");
            slot.borrow_mut()
                .deferred
                .push((Rc::clone(delegate), transition));
        }
    }
}

/// Run `f` on a mutably borrowed delegate
///
/// A delegate that is already borrowed is re-entering itself through the window; the
/// call is skipped and logged rather than panicking.
pub(crate) fn with_delegate<D: ?Sized, R>(
    delegate: &Rc<RefCell<D>>,
    role: &str,
    f: impl FnOnce(&mut D) -> R,
) -> Option<R> {
    match delegate.try_borrow_mut() {
        Ok(mut borrowed) => Some(f(&mut *borrowed)),
        Err(_) => {
            log::error!("Skipping re-entrant {role} callback");
            None
        }
    }
}
