//! Document-level keyboard dispatch shared by every canvas on a page.
//!
//! Each mounted canvas holds a [`KeyboardRegistration`]; dropping it removes
//! the listener. Key events reach only the focused instance, so several
//! canvases in one document never react to the same key press.

use sketchblock_core::input::{KeyEvent, KeyOutcome};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Identity of one registered canvas instance.
pub type InstanceId = u64;

type Handler = Rc<RefCell<dyn FnMut(&KeyEvent) -> KeyOutcome>>;

#[derive(Default)]
struct HubInner {
    handlers: BTreeMap<InstanceId, Handler>,
    focused: Option<InstanceId>,
    next_id: InstanceId,
}

/// Keyboard dispatcher. Clones share the same registrations.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays active until the returned guard drops.
    pub fn register(&self, handler: impl FnMut(&KeyEvent) -> KeyOutcome + 'static) -> KeyboardRegistration {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let handler: Handler = Rc::new(RefCell::new(handler));
        inner.handlers.insert(id, handler);
        log::debug!("Keyboard listener {} registered", id);

        KeyboardRegistration {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Route subsequent key events to `id`.
    pub fn focus(&self, id: InstanceId) {
        let mut inner = self.inner.borrow_mut();
        if inner.handlers.contains_key(&id) {
            inner.focused = Some(id);
        }
    }

    /// Drop focus if `id` holds it.
    pub fn blur(&self, id: InstanceId) {
        let mut inner = self.inner.borrow_mut();
        if inner.focused == Some(id) {
            inner.focused = None;
        }
    }

    pub fn focused(&self) -> Option<InstanceId> {
        self.inner.borrow().focused
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().handlers.is_empty()
    }

    /// Deliver a key event to the focused instance.
    pub fn dispatch(&self, event: &KeyEvent) -> KeyOutcome {
        // Release the hub borrow before calling out; handlers may touch the hub.
        let handler = {
            let inner = self.inner.borrow();
            match inner.focused.and_then(|id| inner.handlers.get(&id)) {
                Some(handler) => Rc::clone(handler),
                None => return KeyOutcome::Ignored,
            }
        };

        let Ok(mut handler) = handler.try_borrow_mut() else {
            log::warn!("Re-entrant key dispatch for '{}' ignored", event.key);
            return KeyOutcome::Ignored;
        };
        (&mut *handler)(event)
    }
}

/// Scoped keyboard listener. Unregisters on drop.
pub struct KeyboardRegistration {
    id: InstanceId,
    hub: Weak<RefCell<HubInner>>,
}

impl KeyboardRegistration {
    pub fn id(&self) -> InstanceId {
        self.id
    }
}

impl Drop for KeyboardRegistration {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let Ok(mut inner) = hub.try_borrow_mut() else {
            log::error!("Keyboard listener {} dropped during dispatch", self.id);
            return;
        };
        inner.handlers.remove(&self.id);
        if inner.focused == Some(self.id) {
            inner.focused = None;
        }
        log::debug!("Keyboard listener {} released", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting(hub: &KeyboardHub) -> (KeyboardRegistration, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let registration = hub.register(move |_| {
            seen.set(seen.get() + 1);
            KeyOutcome::Consumed
        });
        (registration, count)
    }

    #[test]
    fn test_only_focused_instance_receives_keys() {
        let hub = KeyboardHub::new();
        let (first, first_count) = counting(&hub);
        let (second, second_count) = counting(&hub);
        let escape = KeyEvent::new("Escape");

        assert_eq!(hub.dispatch(&escape), KeyOutcome::Ignored);

        hub.focus(first.id());
        assert_eq!(hub.dispatch(&escape), KeyOutcome::Consumed);
        hub.focus(second.id());
        hub.dispatch(&escape);
        hub.dispatch(&escape);

        assert_eq!(first_count.get(), 1);
        assert_eq!(second_count.get(), 2);
    }

    #[test]
    fn test_drop_unregisters() {
        let hub = KeyboardHub::new();
        let (registration, count) = counting(&hub);
        let id = registration.id();
        hub.focus(id);
        assert_eq!(hub.len(), 1);

        drop(registration);

        assert!(hub.is_empty());
        assert_eq!(hub.focused(), None);
        assert_eq!(hub.dispatch(&KeyEvent::new("Escape")), KeyOutcome::Ignored);
        assert_eq!(count.get(), 0);

        // Focusing a released id has no effect.
        hub.focus(id);
        assert_eq!(hub.focused(), None);
    }

    #[test]
    fn test_blur_only_clears_own_focus() {
        let hub = KeyboardHub::new();
        let (first, _) = counting(&hub);
        let (second, _) = counting(&hub);

        hub.focus(first.id());
        hub.blur(second.id());
        assert_eq!(hub.focused(), Some(first.id()));
        hub.blur(first.id());
        assert_eq!(hub.focused(), None);
    }

    #[test]
    fn test_registration_outlives_hub() {
        let hub = KeyboardHub::new();
        let (registration, _) = counting(&hub);
        drop(hub);
        drop(registration);
    }
}
