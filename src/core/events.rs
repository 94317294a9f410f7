//! Change notification between the store and whatever displays it
//!
//! The notifier is a cheap, cloneable handle. Every component that needs to
//! publish or observe changes receives a clone at construction time; there is
//! no process-wide instance.
//!
//! Dispatch is synchronous and in registration order. An observer that fails
//! is logged and reported back to the publisher, and the remaining observers
//! still run.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

/// Fixed set of event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Items were added, edited, removed, imported or reloaded
    InventoryChanged,
    /// The location set changed
    LocationsChanged,
    /// Display theme switched
    ThemeChanged,
    /// A save or restore completed successfully
    DataPersisted,
    /// The unsaved-changes flag flipped
    UnsavedFlagChanged,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::InventoryChanged,
        EventKind::LocationsChanged,
        EventKind::ThemeChanged,
        EventKind::DataPersisted,
        EventKind::UnsavedFlagChanged,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::InventoryChanged => write!(f, "inventory-changed"),
            EventKind::LocationsChanged => write!(f, "locations-changed"),
            EventKind::ThemeChanged => write!(f, "theme-changed"),
            EventKind::DataPersisted => write!(f, "data-persisted"),
            EventKind::UnsavedFlagChanged => write!(f, "unsaved-flag-changed"),
        }
    }
}

/// How data reached a persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistKind {
    Saved,
    Restored,
}

/// What changed, carried alongside the event kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    ItemAdded(u32),
    ItemUpdated(u32),
    ItemRemoved(u32),
    ItemsImported { count: usize },
    ItemsReplaced { count: usize },
    LocationAdded(String),
    LocationRemoved(String),
    LocationsReplaced { count: usize },
    Persisted(PersistKind),
    Unsaved(bool),
    Theme(String),
}

/// A published event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Payload,
}

/// Error returned by an observer
pub type ObserverError = Box<dyn std::error::Error>;

/// Something that reacts to published events
///
/// Observers take `&self`; keep any state that changes on notification in a
/// `Cell`/`RefCell`.
pub trait Observer {
    fn notify(&self, event: &Event) -> Result<(), ObserverError>;
}

/// Adapter so plain closures can observe
pub struct FnObserver<F>(pub F);

impl<F> Observer for FnObserver<F>
where
    F: Fn(&Event) -> Result<(), ObserverError>,
{
    fn notify(&self, event: &Event) -> Result<(), ObserverError> {
        (self.0)(event)
    }
}

/// A failure caught while dispatching
#[derive(Debug)]
pub struct DispatchFailure {
    pub kind: EventKind,
    /// Position of the failing observer in the dispatch order
    pub position: usize,
    pub message: String,
}

type Registry = HashMap<EventKind, Vec<Rc<dyn Observer>>>;

/// Shared publish/subscribe handle
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    observers: Rc<RefCell<Registry>>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.observers.borrow();
        let mut dbg = f.debug_struct("ChangeNotifier");
        for kind in EventKind::ALL {
            dbg.field(
                &kind.to_string(),
                &registry.get(&kind).map_or(0, |v| v.len()),
            );
        }
        dbg.finish()
    }
}

fn same_observer(a: &Rc<dyn Observer>, b: &Rc<dyn Observer>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for a category.
    ///
    /// Registering the same observer twice for the same category is a no-op.
    /// Returns `true` if the observer was added.
    pub fn subscribe(&self, kind: EventKind, observer: Rc<dyn Observer>) -> bool {
        let mut registry = self.observers.borrow_mut();
        let list = registry.entry(kind).or_default();
        if list.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        list.push(observer);
        true
    }

    /// Register a closure and return the handle needed to unsubscribe it
    pub fn subscribe_fn<F>(&self, kind: EventKind, f: F) -> Rc<dyn Observer>
    where
        F: Fn(&Event) -> Result<(), ObserverError> + 'static,
    {
        let observer: Rc<dyn Observer> = Rc::new(FnObserver(f));
        self.subscribe(kind, Rc::clone(&observer));
        observer
    }

    /// Remove an observer from a category. Returns `true` if it was registered.
    pub fn unsubscribe(&self, kind: EventKind, observer: &Rc<dyn Observer>) -> bool {
        let mut registry = self.observers.borrow_mut();
        match registry.get_mut(&kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|o| !same_observer(o, observer));
                list.len() != before
            }
            None => false,
        }
    }

    /// Number of observers registered for a category
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.observers.borrow().get(&kind).map_or(0, |v| v.len())
    }

    /// Deliver an event to every observer registered for its category.
    ///
    /// The observer list is snapshotted first, so observers may subscribe or
    /// unsubscribe while being notified; such changes apply to the next event.
    pub fn publish(&self, kind: EventKind, payload: Payload) -> Vec<DispatchFailure> {
        let snapshot: Vec<Rc<dyn Observer>> = self
            .observers
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        debug!(event = %kind, ?payload, observers = snapshot.len(), "publish");

        let event = Event { kind, payload };
        let mut failures = Vec::new();
        for (position, observer) in snapshot.iter().enumerate() {
            if let Err(e) = observer.notify(&event) {
                warn!(event = %kind, position, error = %e, "observer failed");
                failures.push(DispatchFailure {
                    kind,
                    position,
                    message: e.to_string(),
                });
            }
        }
        failures
    }
}
