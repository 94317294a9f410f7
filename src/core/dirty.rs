//! Unsaved-changes tracking
//!
//! ```text
//! [Clean] --mutate--------> [Dirty]
//! [Dirty] --save ok-------> [Clean]
//! [Dirty] --restore ok----> [Clean]
//! [Clean] --restore ok----> [Clean]
//! ```

use std::cell::Cell;

use crate::core::events::{ChangeNotifier, EventKind, Payload};

/// The "unsaved changes" flag
///
/// Every actual flip publishes [`EventKind::UnsavedFlagChanged`]; setting the
/// flag to the value it already has publishes nothing.
#[derive(Debug)]
pub struct DirtyTracker {
    dirty: Cell<bool>,
    notifier: ChangeNotifier,
}

impl DirtyTracker {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            dirty: Cell::new(false),
            notifier,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Record that memory now differs from disk
    pub fn mark_dirty(&self) {
        self.set(true);
    }

    /// Record that memory matches disk (after save or restore)
    pub fn mark_clean(&self) {
        self.set(false);
    }

    fn set(&self, value: bool) {
        if self.dirty.replace(value) != value {
            self.notifier
                .publish(EventKind::UnsavedFlagChanged, Payload::Unsaved(value));
        }
    }
}

/// Append the unsaved marker to a status message when needed
pub fn status_message(message: &str, dirty: bool) -> String {
    if dirty {
        format!("{} [* unsaved changes]", message)
    } else {
        message.to_string()
    }
}
