//! Transient user-facing notices.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Sends notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(notice = message);
    }
}

/// Keeps every notice; clones share the list
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
