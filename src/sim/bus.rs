use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::message::{Message, MessageKind};

type Handler = Rc<dyn Fn(&Message)>;

/// Synchronous publish/subscribe channel shared by all systems of one world.
///
/// Delivery is **synchronous, re-entrant and in subscription order**:
///
/// - `publish` runs every handler registered for the message's kind before
///   returning, on the caller's stack. Handlers may publish in turn, including
///   messages that route back to themselves.
/// - The subscriber list is snapshotted when a publish starts, so a handler
///   subscribed during delivery only sees later publishes.
///
/// Handlers keep their state behind `Rc<RefCell<..>>` and must release any
/// borrow of it before publishing.
///
/// Ordering is only defined within one kind; nothing orders deliveries of
/// different kinds relative to each other.
#[derive(Default)]
pub struct MessageBus {
    subscribers: RefCell<HashMap<MessageKind, Vec<Handler>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future message of `kind`.
    pub fn subscribe(&self, kind: MessageKind, handler: impl Fn(&Message) + 'static) {
        let handler: Handler = Rc::new(handler);
        self.subscribers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(handler);
    }

    /// Deliver `message` to its subscribers. Returns how many handlers ran.
    pub fn publish(&self, message: Message) -> usize {
        let handlers: Vec<Handler> = self
            .subscribers
            .borrow()
            .get(&message.kind())
            .cloned()
            .unwrap_or_default();

        for handler in &handlers {
            handler(&message);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.subscribers.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.subscribers.borrow_mut().clear();
    }
}
