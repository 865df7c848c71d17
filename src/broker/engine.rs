//! Broker engine
//!
//! The API is synchronous and meant to sit behind `Arc<Mutex<Broker>>`.
//! Callers must not hold the lock across an `.await`.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::broker::message::Message;
use crate::listener::{Listener, ListenerId};
use crate::transport::message::ServerEvent;

/// Handle returned by [`Broker::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    pub id: ListenerId,
    pub events: UnboundedReceiver<ServerEvent>,
}

#[derive(Debug, Default)]
pub struct Broker {
    pub(crate) listeners: HashMap<ListenerId, Listener>,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Register a new listener.
    pub fn subscribe(&mut self) -> Subscription {
        let (listener, events) = Listener::new();
        let id = listener.id.clone();
        self.listeners.insert(id.clone(), listener);
        debug!(target: "broker", %id, total = self.listeners.len(), "listener subscribed");
        Subscription { id, events }
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: &ListenerId) {
        if self.listeners.remove(id).is_some() {
            debug!(target: "broker", %id, total = self.listeners.len(), "listener unsubscribed");
        }
    }

    /// Send one event to one listener. Returns whether it was queued.
    pub fn deliver(&self, id: &ListenerId, event: ServerEvent) -> bool {
        match self.listeners.get(id) {
            Some(listener) => listener.send(event).is_ok(),
            None => false,
        }
    }

    /// Fan `message` out to every registered listener.
    ///
    /// A closed listener does not stop delivery to the others; closed
    /// listeners are pruned after the loop. Returns the number of listeners
    /// that accepted the event.
    pub fn publish(&mut self, message: &Message) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        for (id, listener) in &self.listeners {
            match listener.send(ServerEvent::receive(message.clone())) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(target: "broker", %id, "dropping closed listener");
                    dead.push(id.clone());
                }
            }
        }

        for id in dead {
            self.listeners.remove(&id);
        }

        debug!(target: "broker", message = %message.id, delivered, "published");
        delivered
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
