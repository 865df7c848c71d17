//! The `listener` module defines a connected channel endpoint.
//!
//! A [`Listener`] is nothing more than an id and the sending half of an
//! unbounded channel; the transport owns the receiving half and drains it
//! into the socket.

use std::fmt;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::SendError};
use uuid::Uuid;

use crate::transport::message::ServerEvent;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(String);

impl ListenerId {
    pub fn new() -> Self {
        Self(format!("listener-{}", Uuid::new_v4()))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry entry for one live connection.
#[derive(Debug)]
pub struct Listener {
    pub id: ListenerId,
    sender: UnboundedSender<ServerEvent>,
}

impl Listener {
    /// Create a listener together with the receiver its transport drains.
    pub fn new() -> (Self, UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let listener = Self {
            id: ListenerId::new(),
            sender,
        };
        (listener, receiver)
    }

    /// Queue an event. Fails only when the receiving side is gone.
    pub fn send(&self, event: ServerEvent) -> Result<(), SendError<ServerEvent>> {
        self.sender.send(event)
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_listeners_get_distinct_ids() {
        let (a, _rx_a) = Listener::new();
        let (b, _rx_b) = Listener::new();
        assert_ne!(a.id, b.id);
        assert!(a.id.to_string().starts_with("listener-"));
    }

    #[test]
    fn send_fails_once_receiver_dropped() {
        let (listener, rx) = Listener::new();
        assert!(listener.send(ServerEvent::error("x")).is_ok());
        drop(rx);
        assert!(listener.is_closed());
        assert!(listener.send(ServerEvent::error("y")).is_err());
    }
}
