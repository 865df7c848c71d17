//! Broadcast channel
//!
//! [`Broker`] keeps the registry of live listeners and fans every published
//! message out to all of them. It holds no message data and never touches
//! the store: history replay is driven by the pipeline through
//! [`Broker::deliver`].

pub mod engine;
pub mod message;

pub use engine::{Broker, Subscription};

#[cfg(test)]
mod tests;
