//! The `transport` module exposes the relay to the network.
//!
//! - [`websocket`]: the live channel. Connect replays history, text frames
//!   carry `sendMessage`, every publish is pushed as `receiveMessage`.
//! - [`http`]: the `axum` API with `POST /send-message`, `POST /contact`
//!   and the health routes.
//! - [`message`]: the JSON event protocol shared by both.

pub mod http;
pub mod message;
pub mod websocket;
