//! # chat-relay
//!
//! Backend for a website live chat. Visitors' messages arrive over a
//! WebSocket channel or `POST /send-message`, are stored in an embedded
//! `sled` log, and are broadcast to every connected listener. Messages from
//! the human-origin sender also trigger a best-effort e-mail to the site
//! operator and a best-effort auto-reply from a text-generation provider.
//!
//! ## Core Modules
//!
//! - `broker`: the broadcast channel (listener registry and fan-out).
//! - `pipeline`: validate, persist, publish, then notify and reply.
//! - `persistence`: the message store.
//! - `notify`: operator e-mails over an HTTP mail API.
//! - `generator`: auto-replies from the text-generation provider.
//! - `contact`: contact-form intake.
//! - `transport`: WebSocket and HTTP servers plus the event protocol.
//! - `config`, `utils`: settings, errors, logging.

pub mod broker;
pub mod config;
pub mod contact;
pub mod generator;
pub mod listener;
pub mod notify;
pub mod persistence;
pub mod pipeline;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
