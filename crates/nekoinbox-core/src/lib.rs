//! Core domain + application logic for the NekoInbox relay.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging port
//! implemented in the adapter crate; the remote backend lives behind
//! [`messaging::port::SubmissionSink`].

pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod notify;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
