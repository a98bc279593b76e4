//! Core domain + application logic for the tax-channel bot.
//!
//! This crate is intentionally framework-agnostic. The Telegram client lives
//! behind the messaging port implemented in the adapter crate; everything here
//! can be exercised without a live connection.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod format;
pub mod logging;
pub mod menu;
pub mod messaging;
pub mod pending;
pub mod tax;

pub use errors::{Error, Result};
