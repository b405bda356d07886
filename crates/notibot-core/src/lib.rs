//! Core domain + application logic for the account-binding notification bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Supabase
//! store live behind ports (traits) implemented in adapter crates.

pub mod bounded;
pub mod clock;
pub mod codes;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod linking;
pub mod logging;
#[cfg(test)]
mod memory;
pub mod messaging;
pub mod ports;
pub mod replies;
pub mod status;

pub use errors::{Error, Result};
