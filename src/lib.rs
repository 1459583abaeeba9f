//! HubDeck — workspace core of a multi-service dashboard.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod rpc_handler;
pub mod types;
