//! # ecusim
//!
//! A diagnostic ECU simulator speaking a UDS-style request/response protocol
//! over TCP:
//! - Raw service requests, SID first, no framing beyond one socket read
//! - Positive responses (`SID + 0x40`) or `7F SID NRC` negative responses
//! - Volatile DID table shared by every connection behind one lock
//! - One thread per connection, or a bounded worker pool
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Listener                            │
//! │                  (Multiple Testers)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one Connection per accepted socket
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Connection Handler                           │
//! │        read one request → dispatch → write response          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Service Dispatcher                           │
//! │       0x10 0x11 0x22 0x2E 0x31, else 7F SID 11               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Mutex
//!                       ▼
//!                ┌─────────────┐
//!                │ Data Store  │
//!                │ (DID → val) │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod dispatcher;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EcuError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ecusim
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
