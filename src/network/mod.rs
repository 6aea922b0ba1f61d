//! Network Module
//!
//! TCP listener, per-connection handlers and the tester-side session.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One handler thread per connection, or a bounded worker pool
//! - Every request routed through the shared Dispatcher
//!
//! One thread per connection has no upper bound and suits a small, trusted
//! set of testers. Set `Config::workers` to cap it.

mod server;
mod connection;
mod client;

use std::io;

pub use server::{Server, ServerHandle};
pub use connection::Connection;
pub use client::ClientSession;

/// Errors that mean the peer went away rather than something broke
pub(crate) fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
    )
}
