//! Connection Handler
//!
//! Serves one accepted tester connection.
//!
//! ```text
//! AWAITING_REQUEST ──read──▶ DISPATCHING ──▶ RESPONDING ──write──┐
//!        ▲                                                       │
//!        └───────────────────────────────────────────────────────┘
//!   empty read / socket error ──▶ CLOSED
//! ```

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::error::{EcuError, Result};
use crate::protocol::{format_hex, read_message, write_message};

use super::is_disconnect;

/// Handles a single tester connection
pub struct Connection {
    /// The accepted socket, unbuffered so one read stays one request
    stream: TcpStream,

    /// Shared service dispatcher
    dispatcher: Arc<Dispatcher>,

    /// Receive buffer, reused for every request
    buffer: Vec<u8>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>, read_buffer_size: usize) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Responses are small and latency matters more than batching
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            dispatcher,
            buffer: vec![0u8; read_buffer_size.max(1)],
            peer_addr,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Requests are served strictly in arrival order: the next read happens
    /// only after the previous response is fully written. Returns `Ok` when
    /// the tester disconnects, `Err` on any other socket failure. Either way
    /// the socket is released when the handler is dropped.
    pub fn handle(&mut self) -> Result<()> {
        tracing::info!("Client connected: {}", self.peer_addr);
        serve_requests(&mut self.stream, &self.dispatcher, &mut self.buffer, &self.peer_addr)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Request/response loop over any byte stream
fn serve_requests<S: Read + Write>(
    stream: &mut S,
    dispatcher: &Dispatcher,
    buffer: &mut [u8],
    peer_addr: &str,
) -> Result<()> {
    loop {
        let request = match read_message(stream, buffer) {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::info!("Client disconnected: {}", peer_addr);
                return Ok(());
            }
            Err(EcuError::Io(ref e)) if is_disconnect(e) => {
                tracing::info!("Client {} dropped the connection: {}", peer_addr, e);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Error reading from {}: {}", peer_addr, e);
                return Err(e);
            }
        };

        tracing::info!("[{}] Received request: {}", peer_addr, format_hex(&request));

        let response = dispatcher.dispatch(&request);

        tracing::info!("[{}] Sending response: {}", peer_addr, format_hex(&response));

        match write_message(stream, &response) {
            Ok(()) => {}
            Err(EcuError::Io(ref e)) if is_disconnect(e) => {
                tracing::info!(
                    "Client {} disconnected before the response was sent: {}",
                    peer_addr,
                    e
                );
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Error writing to {}: {}", peer_addr, e);
                return Err(e);
            }
        }
    }
}
