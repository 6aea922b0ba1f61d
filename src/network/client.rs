//! Client Session
//!
//! Tester side of the protocol: send one request, wait for one response.

use std::net::TcpStream;

use crate::error::{EcuError, Result};
use crate::protocol::{format_hex, parse_hex, read_message, write_message, DEFAULT_READ_BUFFER_SIZE};

use super::is_disconnect;

/// A connected diagnostic tester
pub struct ClientSession {
    stream: TcpStream,
    buffer: Vec<u8>,
    server_addr: String,
}

impl ClientSession {
    /// Connect to an ECU at `addr` (host:port)
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        tracing::debug!("Connected to {}", addr);

        Ok(Self {
            stream,
            buffer: vec![0u8; DEFAULT_READ_BUFFER_SIZE],
            server_addr: addr.to_string(),
        })
    }

    /// Send one request and block for exactly one response read
    ///
    /// An empty request is not sent and yields an empty response. Fails with
    /// `EcuError::Disconnected` when the server has closed the connection.
    pub fn send(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        if request.is_empty() {
            return Ok(Vec::new());
        }

        write_message(&mut self.stream, request).map_err(disconnect_or)?;

        match read_message(&mut self.stream, &mut self.buffer).map_err(disconnect_or)? {
            Some(response) => Ok(response),
            None => Err(EcuError::Disconnected),
        }
    }

    /// Parse hex text, send it, and render the response as hex text
    ///
    /// A parse failure leaves the session untouched.
    pub fn send_hex(&mut self, text: &str) -> Result<String> {
        let request = parse_hex(text)?;
        let response = self.send(&request)?;
        Ok(format_hex(&response))
    }

    /// Address this session connected to
    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }
}

fn disconnect_or(e: EcuError) -> EcuError {
    match e {
        EcuError::Io(ref io_err) if is_disconnect(io_err) => EcuError::Disconnected,
        other => other,
    }
}
