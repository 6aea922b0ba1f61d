//! Protocol codec
//!
//! Hex text conversion for the tester prompt, plus the stream helpers used on
//! both ends of a connection.
//!
//! ## Framing
//! One `read` call is one message. Nothing is reassembled across reads and
//! nothing is split within one, so a request larger than the read buffer or
//! two requests coalesced by the transport are not handled. The tester
//! always waits for a response before sending again, which keeps this
//! adequate for interactive use.

use std::io::{ErrorKind, Read, Write};

use crate::error::{EcuError, Result};

/// Bytes taken by a single transport read
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

// =============================================================================
// Hex Text
// =============================================================================

/// Parse whitespace-separated hex bytes, e.g. `"22 F1 90"`
///
/// Each token is one or two hex digits. Blank input yields an empty vector.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    text.split_whitespace().map(parse_hex_byte).collect()
}

fn parse_hex_byte(token: &str) -> Result<u8> {
    let well_formed = token.len() <= 2 && token.chars().all(|c| c.is_ascii_hexdigit());
    if !well_formed {
        return Err(EcuError::InvalidInput(format!(
            "'{}' is not a hex byte, enter bytes like '22 F1 90'",
            token
        )));
    }

    u8::from_str_radix(token, 16)
        .map_err(|e| EcuError::InvalidInput(format!("'{}': {}", token, e)))
}

/// Render bytes as space-separated uppercase hex pairs, e.g. `"62 F1 90"`
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02X}", byte));
    }
    out
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one message from a stream
///
/// Returns `Ok(None)` when the peer has closed the stream.
pub fn read_message<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<Option<Vec<u8>>> {
    loop {
        match reader.read(buf) {
            Ok(0) => return Ok(None),
            Ok(n) => return Ok(Some(buf[..n].to_vec())),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Write a whole message to a stream
pub fn write_message<W: Write>(writer: &mut W, message: &[u8]) -> Result<()> {
    writer.write_all(message)?;
    writer.flush()?;
    Ok(())
}
