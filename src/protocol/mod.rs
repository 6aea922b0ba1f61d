//! Protocol Module
//!
//! Defines the UDS-style wire protocol between tester and ECU.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ SID (1)  │   Service parameters        │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Services
//! - 0x10: Diagnostic Session Control - parameters echoed
//! - 0x11: ECU Reset                  - parameters echoed
//! - 0x22: Read Data By Identifier    - DID (2, big-endian)
//! - 0x2E: Write Data By Identifier   - DID (2, big-endian) + value
//! - 0x31: Routine Control            - parameters echoed
//!
//! ## Response Format
//! ```text
//! Positive:  ┌──────────────┬──────────────────┐
//!            │ SID+0x40 (1) │  Service data    │
//!            └──────────────┴──────────────────┘
//! Negative:  ┌──────────┬──────────┬──────────┐
//!            │ 0x7F     │ SID      │ NRC      │
//!            └──────────┴──────────┴──────────┘
//! ```
//!
//! There is no length prefix. One transport read is one request, so message
//! boundaries follow the socket's read granularity.

mod service;
mod nrc;
mod response;
mod codec;

pub use service::{ServiceId, NEGATIVE_RESPONSE_ID, POSITIVE_RESPONSE_OFFSET};
pub use nrc::NegativeResponseCode;
pub use response::Response;
pub use codec::{format_hex, parse_hex, read_message, write_message, DEFAULT_READ_BUFFER_SIZE};
