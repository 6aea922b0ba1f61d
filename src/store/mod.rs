//! Data Store Module
//!
//! In-memory table of Data Identifiers (DIDs) and their values.
//!
//! ## Responsibilities
//! - Map a 16-bit DID to an immutable byte value
//! - Insert or replace a whole value (no partial writes, no deletes)
//! - Provide the seed table loaded at process start
//!
//! ## Concurrency
//! `DataStore` has no locking of its own. The dispatcher owns the only
//! instance behind a single mutex, so every read and write is serialized
//! per dispatch call.
//!
//! Values are `Bytes`: a reader clones a handle to the old value and can
//! never observe a write in progress.

mod table;

pub use table::DataStore;

/// A 16-bit Data Identifier
pub type Did = u16;

/// Software version DID in the seed table
pub const DID_SOFTWARE_VERSION: Did = 0xF190;

/// Hardware version DID in the seed table
pub const DID_HARDWARE_VERSION: Did = 0xF191;

/// The table every fresh store starts from
pub fn default_seed() -> Vec<(Did, Vec<u8>)> {
    vec![
        (DID_SOFTWARE_VERSION, vec![0x00, 0x01, 0x23]),
        (DID_HARDWARE_VERSION, vec![0xAA, 0xBB, 0xCC]),
    ]
}
