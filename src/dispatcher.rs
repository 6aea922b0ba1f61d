//! Dispatcher Module
//!
//! The service dispatcher: raw request bytes in, raw response bytes out.
//!
//! ## Responsibilities
//! - Classify a request by its SID
//! - Check each service's length preconditions
//! - Read and write the Data Store
//! - Express every failure as a `7F SID NRC` negative response

use parking_lot::Mutex;

use crate::config::Config;
use crate::protocol::{NegativeResponseCode, Response, ServiceId};
use crate::store::{DataStore, Did};

/// Minimum request length for ReadDataByIdentifier: SID + DID
const READ_DID_MIN_LEN: usize = 3;

/// Minimum request length for WriteDataByIdentifier: SID + DID + one data byte
const WRITE_DID_MIN_LEN: usize = 4;

/// The simulated ECU's service dispatcher
///
/// ## Concurrency Model
///
/// One dispatcher is shared by every connection (`Arc<Dispatcher>`). The
/// Data Store sits behind a single mutex and is only reachable through
/// `dispatch`, which holds the lock for at most one store operation. Each
/// dispatch call is therefore the unit of atomicity: concurrent writes to
/// distinct DIDs are never lost, and a read returns either the old or the
/// new value in full.
pub struct Dispatcher {
    store: Mutex<DataStore>,
}

impl Dispatcher {
    /// Create a dispatcher over an existing store
    pub fn new(store: DataStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Create a dispatcher over the built-in seed table
    pub fn seeded() -> Self {
        Self::new(DataStore::seeded())
    }

    /// Create a dispatcher over the seed table of a config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.seed.iter().cloned().collect())
    }

    /// Answer one request
    ///
    /// Total: never fails and never panics. An empty request means nothing
    /// was sent and yields an empty response without touching any service.
    pub fn dispatch(&self, request: &[u8]) -> Vec<u8> {
        match request.split_first() {
            Some((&sid, params)) => self.handle(sid, params).encode(),
            None => Vec::new(),
        }
    }

    /// Route a non-empty request to its service handler
    pub fn handle(&self, sid: u8, params: &[u8]) -> Response {
        let Some(service) = ServiceId::from_byte(sid) else {
            tracing::debug!("Unsupported service 0x{:02X}", sid);
            return Response::negative(sid, NegativeResponseCode::ServiceNotSupported);
        };

        tracing::debug!(
            "{} (0x{:02X}), {} parameter bytes",
            service.name(),
            sid,
            params.len()
        );

        match service {
            // Sub-function and parameters are accepted as-is and echoed
            ServiceId::DiagnosticSessionControl
            | ServiceId::EcuReset
            | ServiceId::RoutineControl => Response::positive(service, params),
            ServiceId::ReadDataByIdentifier => self.read_data_by_identifier(params),
            ServiceId::WriteDataByIdentifier => self.write_data_by_identifier(params),
        }
    }

    /// 0x22: `62 DID value` or `7F 22 13` / `7F 22 31`
    fn read_data_by_identifier(&self, params: &[u8]) -> Response {
        let sid = ServiceId::ReadDataByIdentifier;
        if params.len() + 1 < READ_DID_MIN_LEN {
            return Response::negative(
                sid.id(),
                NegativeResponseCode::IncorrectMessageLengthOrFormat,
            );
        }

        let did = did_from_params(params);
        let Some(value) = self.store.lock().read(did) else {
            tracing::debug!("{}: DID 0x{:04X} not found", sid.name(), did);
            return Response::negative(sid.id(), NegativeResponseCode::RequestOutOfRange);
        };

        let mut payload = Vec::with_capacity(2 + value.len());
        payload.extend_from_slice(&did.to_be_bytes());
        payload.extend_from_slice(&value);
        Response::positive(sid, payload)
    }

    /// 0x2E: store `bytes[3..]` under the DID, answer `6E DID` or `7F 2E 13`
    fn write_data_by_identifier(&self, params: &[u8]) -> Response {
        let sid = ServiceId::WriteDataByIdentifier;
        if params.len() + 1 < WRITE_DID_MIN_LEN {
            return Response::negative(
                sid.id(),
                NegativeResponseCode::IncorrectMessageLengthOrFormat,
            );
        }

        let did = did_from_params(params);
        let value = params[2..].to_vec();
        let len = value.len();
        let previous = self.store.lock().write(did, value);

        tracing::debug!(
            "{}: DID 0x{:04X} := {} bytes ({})",
            sid.name(),
            did,
            len,
            if previous.is_some() { "replaced" } else { "created" }
        );

        Response::positive(sid, did.to_be_bytes().to_vec())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of DIDs currently stored
    pub fn did_count(&self) -> usize {
        self.store.lock().len()
    }

    /// All stored DIDs in ascending order
    pub fn dids(&self) -> Vec<Did> {
        self.store.lock().dids()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Big-endian DID from the first two parameter bytes
fn did_from_params(params: &[u8]) -> Did {
    Did::from_be_bytes([params[0], params[1]])
}
