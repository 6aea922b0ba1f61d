//! Response definitions
//!
//! Every dispatched request produces exactly one of these.

use super::{NegativeResponseCode, ServiceId, NEGATIVE_RESPONSE_ID};

/// A response to send to the tester
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `SID + 0x40` followed by service data
    Positive {
        service: ServiceId,
        payload: Vec<u8>,
    },

    /// `7F SID NRC`
    ///
    /// Carries the raw SID byte since unsupported services are echoed too.
    Negative {
        service_id: u8,
        nrc: NegativeResponseCode,
    },
}

impl Response {
    /// Create a positive response
    pub fn positive(service: ServiceId, payload: impl Into<Vec<u8>>) -> Self {
        Self::Positive {
            service,
            payload: payload.into(),
        }
    }

    /// Create a negative response for any SID byte
    pub fn negative(service_id: u8, nrc: NegativeResponseCode) -> Self {
        Self::Negative { service_id, nrc }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive { .. })
    }

    /// The NRC of a negative response
    pub fn nrc(&self) -> Option<NegativeResponseCode> {
        match self {
            Self::Negative { nrc, .. } => Some(*nrc),
            Self::Positive { .. } => None,
        }
    }

    /// Encode to wire bytes
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Positive { service, payload } => {
                let mut message = Vec::with_capacity(1 + payload.len());
                message.push(service.response_id());
                message.extend_from_slice(payload);
                message
            }
            Self::Negative { service_id, nrc } => {
                vec![NEGATIVE_RESPONSE_ID, *service_id, (*nrc).into()]
            }
        }
    }

    /// Classify received bytes
    ///
    /// Returns `None` for an empty buffer, a malformed negative response,
    /// or a positive id that no supported service produces.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&first, rest) = bytes.split_first()?;

        if first == NEGATIVE_RESPONSE_ID {
            return match rest {
                [service_id, nrc] => Some(Self::negative(*service_id, (*nrc).into())),
                _ => None,
            };
        }

        ServiceId::from_response_id(first).map(|service| Self::positive(service, rest))
    }
}
