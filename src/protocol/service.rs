//! Service identifiers
//!
//! The first byte of every request.

/// Added to a request SID to form the positive response id
pub const POSITIVE_RESPONSE_OFFSET: u8 = 0x40;

/// First byte of every negative response
pub const NEGATIVE_RESPONSE_ID: u8 = 0x7F;

/// Services the simulated ECU answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServiceId {
    DiagnosticSessionControl = 0x10,
    EcuReset = 0x11,
    ReadDataByIdentifier = 0x22,
    WriteDataByIdentifier = 0x2E,
    RoutineControl = 0x31,
}

impl ServiceId {
    /// All supported services, in SID order
    pub const ALL: [ServiceId; 5] = [
        ServiceId::DiagnosticSessionControl,
        ServiceId::EcuReset,
        ServiceId::ReadDataByIdentifier,
        ServiceId::WriteDataByIdentifier,
        ServiceId::RoutineControl,
    ];

    /// Classify a request SID; `None` for unsupported services
    pub fn from_byte(sid: u8) -> Option<Self> {
        match sid {
            0x10 => Some(ServiceId::DiagnosticSessionControl),
            0x11 => Some(ServiceId::EcuReset),
            0x22 => Some(ServiceId::ReadDataByIdentifier),
            0x2E => Some(ServiceId::WriteDataByIdentifier),
            0x31 => Some(ServiceId::RoutineControl),
            _ => None,
        }
    }

    /// Classify a positive response id back to its service
    pub fn from_response_id(id: u8) -> Option<Self> {
        id.checked_sub(POSITIVE_RESPONSE_OFFSET)
            .and_then(Self::from_byte)
    }

    /// The request SID byte
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The positive response id (SID + 0x40)
    pub fn response_id(self) -> u8 {
        self as u8 + POSITIVE_RESPONSE_OFFSET
    }

    /// Human-readable service name
    pub fn name(self) -> &'static str {
        match self {
            ServiceId::DiagnosticSessionControl => "DiagnosticSessionControl",
            ServiceId::EcuReset => "EcuReset",
            ServiceId::ReadDataByIdentifier => "ReadDataByIdentifier",
            ServiceId::WriteDataByIdentifier => "WriteDataByIdentifier",
            ServiceId::RoutineControl => "RoutineControl",
        }
    }
}
