use std::fmt;

/// Kind of query carried in the header's 4-bit OPCODE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpCode {
    #[default]
    Query,
    IQuery,
    Status,
    /// An unassigned opcode, 3-15. Obtain it through `OpCode::from`; a
    /// hand-built `Reserved(1)` encodes as IQuery and decodes back as one.
    Reserved(u8),
}

impl From<u8> for OpCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => OpCode::Query,
            1 => OpCode::IQuery,
            2 => OpCode::Status,
            other => OpCode::Reserved(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        match opcode {
            OpCode::Query => 0,
            OpCode::IQuery => 1,
            OpCode::Status => 2,
            OpCode::Reserved(value) => value & 0x0F,
        }
    }
}

/// Outcome of processing a query, carried in the 4-bit RCODE field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    /// An unassigned rcode, 6-15. Obtain it through `ResponseCode::from`;
    /// only the low four bits are ever written.
    Reserved(u8),
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Reserved(_) => "RESERVED",
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Reserved(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(value) => value & 0x0F,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Reserved(value) => write!(f, "RCODE{}", value),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// The fixed 12-byte message header (RFC 1035 §4.1.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsHeader {
    pub id: u16,

    /// QR: `false` for a query, `true` for a response.
    pub response: bool,

    pub opcode: OpCode,

    pub authoritative: bool,

    pub truncated: bool,

    pub recursion_desired: bool,

    pub recursion_available: bool,

    /// Reserved 3-bit field. Reported on decode, always encoded as zero.
    pub z: u8,

    pub response_code: ResponseCode,

    pub question_count: u16,

    pub answer_count: u16,

    pub authority_count: u16,

    pub additional_count: u16,
}

impl DnsHeader {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_query(&self) -> bool {
        !self.response
    }
}
