//! DNS wire format (RFC 1035 §4).
//!
//! Every decoder works on an immutable byte slice through [`WireReader`],
//! so malformed or hostile input surfaces as a `DomainError` and never as
//! a panic or an out-of-bounds read.

pub mod header;
pub mod message;
pub mod name;
pub mod reader;
pub mod record;

pub use header::HeaderCodec;
pub use message::MessageCodec;
pub use name::{CompressionTable, NameCodec};
pub use reader::WireReader;
pub use record::RecordCodec;

/// Size of the fixed message header.
pub const HEADER_LEN: usize = 12;

/// Conventional maximum DNS message size over UDP without EDNS(0).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

pub const MAX_LABEL_LEN: usize = 63;

/// Upper bound on the wire length of a name, terminating zero included.
pub const MAX_NAME_LEN: usize = 255;
