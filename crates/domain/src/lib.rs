//! DNS Relay Domain Layer
pub mod config;
pub mod dns_header;
pub mod dns_message;
pub mod dns_protocol;
pub mod dns_question;
pub mod dns_record;
pub mod errors;

pub use config::{CliOverrides, Config};
pub use dns_header::{DnsHeader, OpCode, ResponseCode};
pub use dns_message::DnsMessage;
pub use dns_protocol::UpstreamAddr;
pub use dns_question::Question;
pub use dns_record::{RecordClass, RecordType, ResourceRecord};
pub use errors::DomainError;
