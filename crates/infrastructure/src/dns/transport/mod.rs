pub mod udp;

use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::time::Duration;

pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One request/response exchange with an upstream server.
///
/// Implementations must only return a reply that answers `message_bytes`
/// (same transaction ID, QR set). Anything else that arrives on the
/// channel in the meantime is theirs to discard.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
