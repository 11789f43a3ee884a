//! UDP transport to the upstream resolver (RFC 1035 §4.2.1).
//!
//! One connected socket is kept for the lifetime of the transport and
//! exchanges are serialized through a mutex. Replies are matched to the
//! query by transaction ID, so a late answer to an exchange that already
//! timed out is dropped instead of being handed to the next caller.

use super::{DnsTransport, TransportResponse};
use crate::dns::wire::{MessageCodec, MAX_UDP_MESSAGE_SIZE};
use async_trait::async_trait;
use dns_relay_domain::{DomainError, UpstreamAddr};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// QR bit in the third header byte.
const QR_MASK: u8 = 0x80;

pub struct UdpTransport {
    server_addr: SocketAddr,
    socket: Mutex<UdpSocket>,
}

impl UdpTransport {
    /// Resolves `upstream` if it names a host, then connects to it.
    pub async fn connect(upstream: &UpstreamAddr) -> Result<Self, DomainError> {
        let server_addr = resolve_upstream(upstream).await?;
        Self::connect_addr(server_addr).await
    }

    pub async fn connect_addr(server_addr: SocketAddr) -> Result<Self, DomainError> {
        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::upstream(format!("Failed to bind UDP socket: {}", e))
        })?;

        socket.connect(server_addr).await.map_err(|e| {
            DomainError::upstream(format!(
                "Failed to connect UDP socket to {}: {}",
                server_addr, e
            ))
        })?;

        debug!(
            server = %server_addr,
            local = ?socket.local_addr().ok(),
            "UDP upstream socket connected"
        );

        Ok(Self {
            server_addr,
            socket: Mutex::new(socket),
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    async fn exchange(
        &self,
        socket: &UdpSocket,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = socket.send(message_bytes).await.map_err(|e| {
            DomainError::upstream(format!(
                "Failed to send UDP query to {}: {}",
                self.server_addr, e
            ))
        })?;

        debug!(server = %self.server_addr, bytes_sent, "UDP query sent");

        let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];
        loop {
            let bytes_received = socket.recv(&mut recv_buf).await.map_err(|e| {
                DomainError::upstream(format!(
                    "Failed to receive UDP response from {}: {}",
                    self.server_addr, e
                ))
            })?;

            let reply = &recv_buf[..bytes_received];
            match validate_response_id(message_bytes, reply, self.server_addr) {
                Ok(()) => {
                    debug!(server = %self.server_addr, bytes_received, "UDP response received");
                    return Ok(reply.to_vec());
                }
                Err(e) => {
                    warn!(server = %self.server_addr, error = %e, "Discarding unmatched UDP reply");
                }
            }
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        if MessageCodec::peek_id(message_bytes).is_none() {
            return Err(DomainError::upstream(
                "Query too short to carry a transaction ID",
            ));
        }

        let socket = self.socket.lock().await;

        let bytes = tokio::time::timeout(timeout, self.exchange(&socket, message_bytes))
            .await
            .map_err(|_| {
                DomainError::upstream(format!(
                    "Timeout waiting for UDP response from {}",
                    self.server_addr
                ))
            })??;

        Ok(TransportResponse {
            bytes,
            protocol_used: "UDP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}

async fn resolve_upstream(upstream: &UpstreamAddr) -> Result<SocketAddr, DomainError> {
    if let Some(addr) = upstream.socket_addr() {
        return Ok(addr);
    }

    let (hostname, port) = upstream
        .unresolved_parts()
        .ok_or_else(|| DomainError::upstream(format!("Unusable upstream address {}", upstream)))?;

    let mut addrs = tokio::net::lookup_host((hostname, port)).await.map_err(|e| {
        DomainError::upstream(format!("DNS resolution failed for {}: {}", upstream, e))
    })?;

    let addr = addrs
        .next()
        .ok_or_else(|| DomainError::upstream(format!("No addresses found for {}", upstream)))?;

    debug!(upstream = %upstream, resolved = %addr, "Upstream hostname resolved");
    Ok(addr)
}

/// Accepts `response` only if it is a reply (QR set) carrying the
/// transaction ID of `query`.
pub(crate) fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    let query_id = MessageCodec::peek_id(query)
        .ok_or_else(|| DomainError::upstream("Query too short to carry a transaction ID"))?;

    let (response_id, flags) = match response {
        [hi, lo, flags, ..] => (u16::from_be_bytes([*hi, *lo]), *flags),
        _ => {
            return Err(DomainError::upstream(format!(
                "Reply from {} is only {} byte(s) long",
                server,
                response.len()
            )))
        }
    };

    if query_id != response_id {
        return Err(DomainError::upstream(format!(
            "Transaction ID mismatch from {}: sent {:#06x}, received {:#06x}",
            server, query_id, response_id
        )));
    }

    if flags & QR_MASK == 0 {
        return Err(DomainError::upstream(format!(
            "Datagram from {} is not a response",
            server
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;
