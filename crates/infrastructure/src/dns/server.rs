use crate::dns::wire::{HeaderCodec, MessageCodec, MAX_UDP_MESSAGE_SIZE};
use dns_relay_application::use_cases::HandleDnsQueryUseCase;
use dns_relay_domain::{DnsHeader, DnsMessage, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns one inbound datagram into the datagram to send back, if any.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Returns `None` when the datagram must be dropped: responses, and
    /// input too short to carry a header. A full header with a malformed
    /// body gets a FORMERR reply.
    pub async fn handle_datagram(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let reply = match MessageCodec::decode(datagram) {
            Ok(request) => {
                if request.header.response {
                    debug!(id = request.header.id, "Ignoring inbound response");
                    return None;
                }

                debug!(
                    id = request.header.id,
                    opcode = ?request.header.opcode,
                    questions = request.questions.len(),
                    "DNS query received"
                );

                self.use_case.execute(&request).await
            }
            Err(e) => Self::format_error(datagram, &e.to_string())?,
        };

        Self::encode_reply(&reply)
    }

    fn format_error(datagram: &[u8], reason: &str) -> Option<DnsMessage> {
        match HeaderCodec::decode(datagram) {
            Ok((header, _)) if !header.response => {
                warn!(id = header.id, error = %reason, "Malformed query, replying FORMERR");
                let request = DnsMessage::new(header, Vec::new(), Vec::new());
                Some(DnsMessage::response_to(
                    &request,
                    ResponseCode::FormErr,
                    Vec::new(),
                ))
            }
            Ok((header, _)) => {
                debug!(id = header.id, error = %reason, "Dropping malformed response");
                None
            }
            Err(_) => {
                debug!(len = datagram.len(), "Dropping datagram shorter than a DNS header");
                None
            }
        }
    }

    fn encode_reply(reply: &DnsMessage) -> Option<Vec<u8>> {
        match MessageCodec::encode(reply) {
            Ok(bytes) => {
                if bytes.len() > MAX_UDP_MESSAGE_SIZE {
                    warn!(
                        id = reply.header.id,
                        len = bytes.len(),
                        limit = MAX_UDP_MESSAGE_SIZE,
                        "Reply exceeds the UDP message size"
                    );
                }
                Some(bytes)
            }
            Err(e) => {
                error!(
                    id = reply.header.id,
                    error = %e,
                    "Failed to encode reply, sending bare SERVFAIL"
                );
                let header = DnsHeader {
                    response_code: ResponseCode::ServFail,
                    question_count: 0,
                    answer_count: 0,
                    authority_count: 0,
                    additional_count: 0,
                    ..reply.header
                };
                Some(HeaderCodec::encode(&header).to_vec())
            }
        }
    }
}
