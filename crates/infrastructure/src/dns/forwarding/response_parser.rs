use crate::dns::wire::MessageCodec;
use dns_relay_domain::{DnsMessage, DomainError, ResourceRecord, ResponseCode};
use tracing::debug;

pub struct ResponseParser;

impl ResponseParser {
    /// Decodes an upstream reply and checks it answers the query sent with
    /// `expected_id`.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<DnsMessage, DomainError> {
        let message = MessageCodec::decode(response_bytes).map_err(|e| {
            DomainError::upstream(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.header.id != expected_id {
            return Err(DomainError::upstream(format!(
                "Transaction ID mismatch: expected {:#06x}, got {:#06x}",
                expected_id, message.header.id
            )));
        }

        if !message.header.response {
            return Err(DomainError::upstream("Upstream message is not a response"));
        }

        debug!(
            id = message.header.id,
            rcode = %message.response_code(),
            answers = message.answers.len(),
            truncated = message.header.truncated,
            "DNS response parsed"
        );

        Ok(message)
    }

    /// The answer taken from one upstream reply: its first answer record,
    /// provided the upstream reported success and the answer section
    /// matches its declared count.
    pub fn first_answer(message: DnsMessage) -> Result<ResourceRecord, DomainError> {
        let rcode = message.response_code();
        if rcode != ResponseCode::NoError {
            return Err(DomainError::upstream(format!(
                "Upstream returned {}",
                rcode
            )));
        }

        if message.header.answer_count == 0 {
            return Err(DomainError::upstream("Upstream returned no answers"));
        }

        if !message.counts_consistent() {
            return Err(DomainError::upstream(format!(
                "Upstream declared {} answer(s) but carried {}",
                message.header.answer_count,
                message.answers.len()
            )));
        }

        message
            .answers
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::upstream("Upstream returned no answers"))
    }
}
