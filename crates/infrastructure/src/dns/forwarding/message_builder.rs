//! DNS Message Builder
//!
//! Constructs the upstream query for a single question. The client's
//! transaction ID and flags never reach the upstream: every query gets a
//! fresh random ID and RD=1.

use crate::dns::wire::MessageCodec;
use dns_relay_domain::{DnsMessage, DomainError, Question};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `question` with a random transaction ID.
    ///
    /// Returns the ID alongside the bytes so the reply can be matched.
    pub fn build_query(question: &Question) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let bytes = Self::build_query_with_id(id, question)?;
        Ok((id, bytes))
    }

    pub fn build_query_with_id(id: u16, question: &Question) -> Result<Vec<u8>, DomainError> {
        let message = DnsMessage::query(id, question.clone());
        MessageCodec::encode(&message)
    }
}
