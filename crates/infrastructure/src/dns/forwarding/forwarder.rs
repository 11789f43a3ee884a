use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use crate::dns::transport::DnsTransport;
use async_trait::async_trait;
use dns_relay_application::ports::DnsResolver;
use dns_relay_domain::{DomainError, Question, ResourceRecord};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Forwards every question to one upstream server, one query at a time.
///
/// The first failing question aborts the batch.
pub struct ForwardingResolver {
    transport: Arc<dyn DnsTransport>,
    timeout: Duration,
}

impl ForwardingResolver {
    pub fn new(transport: Arc<dyn DnsTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    async fn resolve_one(&self, question: &Question) -> Result<ResourceRecord, DomainError> {
        let (id, request_bytes) = MessageBuilder::build_query(question)?;

        let response = self.transport.send(&request_bytes, self.timeout).await?;

        debug!(
            domain = %question.name,
            record_type = %question.record_type,
            id,
            protocol = response.protocol_used,
            bytes = response.bytes.len(),
            "Upstream reply received"
        );

        let message = ResponseParser::parse(&response.bytes, id)?;
        ResponseParser::first_answer(message)
    }
}

#[async_trait]
impl DnsResolver for ForwardingResolver {
    async fn resolve(&self, questions: &[Question]) -> Result<Vec<ResourceRecord>, DomainError> {
        let mut answers = Vec::with_capacity(questions.len());

        for question in questions {
            match self.resolve_one(question).await {
                Ok(answer) => answers.push(answer),
                Err(e) => {
                    warn!(
                        domain = %question.name,
                        record_type = %question.record_type,
                        protocol = self.transport.protocol_name(),
                        error = %e,
                        "Upstream resolution failed"
                    );
                    return Err(e);
                }
            }
        }

        Ok(answers)
    }
}
