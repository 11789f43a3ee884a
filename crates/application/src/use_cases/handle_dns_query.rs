use crate::ports::DnsResolver;
use dns_relay_domain::{DnsMessage, OpCode, ResponseCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Turns a decoded client query into the reply message.
pub struct HandleDnsQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Never fails: resolver errors are folded into a SERVFAIL reply that
    /// echoes the question section with no answers.
    pub async fn execute(&self, request: &DnsMessage) -> DnsMessage {
        if request.header.opcode != OpCode::Query {
            debug!(id = request.header.id, opcode = ?request.header.opcode, "Unsupported opcode");
            return DnsMessage::response_to(request, ResponseCode::NotImp, Vec::new());
        }

        if request.questions.is_empty() {
            debug!(id = request.header.id, "Query without questions");
            return DnsMessage::response_to(request, ResponseCode::FormErr, Vec::new());
        }

        let start = Instant::now();

        match self.resolver.resolve(&request.questions).await {
            Ok(answers) => {
                debug!(
                    id = request.header.id,
                    questions = request.questions.len(),
                    answers = answers.len(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Query resolved"
                );
                DnsMessage::response_to(request, ResponseCode::NoError, answers)
            }
            Err(e) => {
                warn!(id = request.header.id, error = %e, "Query resolution failed");
                DnsMessage::response_to(request, ResponseCode::ServFail, Vec::new())
            }
        }
    }
}
