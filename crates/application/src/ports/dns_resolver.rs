use async_trait::async_trait;
use dns_relay_domain::{DomainError, Question, ResourceRecord};

/// Resolves a batch of questions into one answer per question.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Returns answers in question order. Any failing question fails the
    /// whole batch with `DomainError::UpstreamError`.
    async fn resolve(&self, questions: &[Question]) -> Result<Vec<ResourceRecord>, DomainError>;
}
