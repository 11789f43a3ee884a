use async_trait::async_trait;
use dns_relay_application::ports::DnsResolver;
use dns_relay_domain::{DomainError, Question, RecordClass, RecordType, ResourceRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, ResourceRecord>>>,
    should_fail: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<Vec<Question>>>>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            should_fail: Arc::new(RwLock::new(false)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_a_response(&self, domain: &str, addr: [u8; 4]) {
        let record = ResourceRecord::new(domain, RecordType::A, RecordClass::IN, 60, addr.to_vec());
        self.responses
            .write()
            .await
            .insert(domain.to_string(), record);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    pub async fn calls(&self) -> Vec<Vec<Question>> {
        self.calls.read().await.clone()
    }
}

impl Default for MockDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn resolve(&self, questions: &[Question]) -> Result<Vec<ResourceRecord>, DomainError> {
        self.calls.write().await.push(questions.to_vec());

        if *self.should_fail.read().await {
            return Err(DomainError::upstream("Mock resolver failed"));
        }

        let responses = self.responses.read().await;
        questions
            .iter()
            .map(|question| {
                responses.get(&question.name).cloned().ok_or_else(|| {
                    DomainError::upstream(format!("No mock response for {}", question.name))
                })
            })
            .collect()
    }
}
