mod helpers;

use dns_relay_application::use_cases::HandleDnsQueryUseCase;
use dns_relay_domain::{
    DnsHeader, DnsMessage, OpCode, Question, RecordClass, RecordType, ResponseCode,
};
use helpers::MockDnsResolver;
use std::sync::Arc;

fn make_use_case(resolver: Arc<MockDnsResolver>) -> HandleDnsQueryUseCase {
    HandleDnsQueryUseCase::new(resolver)
}

fn request(id: u16, opcode: OpCode, names: &[&str]) -> DnsMessage {
    let questions = names
        .iter()
        .map(|name| Question::new(*name, RecordType::A, RecordClass::IN))
        .collect();
    let mut message = DnsMessage::new(
        DnsHeader {
            id,
            opcode,
            recursion_desired: true,
            ..DnsHeader::default()
        },
        questions,
        Vec::new(),
    );
    message.sync_counts();
    message
}

#[tokio::test]
async fn test_execute_resolved_query_returns_noerror_with_answers() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_a_response("google.com", [8, 8, 8, 8]).await;
    resolver.set_a_response("cloudflare.com", [1, 1, 1, 1]).await;

    let use_case = make_use_case(resolver.clone());
    let query = request(0x1234, OpCode::Query, &["google.com", "cloudflare.com"]);

    let reply = use_case.execute(&query).await;

    assert_eq!(reply.header.id, 0x1234);
    assert!(reply.header.response);
    assert!(reply.header.recursion_desired);
    assert!(reply.header.recursion_available);
    assert_eq!(reply.response_code(), ResponseCode::NoError);
    assert_eq!(reply.questions, query.questions);
    assert_eq!(reply.answers.len(), 2);
    assert_eq!(reply.answers[0].rdata, vec![8, 8, 8, 8]);
    assert_eq!(reply.answers[1].rdata, vec![1, 1, 1, 1]);
    assert!(reply.counts_consistent());
    assert_eq!(reply.header.answer_count, 2);

    assert_eq!(resolver.calls().await, vec![query.questions.clone()]);
}

#[tokio::test]
async fn test_execute_resolver_failure_returns_servfail() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_should_fail(true).await;

    let use_case = make_use_case(resolver);
    let query = request(42, OpCode::Query, &["google.com"]);

    let reply = use_case.execute(&query).await;

    assert_eq!(reply.header.id, 42);
    assert_eq!(reply.response_code(), ResponseCode::ServFail);
    assert_eq!(reply.questions, query.questions);
    assert!(reply.answers.is_empty());
    assert_eq!(reply.header.answer_count, 0);
}

#[tokio::test]
async fn test_execute_partial_failure_fails_whole_batch() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_a_response("known.test", [10, 0, 0, 1]).await;

    let use_case = make_use_case(resolver);
    let query = request(1, OpCode::Query, &["known.test", "unknown.test"]);

    let reply = use_case.execute(&query).await;

    assert_eq!(reply.response_code(), ResponseCode::ServFail);
    assert!(reply.answers.is_empty());
    assert_eq!(reply.header.question_count, 2);
}

#[tokio::test]
async fn test_execute_non_query_opcode_returns_notimp() {
    for opcode in [OpCode::IQuery, OpCode::Status, OpCode::Reserved(5)] {
        let resolver = Arc::new(MockDnsResolver::new());
        let use_case = make_use_case(resolver.clone());
        let query = request(9, opcode, &["google.com"]);

        let reply = use_case.execute(&query).await;

        assert_eq!(reply.response_code(), ResponseCode::NotImp);
        assert_eq!(reply.header.opcode, opcode);
        assert_eq!(reply.questions, query.questions);
        assert!(reply.answers.is_empty());
        assert!(
            resolver.calls().await.is_empty(),
            "resolver must not run for {:?}",
            opcode
        );
    }
}

#[tokio::test]
async fn test_execute_without_questions_returns_formerr() {
    let resolver = Arc::new(MockDnsResolver::new());
    let use_case = make_use_case(resolver.clone());

    let reply = use_case.execute(&request(3, OpCode::Query, &[])).await;

    assert_eq!(reply.response_code(), ResponseCode::FormErr);
    assert!(resolver.calls().await.is_empty());
}

#[tokio::test]
async fn test_execute_preserves_cleared_recursion_desired() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_a_response("google.com", [8, 8, 4, 4]).await;

    let use_case = make_use_case(resolver);
    let mut query = request(77, OpCode::Query, &["google.com"]);
    query.header.recursion_desired = false;

    let reply = use_case.execute(&query).await;

    assert!(!reply.header.recursion_desired);
    assert_eq!(reply.response_code(), ResponseCode::NoError);
}
