use super::{DnsHeader, OpCode, Question, ResourceRecord, ResponseCode};

/// A DNS message as modelled by the codec: header, question section and
/// answer section. Authority and additional records are skipped on decode
/// and never produced on encode.
///
/// The header counts are not recomputed by the encoder. Call
/// [`DnsMessage::sync_counts`] before serializing a message that was
/// assembled by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
}

impl DnsMessage {
    pub fn new(header: DnsHeader, questions: Vec<Question>, answers: Vec<ResourceRecord>) -> Self {
        Self {
            header,
            questions,
            answers,
        }
    }

    /// Builds a recursive standard query carrying exactly one question.
    pub fn query(id: u16, question: Question) -> Self {
        let header = DnsHeader {
            id,
            opcode: OpCode::Query,
            recursion_desired: true,
            ..DnsHeader::default()
        };
        let mut message = Self::new(header, vec![question], Vec::new());
        message.sync_counts();
        message
    }

    /// Builds the reply to `request`: same ID, opcode and RD flag, questions
    /// echoed, QR and RA set.
    pub fn response_to(
        request: &DnsMessage,
        response_code: ResponseCode,
        answers: Vec<ResourceRecord>,
    ) -> Self {
        let header = DnsHeader {
            id: request.header.id,
            response: true,
            opcode: request.header.opcode,
            recursion_desired: request.header.recursion_desired,
            recursion_available: true,
            response_code,
            ..DnsHeader::default()
        };
        let mut message = Self::new(header, request.questions.clone(), answers);
        message.sync_counts();
        message
    }

    /// Sets the section counts from the section contents.
    pub fn sync_counts(&mut self) {
        self.header.question_count = saturating_count(self.questions.len());
        self.header.answer_count = saturating_count(self.answers.len());
        self.header.authority_count = 0;
        self.header.additional_count = 0;
    }

    /// True when the header counts describe the modelled sections exactly.
    pub fn counts_consistent(&self) -> bool {
        usize::from(self.header.question_count) == self.questions.len()
            && usize::from(self.header.answer_count) == self.answers.len()
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.response_code
    }
}

fn saturating_count(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}
