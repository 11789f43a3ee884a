use super::header::HeaderCodec;
use super::name::CompressionTable;
use super::reader::WireReader;
use super::record::{RecordCodec, MIN_QUESTION_LEN, MIN_RECORD_LEN};
use super::MAX_UDP_MESSAGE_SIZE;
use dns_relay_domain::{DnsMessage, DomainError};

pub struct MessageCodec;

impl MessageCodec {
    /// Serializes `message`. The header counts are written as they are;
    /// keeping them in line with the sections is the caller's job
    /// (see `DnsMessage::sync_counts`).
    ///
    /// One compression table spans the question and answer sections, so an
    /// answer name can point back into the questions.
    pub fn encode(message: &DnsMessage) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(MAX_UDP_MESSAGE_SIZE);
        buf.extend_from_slice(&HeaderCodec::encode(&message.header));

        let mut table = CompressionTable::new();
        for question in &message.questions {
            RecordCodec::encode_question(question, &mut buf, &mut table)?;
        }
        for answer in &message.answers {
            RecordCodec::encode_record(answer, &mut buf, &mut table)?;
        }

        Ok(buf)
    }

    /// Parses a complete message. Authority and additional records are
    /// decoded to validate and skip them, then dropped. Bytes after the
    /// last counted record are ignored.
    pub fn decode(bytes: &[u8]) -> Result<DnsMessage, DomainError> {
        let mut reader = WireReader::new(bytes);
        let header = HeaderCodec::read(&mut reader)?;

        let capacity = capped(header.question_count, reader.remaining() / MIN_QUESTION_LEN);
        let mut questions = Vec::with_capacity(capacity);
        for _ in 0..header.question_count {
            questions.push(RecordCodec::decode_question(&mut reader)?);
        }

        let capacity = capped(header.answer_count, reader.remaining() / MIN_RECORD_LEN);
        let mut answers = Vec::with_capacity(capacity);
        for _ in 0..header.answer_count {
            answers.push(RecordCodec::decode_record(&mut reader)?);
        }

        let skipped = u32::from(header.authority_count) + u32::from(header.additional_count);
        for _ in 0..skipped {
            RecordCodec::decode_record(&mut reader)?;
        }

        Ok(DnsMessage {
            header,
            questions,
            answers,
        })
    }

    /// Reads only the transaction ID, for replies that cannot be decoded.
    pub fn peek_id(bytes: &[u8]) -> Option<u16> {
        match bytes {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}

fn capped(count: u16, limit: usize) -> usize {
    usize::from(count).min(limit)
}
