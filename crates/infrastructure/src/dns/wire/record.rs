//! Question (RFC 1035 §4.1.2) and resource record (§4.1.3) codecs.

use super::name::{CompressionTable, NameCodec};
use super::reader::WireReader;
use bytes::BufMut;
use dns_relay_domain::{DomainError, Question, RecordClass, RecordType, ResourceRecord};

/// Smallest possible question: root name, TYPE, CLASS.
pub const MIN_QUESTION_LEN: usize = 5;

/// Smallest possible resource record: root name, TYPE, CLASS, TTL, RDLENGTH.
pub const MIN_RECORD_LEN: usize = 11;

pub struct RecordCodec;

impl RecordCodec {
    pub fn encode_question(
        question: &Question,
        buf: &mut Vec<u8>,
        table: &mut CompressionTable,
    ) -> Result<(), DomainError> {
        NameCodec::encode(&question.name, buf, table)?;
        buf.put_u16(question.record_type.to_u16());
        buf.put_u16(question.record_class.to_u16());
        Ok(())
    }

    pub fn decode_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
        let name = NameCodec::decode(reader)?;
        let record_type = RecordType::from_u16(reader.read_u16()?);
        let record_class = RecordClass::from_u16(reader.read_u16()?);

        Ok(Question {
            name,
            record_type,
            record_class,
        })
    }

    pub fn encode_record(
        record: &ResourceRecord,
        buf: &mut Vec<u8>,
        table: &mut CompressionTable,
    ) -> Result<(), DomainError> {
        let rdlength = u16::try_from(record.rdata.len())
            .map_err(|_| DomainError::RdataTooLong(record.rdata.len()))?;

        NameCodec::encode(&record.name, buf, table)?;
        buf.put_u16(record.record_type.to_u16());
        buf.put_u16(record.record_class.to_u16());
        buf.put_u32(record.ttl);
        buf.put_u16(rdlength);
        buf.put_slice(&record.rdata);
        Ok(())
    }

    pub fn decode_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
        let name = NameCodec::decode(reader)?;
        let record_type = RecordType::from_u16(reader.read_u16()?);
        let record_class = RecordClass::from_u16(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;
        let rdata = reader.read_bytes(usize::from(rdlength))?.to_vec();

        Ok(ResourceRecord {
            name,
            record_type,
            record_class,
            ttl,
            rdata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_question_layout() {
        let question = Question::new("a.io", RecordType::AAAA, RecordClass::IN);
        let mut buf = Vec::new();
        RecordCodec::encode_question(&question, &mut buf, &mut CompressionTable::new()).unwrap();

        assert_eq!(buf, [1, b'a', 2, b'i', b'o', 0, 0x00, 0x1C, 0x00, 0x01]);
    }

    #[test]
    fn test_decode_question_keeps_unknown_codes() {
        let buf = [0, 0xFF, 0x00, 0x00, 0xFE];
        let mut reader = WireReader::new(&buf);
        let question = RecordCodec::decode_question(&mut reader).unwrap();

        assert_eq!(question.name, "");
        assert_eq!(question.record_type, RecordType::Unknown(0xFF00));
        assert_eq!(question.record_class, RecordClass::Unknown(0x00FE));
    }

    #[test]
    fn test_question_missing_class_is_truncated() {
        let buf = [0, 0x00, 0x01, 0x00];
        let mut reader = WireReader::new(&buf);
        assert!(matches!(
            RecordCodec::decode_question(&mut reader),
            Err(DomainError::TruncatedInput { offset: 3, needed: 1 })
        ));
    }

    #[test]
    fn test_encode_record_layout() {
        let record =
            ResourceRecord::new("a.io", RecordType::A, RecordClass::IN, 60, vec![8, 8, 8, 8]);
        let mut buf = Vec::new();
        RecordCodec::encode_record(&record, &mut buf, &mut CompressionTable::new()).unwrap();

        assert_eq!(
            buf,
            [
                1, b'a', 2, b'i', b'o', 0, // name
                0x00, 0x01, // type
                0x00, 0x01, // class
                0x00, 0x00, 0x00, 0x3C, // ttl
                0x00, 0x04, // rdlength
                8, 8, 8, 8, // rdata
            ]
        );
    }

    #[test]
    fn test_decode_record_reads_exact_rdata() {
        let buf = [
            0, 0x00, 0x10, 0x00, 0x01, 0x00, 0x00, 0x0E, 0x10, 0x00, 0x03, b'h', b'i', b'!', 0x99,
        ];
        let mut reader = WireReader::new(&buf);
        let record = RecordCodec::decode_record(&mut reader).unwrap();

        assert_eq!(record.record_type, RecordType::TXT);
        assert_eq!(record.ttl, 3600);
        assert_eq!(record.rdata, b"hi!");
        assert_eq!(reader.position(), 14);
    }

    #[test]
    fn test_rdlength_beyond_buffer_is_truncated() {
        let buf = [0, 0x00, 0x01, 0x00, 0x01, 0, 0, 0, 60, 0x00, 0x04, 1, 2];
        let mut reader = WireReader::new(&buf);
        assert!(matches!(
            RecordCodec::decode_record(&mut reader),
            Err(DomainError::TruncatedInput { offset: 11, needed: 2 })
        ));
    }

    #[test]
    fn test_oversized_rdata_is_rejected_before_writing() {
        let record = ResourceRecord::new(
            "big.example",
            RecordType::NULL,
            RecordClass::IN,
            0,
            vec![0; usize::from(u16::MAX) + 1],
        );
        let mut buf = Vec::new();
        assert_eq!(
            RecordCodec::encode_record(&record, &mut buf, &mut CompressionTable::new()),
            Err(DomainError::RdataTooLong(65536))
        );
        assert!(buf.is_empty());
    }
}
