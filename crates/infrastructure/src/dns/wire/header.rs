//! Header codec (RFC 1035 §4.1.1).
//!
//! ```text
//!   0  1  2  3  4  5  6  7  8  9 10 11 12 13 14 15
//! |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
//! ```
//!
//! The second 16-bit word is handled through one table of (shift, mask)
//! pairs shared by the encoder and the decoder.

use super::reader::WireReader;
use super::HEADER_LEN;
use dns_relay_domain::{DnsHeader, DomainError, OpCode, ResponseCode};

#[derive(Debug, Clone, Copy)]
struct FlagField {
    shift: u16,
    mask: u16,
}

impl FlagField {
    const fn new(shift: u16, mask: u16) -> Self {
        Self { shift, mask }
    }

    const fn get(self, flags: u16) -> u16 {
        (flags >> self.shift) & self.mask
    }

    const fn put(self, value: u16) -> u16 {
        (value & self.mask) << self.shift
    }

    fn get_bool(self, flags: u16) -> bool {
        self.get(flags) != 0
    }

    fn put_bool(self, value: bool) -> u16 {
        self.put(u16::from(value))
    }
}

const QR: FlagField = FlagField::new(15, 0x1);
const OPCODE: FlagField = FlagField::new(11, 0xF);
const AA: FlagField = FlagField::new(10, 0x1);
const TC: FlagField = FlagField::new(9, 0x1);
const RD: FlagField = FlagField::new(8, 0x1);
const RA: FlagField = FlagField::new(7, 0x1);
const Z: FlagField = FlagField::new(4, 0x7);
const RCODE: FlagField = FlagField::new(0, 0xF);

pub struct HeaderCodec;

impl HeaderCodec {
    /// Decodes the header at the start of `bytes`, returning it together
    /// with the number of bytes consumed (always 12).
    pub fn decode(bytes: &[u8]) -> Result<(DnsHeader, usize), DomainError> {
        let mut reader = WireReader::new(bytes);
        let header = Self::read(&mut reader)?;
        Ok((header, reader.position()))
    }

    pub(crate) fn read(reader: &mut WireReader<'_>) -> Result<DnsHeader, DomainError> {
        if reader.remaining() < HEADER_LEN {
            return Err(DomainError::TruncatedInput {
                offset: reader.position(),
                needed: HEADER_LEN - reader.remaining(),
            });
        }

        let id = reader.read_u16()?;
        let flags = reader.read_u16()?;

        Ok(DnsHeader {
            id,
            response: QR.get_bool(flags),
            opcode: OpCode::from(OPCODE.get(flags) as u8),
            authoritative: AA.get_bool(flags),
            truncated: TC.get_bool(flags),
            recursion_desired: RD.get_bool(flags),
            recursion_available: RA.get_bool(flags),
            z: Z.get(flags) as u8,
            response_code: ResponseCode::from(RCODE.get(flags) as u8),
            question_count: reader.read_u16()?,
            answer_count: reader.read_u16()?,
            authority_count: reader.read_u16()?,
            additional_count: reader.read_u16()?,
        })
    }

    /// Encodes `header` into exactly 12 bytes. The reserved Z bits are
    /// always written as zero; counts are written as given.
    pub fn encode(header: &DnsHeader) -> [u8; HEADER_LEN] {
        let flags = QR.put_bool(header.response)
            | OPCODE.put(u16::from(u8::from(header.opcode)))
            | AA.put_bool(header.authoritative)
            | TC.put_bool(header.truncated)
            | RD.put_bool(header.recursion_desired)
            | RA.put_bool(header.recursion_available)
            | Z.put(0)
            | RCODE.put(u16::from(u8::from(header.response_code)));

        let mut out = [0u8; HEADER_LEN];
        for (slot, word) in out.chunks_exact_mut(2).zip([
            header.id,
            flags,
            header.question_count,
            header.answer_count,
            header.authority_count,
            header.additional_count,
        ]) {
            slot.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}
