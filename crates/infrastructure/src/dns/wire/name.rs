//! Domain name codec with message compression (RFC 1035 §4.1.4).
//!
//! A name is a run of length-prefixed labels ended either by a zero byte or
//! by a two-byte pointer whose top bits are `11` and whose low 14 bits are
//! an offset from the start of the message.

use super::reader::WireReader;
use super::{MAX_LABEL_LEN, MAX_NAME_LEN};
use bytes::BufMut;
use dns_relay_domain::DomainError;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub const POINTER_FLAG: u8 = 0xC0;

/// Largest offset a compression pointer can carry.
pub const MAX_POINTER_OFFSET: usize = 0x3FFF;

const MAX_POINTER_HOPS: usize = MAX_NAME_LEN / 2 + 1;

/// Names (and name suffixes) already written during one message encode,
/// keyed by their text and mapped to the offset of their first label.
#[derive(Debug, Default)]
pub struct CompressionTable {
    offsets: FxHashMap<String, u16>,
}

impl CompressionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, suffix: &str) -> Option<u16> {
        self.offsets.get(suffix).copied()
    }

    /// Remembers `suffix` at `offset`. Offsets a pointer cannot address are
    /// ignored, and the first recorded offset for a suffix wins.
    pub fn record(&mut self, suffix: &str, offset: usize) {
        if offset > MAX_POINTER_OFFSET || self.offsets.contains_key(suffix) {
            return;
        }
        self.offsets.insert(suffix.to_owned(), offset as u16);
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

pub struct NameCodec;

impl NameCodec {
    /// Appends `name` to `buf`, which must hold the message from its first
    /// byte so that `buf.len()` is the absolute write offset.
    ///
    /// Each remaining suffix is looked up in `table` before its first label
    /// is written; a hit ends the name with a pointer and no zero label.
    pub fn encode(
        name: &str,
        buf: &mut Vec<u8>,
        table: &mut CompressionTable,
    ) -> Result<(), DomainError> {
        let name = name.strip_suffix('.').unwrap_or(name);
        let labels = split_labels(name)?;

        let mut suffix_start = 0;
        for label in labels {
            let suffix = &name[suffix_start..];
            if let Some(offset) = table.lookup(suffix) {
                buf.put_u16((u16::from(POINTER_FLAG) << 8) | offset);
                return Ok(());
            }

            table.record(suffix, buf.len());
            buf.put_u8(label.len() as u8);
            buf.put_slice(label.as_bytes());
            suffix_start += label.len() + 1;
        }

        buf.put_u8(0);
        Ok(())
    }

    /// Reads the name starting at the reader's position and leaves the
    /// reader just past the name's in-place bytes (after the first pointer,
    /// if any).
    ///
    /// Every pointer must target an offset strictly below the lowest offset
    /// visited so far, which forbids self-references and loops, and at most
    /// `MAX_POINTER_HOPS` pointers are followed.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<String, DomainError> {
        let buf = reader.buffer();
        let mut labels: SmallVec<[&[u8]; 8]> = SmallVec::new();
        let mut pos = reader.position();
        let mut floor = pos;
        let mut resume_at: Option<usize> = None;
        let mut hops = 0;
        let mut wire_len = 1;

        loop {
            let length = *buf.get(pos).ok_or(DomainError::TruncatedInput {
                offset: pos,
                needed: 1,
            })?;

            match length & POINTER_FLAG {
                POINTER_FLAG => {
                    let low = *buf.get(pos + 1).ok_or(DomainError::TruncatedInput {
                        offset: pos + 1,
                        needed: 1,
                    })?;
                    let target = (usize::from(length & !POINTER_FLAG) << 8) | usize::from(low);

                    if target >= floor || hops >= MAX_POINTER_HOPS {
                        return Err(DomainError::CompressionPointerCycle {
                            offset: pos,
                            target,
                        });
                    }

                    hops += 1;
                    resume_at.get_or_insert(pos + 2);
                    floor = target;
                    pos = target;
                }
                0x00 if length == 0 => {
                    pos += 1;
                    break;
                }
                0x00 => {
                    let mut label_reader = WireReader::at(buf, pos + 1);
                    let label = label_reader.read_bytes(usize::from(length))?;

                    wire_len += label.len() + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(DomainError::InvalidDomainName(format!(
                            "name at offset {} exceeds {} bytes",
                            reader.position(),
                            MAX_NAME_LEN
                        )));
                    }

                    labels.push(label);
                    pos = label_reader.position();
                }
                _ => {
                    return Err(DomainError::InvalidLabelLength {
                        offset: pos,
                        length,
                    })
                }
            }
        }

        reader.seek(resume_at.unwrap_or(pos));
        Ok(join_labels(&labels))
    }
}

fn split_labels(name: &str) -> Result<SmallVec<[&str; 8]>, DomainError> {
    if name.is_empty() {
        return Ok(SmallVec::new());
    }

    let labels: SmallVec<[&str; 8]> = name.split('.').collect();
    let mut wire_len = 1;

    for label in &labels {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "empty label in '{}'",
                name
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' is longer than {} bytes",
                label, MAX_LABEL_LEN
            )));
        }
        wire_len += label.len() + 1;
    }

    if wire_len > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' is longer than {} bytes on the wire",
            name, MAX_NAME_LEN
        )));
    }

    Ok(labels)
}

fn join_labels(labels: &[&[u8]]) -> String {
    let mut name = String::with_capacity(labels.iter().map(|l| l.len() + 1).sum());
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            name.push('.');
        }
        name.push_str(&String::from_utf8_lossy(label));
    }
    name
}
