mod record_class;
mod record_type;

pub use record_class::RecordClass;
pub use record_type::RecordType;

/// A resource record as carried in the answer section.
///
/// RDATA is kept opaque; its length travels on the wire as the 16-bit
/// RDLENGTH prefix and is always derived from `rdata.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,

    pub record_type: RecordType,

    pub record_class: RecordClass,

    pub ttl: u32,

    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        record_class: RecordClass,
        ttl: u32,
        rdata: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            record_class,
            ttl,
            rdata,
        }
    }
}
