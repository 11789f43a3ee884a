use super::{RecordClass, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub record_type: RecordType,
    pub record_class: RecordClass,
}

impl Question {
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        record_class: RecordClass,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            record_class,
        }
    }
}
