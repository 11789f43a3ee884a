use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Truncated input: {needed} more byte(s) required at offset {offset}")]
    TruncatedInput { offset: usize, needed: usize },

    #[error("Invalid label length byte {length:#04x} at offset {offset}")]
    InvalidLabelLength { offset: usize, length: u8 },

    #[error("Compression pointer at offset {offset} targets offset {target}")]
    CompressionPointerCycle { offset: usize, target: usize },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("RDATA of {0} bytes exceeds the 65535-byte RDLENGTH limit")]
    RdataTooLong(usize),

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn upstream(message: impl Into<String>) -> Self {
        DomainError::UpstreamError(message.into())
    }
}
