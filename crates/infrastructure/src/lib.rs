//! DNS Relay Infrastructure Layer
pub mod dns;
