use crate::dns_protocol::UpstreamAddr;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Upstream resolver, `IP:PORT` or `HOSTNAME:PORT`.
    #[serde(default = "default_address")]
    pub address: String,

    /// Deadline for one upstream exchange.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn upstream_addr(&self) -> Result<UpstreamAddr, String> {
        self.address.parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_address() -> String {
    "8.8.8.8:53".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}
