use dns_relay_application::use_cases::HandleDnsQueryUseCase;
use dns_relay_domain::Config;
use dns_relay_infrastructure::dns::{DnsServerHandler, ForwardingResolver, UdpTransport};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let upstream = config
            .upstream
            .upstream_addr()
            .map_err(anyhow::Error::msg)?;

        let transport = UdpTransport::connect(&upstream).await?;

        info!(
            upstream = %upstream,
            resolved = %transport.server_addr(),
            timeout_ms = config.upstream.timeout_ms,
            "Upstream resolver configured"
        );

        let resolver = Arc::new(ForwardingResolver::new(
            Arc::new(transport),
            config.upstream.timeout(),
        ));

        Ok(Self {
            handler_use_case: Arc::new(HandleDnsQueryUseCase::new(resolver)),
        })
    }

    pub fn handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(self.handler_use_case.clone())
    }
}
