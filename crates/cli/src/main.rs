use clap::Parser;
use dns_relay_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "dns-relay")]
#[command(version)]
#[command(about = "DNS Relay - forwards each question of a UDP query to one upstream resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Upstream resolver (IP:PORT or HOSTNAME:PORT)
    #[arg(long, value_name = "HOST:PORT")]
    resolver: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Upstream query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.port,
        resolver: cli.resolver,
        timeout_ms: cli.timeout_ms,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting DNS Relay v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;

    server::start_dns_server(config.server.listen_addr(), dns_services.handler()).await?;

    info!("Server shutdown complete");
    Ok(())
}
