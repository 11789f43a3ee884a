use dns_relay_infrastructure::dns::server::DnsServerHandler;
use dns_relay_infrastructure::dns::wire::MAX_UDP_MESSAGE_SIZE;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

/// Serves datagrams one at a time until Ctrl-C.
pub async fn start_dns_server(bind_addr: String, handler: DnsServerHandler) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = create_udp_socket(socket_addr)?;

    info!(bind_address = %socket_addr, "DNS relay listening");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut recv_buf = [0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            result = socket.recv_from(&mut recv_buf) => {
                match result {
                    Ok((n, from)) => {
                        debug!(client = %from, bytes = n, "Datagram received");

                        if let Some(response) = handler.handle_datagram(&recv_buf[..n]).await {
                            if let Err(e) = socket.send_to(&response, from).await {
                                warn!(client = %from, error = %e, "Failed to send reply");
                            }
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        error!(error = %e, "UDP recv error");
                    }
                }
            }
        }
    }

    Ok(())
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
