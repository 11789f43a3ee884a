pub mod forwarding;
pub mod server;
pub mod transport;
pub mod wire;

pub use forwarding::{ForwardingResolver, MessageBuilder, ResponseParser};
pub use server::DnsServerHandler;
pub use transport::{DnsTransport, TransportResponse, UdpTransport};
pub use wire::MessageCodec;
