use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock upstream answers each query.
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// NOERROR with one A record (TTL 60) for the queried name.
    Answer([u8; 4]),
    /// NXDOMAIN with an empty answer section.
    NxDomain,
    /// A reply with a foreign transaction ID first, then the real answer.
    StaleThenAnswer([u8; 4]),
    /// Holds the answer to the first query for `delay`, answers the rest
    /// immediately. Queries that arrive meanwhile queue in the socket.
    DelayedFirst { delay: Duration, addr: [u8; 4] },
    /// Swallows every query.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = queries.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let seen = counter.fetch_add(1, Ordering::SeqCst);
                            if let MockBehavior::DelayedFirst { delay, .. } = behavior {
                                if seen == 0 {
                                    tokio::time::sleep(delay).await;
                                }
                            }
                            for response in Self::build_mock_responses(&buf[..len], behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn build_mock_responses(query: &[u8], behavior: MockBehavior) -> Vec<Vec<u8>> {
        if query.len() < 12 {
            return vec![];
        }

        match behavior {
            MockBehavior::Answer(addr) => vec![Self::answer(query, addr)],
            MockBehavior::NxDomain => vec![Self::nxdomain(query)],
            MockBehavior::StaleThenAnswer(addr) => {
                let mut stale = Self::answer(query, [127, 0, 0, 99]);
                stale[0] = !query[0];
                vec![stale, Self::answer(query, addr)]
            }
            MockBehavior::DelayedFirst { addr, .. } => vec![Self::answer(query, addr)],
            MockBehavior::Silent => vec![],
        }
    }

    /// Echoes the question section and appends one A record whose name is a
    /// pointer to the first question name at offset 12.
    fn answer(query: &[u8], addr: [u8; 4]) -> Vec<u8> {
        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&query[0..2]);
        response.push(0x81);
        response.push(0x80);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&[0x00, 0x00]);
        response.extend_from_slice(&query[12..]);

        response.extend_from_slice(&[
            0xc0, 0x0c, // name: pointer to offset 12
            0x00, 0x01, // type A
            0x00, 0x01, // class IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04, // RDLENGTH
        ]);
        response.extend_from_slice(&addr);

        response
    }

    fn nxdomain(query: &[u8]) -> Vec<u8> {
        let mut response = Vec::with_capacity(query.len());

        response.extend_from_slice(&query[0..2]);
        response.push(0x81);
        response.push(0x83);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&[0x00; 6]);
        response.extend_from_slice(&query[12..]);

        response
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
