use crate::error::ResolveError;
use bytes::BytesMut;
use dns::{Message, QType, RequestMessage};
use domain_name_query_types::canonicalize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

pub const DNS_PORT: u16 = 53;

// https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1
//
// Messages carried by UDP are restricted to 512 bytes (not counting the IP
// or UDP headers).
const MAX_RESPONSE_SIZE: usize = 512;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_ATTEMPTS: u32 = 2;

/// Sends A queries to one upstream server and reads back the address.
#[derive(Clone, Debug)]
pub struct Resolver {
    upstream: SocketAddr,
    timeout: Duration,
    attempts: u32,
}

impl Resolver {
    pub fn new(upstream: SocketAddr) -> Self {
        Self {
            upstream,
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    pub async fn lookup(&self, name: &str) -> Result<Option<Ipv4Addr>, ResolveError> {
        let name = canonicalize(name);
        tracing::debug!("resolving domain: {} via {}", name, self.upstream);

        let request = RequestMessage::new(&name, QType::A);
        let mut request_bytes = vec![];
        request.to_bytes(&mut request_bytes)?;

        let response_bytes = self.exchange(request.id(), &request_bytes).await?;
        let resp = dns::parse_response(&response_bytes)?;

        match extract_address(&resp, &name) {
            None => {
                tracing::debug!(
                    "udp response has no address among {} records, rcode {:?}",
                    resp.records().count(),
                    resp.response_code()
                );
                Ok(None)
            }
            Some(addr) => {
                tracing::debug!("resolved {} to {}", name, addr);
                Ok(Some(addr))
            }
        }
    }

    async fn exchange(&self, id: u16, request_bytes: &[u8]) -> Result<Vec<u8>, ResolveError> {
        let local_addr = match self.upstream {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let sock = UdpSocket::bind(local_addr).await?;
        sock.connect(self.upstream).await?;

        for attempt in 1..=self.attempts {
            let _send_size = sock.send(request_bytes).await?;

            match self.receive(&sock, id).await? {
                Some(bytes) => return Ok(bytes),
                None => {
                    tracing::debug!("attempt {} of {} timed out", attempt, self.attempts);
                }
            }
        }

        Err(ResolveError::Timeout {
            attempts: self.attempts,
            timeout: self.timeout,
        })
    }

    // Waits for a datagram carrying `id`, `None` on timeout. Datagrams with
    // another id belong to no query of ours and are dropped.
    async fn receive(&self, sock: &UdpSocket, id: u16) -> Result<Option<Vec<u8>>, ResolveError> {
        let deadline = Instant::now() + self.timeout;
        let mut resp_buf = BytesMut::with_capacity(MAX_RESPONSE_SIZE);

        loop {
            resp_buf.clear();
            let response_size = match timeout_at(deadline, sock.recv_buf(&mut resp_buf)).await {
                Ok(r) => r?,
                Err(_) => return Ok(None),
            };
            let response_bytes = &resp_buf[0..response_size];
            tracing::debug!("received udp response, length: {}", response_size);

            if response_bytes.len() >= 2 && response_bytes[0..2] == id.to_be_bytes() {
                return Ok(Some(response_bytes.to_vec()));
            }
            tracing::debug!("dropping response with unexpected id");
        }
    }
}

/// Scans answer, authority and additional records in order for an A record
/// of `name`, switching to the target of each CNAME of the sought name.
/// Scanning stops at the first record owned by any other name.
pub fn extract_address(resp: &Message, name: &str) -> Option<Ipv4Addr> {
    let mut sought = canonicalize(name);

    for rr in resp.records() {
        if canonicalize(&rr.name) != sought {
            break;
        }

        match rr.rtype {
            QType::A => {
                if let Some(addr) = rr.ipv4() {
                    return Some(addr);
                }
            }
            QType::Cname => {
                if let Ok(Some(target)) = rr.cname_target() {
                    sought = canonicalize(&target);
                }
            }
            QType::Other(_) => {}
        }
    }

    None
}

/// Resolves `name` through `server` on port 53 and returns the address as a
/// dotted quad. Transport failures are logged and reported as `None`, the
/// same as a name without an address.
pub async fn resolve(name: &str, server: IpAddr) -> Option<String> {
    let resolver = Resolver::new(SocketAddr::new(server, DNS_PORT));

    match resolver.lookup(name).await {
        Ok(addr) => addr.map(|a| a.to_string()),
        Err(e) => {
            tracing::warn!("resolving {} via {} failed: {}", name, server, e);
            None
        }
    }
}
