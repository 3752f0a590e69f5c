use domain_name_cache::{now, Responder};
use std::io;
use tokio::net::{TcpListener, TcpStream, UdpSocket};

const MAX_REQUEST_SIZE: usize = 4096;

/// One datagram in, one datagram out, until the socket fails.
pub async fn serve_udp(sock: UdpSocket, responder: Responder) -> io::Result<()> {
    let mut buf = vec![0u8; MAX_REQUEST_SIZE];

    loop {
        let (request_len, peer) = match sock.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) if is_transient(&e) => continue,
            Err(e) => return Err(e),
        };
        tracing::debug!("udp request from {}, length: {}", peer, request_len);

        let response = responder.respond_udp(&buf[..request_len], now());
        if let Err(e) = sock.send_to(&response, peer).await {
            tracing::warn!("failed to send response to {}: {}", peer, e);
        }
    }
}

pub async fn serve_tcp(listener: TcpListener, responder: Responder) -> io::Result<()> {
    loop {
        let (stream, peer) = match transfer::tcp_accept(&listener).await {
            Some(conn) => conn,
            None => continue,
        };
        tracing::debug!("Accept a connection from {}", peer);

        let responder = responder.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &responder).await {
                tracing::debug!("connection from {} ended: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, responder: &Responder) -> io::Result<()> {
    while let Some(request) = transfer::read_message(&mut stream).await? {
        let response = responder.respond(&request, now());
        transfer::write_message(&mut stream, &response).await?;
    }

    Ok(())
}

// ICMP port unreachable from an earlier send surfaces as a reset on some platforms
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::ConnectionReset
    )
}
