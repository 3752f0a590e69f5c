use log::{debug, error};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Pause after an accept failure that is not tied to one connection.
pub const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

// Reference:
// https://github.com/tokio-rs/axum/blob/axum-v0.7.5/axum/src/serve.rs#L388
//
/// Accepts one TCP connection. `None` means this attempt failed and the
/// caller should try again.
pub async fn tcp_accept(listener: &TcpListener) -> Option<(TcpStream, SocketAddr)> {
    let e = match listener.accept().await {
        Ok(conn) => return Some(conn),
        Err(e) => e,
    };

    if let Some(pause) = accept_backoff(&e) {
        tokio::time::sleep(pause).await;
    }
    None
}

// Logs the failed accept and returns how long to wait before the next one.
fn accept_backoff(e: &io::Error) -> Option<Duration> {
    if is_connection_error(e) {
        debug!("TCP peer went away before accept, err: {}", e);
        None
    } else {
        // e.g. EMFILE
        error!("TCP accept error, err: {}", e);
        Some(ACCEPT_BACKOFF)
    }
}

fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
