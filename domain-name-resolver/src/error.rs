use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("no response after {attempts} attempts of {timeout:?}")]
    Timeout { attempts: u32, timeout: Duration },
    #[error("bad message: {0}")]
    Dns(#[from] dns::DnsError),
}
