use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedLineError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("invalid ttl '{0}'")]
    InvalidTtl(String),
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    #[error("invalid name: {0}")]
    Name(#[from] dns::DnsError),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("seed line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: SeedLineError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
