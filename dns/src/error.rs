use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DnsError {
    #[error("message truncated")]
    Truncated,
    #[error("label of {0} bytes exceeds 63")]
    LabelTooLong(usize),
    #[error("name of {0} bytes exceeds 255")]
    NameTooLong(usize),
    #[error("unsupported label type: {0:#04x}")]
    UnsupportedLabel(u8),
    #[error("compression pointer at {at} does not point backwards (target {target})")]
    ForwardPointer { at: usize, target: usize },
    #[error("compression pointer chain longer than {0} hops")]
    PointerLoop(usize),
    #[error("rdata of {0} bytes exceeds 65535")]
    RdataTooLong(usize),
    #[error("too many records in one section: {0}")]
    TooManyRecords(usize),
    #[error("message of {0} bytes exceeds 65535")]
    MessageTooLarge(usize),
    #[error("I/O error: {0}")]
    Io(io::Error),
}

// byteorder reports a short read as UnexpectedEof
impl From<io::Error> for DnsError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DnsError::Truncated
        } else {
            DnsError::Io(e)
        }
    }
}

pub type Result<T> = std::result::Result<T, DnsError>;
