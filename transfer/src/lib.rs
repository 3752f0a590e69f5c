mod framing;
mod tcp_accept;

pub use framing::{read_message, write_message, MAX_FRAME_LEN};
pub use tcp_accept::tcp_accept;
