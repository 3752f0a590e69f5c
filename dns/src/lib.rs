mod codes;
mod error;
mod header;
mod message;
mod name;
mod question;
mod request_message;
mod resource_record;

pub use codes::{OpCode, ResponseCode};
pub use error::{DnsError, Result};
pub use header::{Flags, Header, HEADER_LEN};
pub use message::{Message, MAX_MESSAGE_LEN};
pub use name::{
    decode_name, encode_name, read_name, write_name, MAX_LABEL_LEN, MAX_NAME_LEN,
    MAX_POINTER_HOPS,
};
pub use question::Question;
pub use request_message::{is_valid_request, parse_question, RequestMessage};
pub use resource_record::ResourceRecord;

pub use domain_name_query_types::{QClass, QType};

/// Builds a recursive query with a random id for `name`.
pub fn build_query(name: &str, qtype: QType) -> Result<Vec<u8>> {
    let request_msg = RequestMessage::new(name, qtype);
    let mut request_bytes: Vec<u8> = vec![];
    request_msg.to_bytes(&mut request_bytes)?;

    Ok(request_bytes)
}

pub fn parse_response(response_bytes: &[u8]) -> Result<Message> {
    Message::parse(response_bytes)
}
