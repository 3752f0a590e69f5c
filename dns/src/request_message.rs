use crate::codes::OpCode;
use crate::error::Result;
use crate::header::{Flags, Header, HEADER_LEN};
use crate::question::Question;
use domain_name_query_types::QType;
use std::io::Cursor;

// rd = 1 asks the upstream to recurse, so one exchange is enough
const QUERY_FLAGS: u16 = 0x0100;

pub struct RequestMessage {
    header: Header,
    question: Question,
}

impl RequestMessage {
    pub fn new(name: &str, qtype: QType) -> Self {
        Self::with_id(fastrand::u16(..), name, qtype)
    }

    pub fn with_id(id: u16, name: &str, qtype: QType) -> Self {
        let mut header = Header::new(id, Flags::new(QUERY_FLAGS));
        header.qdcount = 1;
        let question = Question::new(name, qtype);

        Self { header, question }
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<()> {
        self.header.to_bytes(bytes)?;
        self.question.to_bytes(bytes)?;

        Ok(())
    }
}

/// A request is served only if it is a standard query (QR clear, opcode 0)
/// carrying exactly one question.
pub fn is_valid_request(request: &[u8]) -> bool {
    let mut rdr = Cursor::new(request);
    let header = match Header::parse_from_reader(&mut rdr) {
        Ok(h) => h,
        Err(_) => return false,
    };

    !header.flags.is_response() && header.flags.op_code() == OpCode::Query && header.qdcount == 1
}

/// Reads the question that follows the fixed 12-byte header.
pub fn parse_question(request: &[u8]) -> Result<Question> {
    let mut rdr = Cursor::new(request);
    rdr.set_position(HEADER_LEN as u64);

    Question::parse_from_reader(&mut rdr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes_test() {
        let mut bytes: Vec<u8> = vec![];

        let msg = RequestMessage::with_id(209 * 256 + 183, "baidu.com", QType::A);
        msg.to_bytes(&mut bytes).unwrap();

        let expected = [
            209, 183, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, // header
            5, 98, 97, 105, 100, 117, 3, 99, 111, 109, 0, 0, 1, 0, 1, // question
        ];

        assert_eq!(bytes, expected);
    }

    #[test]
    fn random_id() {
        let msg = RequestMessage::new("example.com", QType::A);
        let mut bytes = vec![];
        msg.to_bytes(&mut bytes).unwrap();
        assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), msg.id());
    }

    fn query(flags: u16, qdcount: u16) -> Vec<u8> {
        let mut bytes = vec![0x12, 0x34];
        bytes.extend_from_slice(&flags.to_be_bytes());
        bytes.extend_from_slice(&qdcount.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
        bytes.extend_from_slice(&[1, b'x', 0, 0, 1, 0, 1]);
        bytes
    }

    #[test]
    fn validation() {
        assert!(is_valid_request(&query(0x0100, 1)));
        assert!(is_valid_request(&query(0x0000, 1)));
        // response bit
        assert!(!is_valid_request(&query(0x8100, 1)));
        // opcode STATUS
        assert!(!is_valid_request(&query(0x1000, 1)));
        assert!(!is_valid_request(&query(0x0100, 0)));
        assert!(!is_valid_request(&query(0x0100, 2)));
        assert!(!is_valid_request(&[0x12, 0x34, 0x01]));
    }

    #[test]
    fn parse_question_test() {
        let q = parse_question(&query(0x0100, 1)).unwrap();
        assert_eq!(q.name, "x");
        assert_eq!(q.qtype, QType::A);
        assert!(parse_question(&query(0x0100, 1)[..14]).is_err());
    }
}
