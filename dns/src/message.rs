use crate::codes::ResponseCode;
use crate::error::{DnsError, Result};
use crate::header::Header;
use crate::question::Question;
use crate::resource_record::ResourceRecord;
use std::convert::TryFrom;
use std::io::Cursor;

/// Largest message that fits the 2-byte length prefix of stream transports.
pub const MAX_MESSAGE_LEN: usize = 65535;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    pub fn response_code(&self) -> ResponseCode {
        self.header.flags.response_code()
    }

    /// Answer, authority and additional records in wire order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }

    /// Serializes the message. The section counts written to the header are
    /// taken from the sections themselves, not from `self.header`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = self.header.clone();
        header.qdcount = section_count(self.questions.len())?;
        header.ancount = section_count(self.answers.len())?;
        header.nscount = section_count(self.authorities.len())?;
        header.arcount = section_count(self.additionals.len())?;

        let mut bytes = Vec::with_capacity(512);
        header.to_bytes(&mut bytes)?;
        for q in &self.questions {
            q.to_bytes(&mut bytes)?;
        }
        for rr in self.records() {
            rr.to_bytes(&mut bytes, false)?;
        }

        if bytes.len() > MAX_MESSAGE_LEN {
            return Err(DnsError::MessageTooLarge(bytes.len()));
        }

        Ok(bytes)
    }

    pub fn parse(message: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(message);

        let header = Header::parse_from_reader(&mut reader)?;

        let mut questions = Vec::with_capacity(usize::from(header.qdcount.min(16)));
        for _ in 0..header.qdcount {
            questions.push(Question::parse_from_reader(&mut reader)?);
        }

        let answers = parse_section(&mut reader, header.ancount)?;
        let authorities = parse_section(&mut reader, header.nscount)?;
        let additionals = parse_section(&mut reader, header.arcount)?;

        let msg = Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        };

        Ok(msg)
    }
}

fn section_count(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| DnsError::TooManyRecords(len))
}

fn parse_section(rdr: &mut Cursor<&[u8]>, count: u16) -> Result<Vec<ResourceRecord>> {
    // a record takes at least 11 bytes, so a bogus count cannot force a huge allocation
    let remaining = rdr.get_ref().len().saturating_sub(rdr.position() as usize);
    let mut records = Vec::with_capacity(usize::from(count).min(remaining / 11));
    for _ in 0..count {
        records.push(ResourceRecord::parse_from_reader(rdr, false)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Flags;
    use domain_name_query_types::QType;
    use std::net::Ipv4Addr;

    // www.example.com A -> CNAME example.com (compressed) -> A 93.184.216.34
    const RESPONSE: [u8; 70] = [
        0x27, 0xd6, 0x81, 0x80, 0, 1, 0, 2, 0, 0, 0, 0, // header
        3, b'w', b'w', b'w', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
        0, 1, 0, 1, // question
        0xc0, 12, 0, 5, 0, 1, 0, 0, 0x0e, 0x10, 0, 2, 0xc0, 16, // CNAME
        0xc0, 16, 0, 1, 0, 1, 0, 0, 0x0e, 0x10, 0, 4, 93, 184, 216, 34, // A
        0, 0, 0, 0, 0, 0, 0, // trailing bytes are ignored
    ];

    #[test]
    fn parse_compressed_response() {
        let msg = Message::parse(&RESPONSE).unwrap();

        assert_eq!(msg.header.id, 0x27d6);
        assert_eq!(msg.response_code(), ResponseCode::NoError);
        assert_eq!(msg.questions.len(), 1);
        assert_eq!(msg.questions[0].name, "www.example.com");
        assert_eq!(msg.answers.len(), 2);

        let cname = &msg.answers[0];
        assert_eq!(cname.name, "www.example.com");
        assert_eq!(cname.rtype, QType::Cname);
        assert_eq!(cname.ttl, 3600);
        assert_eq!(cname.cname_target().unwrap().as_deref(), Some("example.com"));

        // the compressed owner name matches the suffix it points at
        let a = &msg.answers[1];
        assert_eq!(a.name, "example.com");
        assert_eq!(a.ipv4(), Some(Ipv4Addr::new(93, 184, 216, 34)));
        assert_eq!(msg.records().count(), 2);
    }

    #[test]
    fn counts_follow_sections() {
        let mut header = Header::new(7, Flags::new(0x8180));
        header.ancount = 9;
        let mut msg = Message::new(header);
        msg.questions.push(Question::new("a.example", QType::A));
        msg.answers
            .push(ResourceRecord::cname("a.example", 60, "b.example").unwrap());
        msg.answers
            .push(ResourceRecord::a("b.example", 60, Ipv4Addr::new(10, 0, 0, 1)));

        let bytes = msg.to_bytes().unwrap();
        assert_eq!(&bytes[4..12], &[0, 1, 0, 2, 0, 0, 0, 0]);

        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed.answers, msg.answers);
        assert_eq!(parsed.header.ancount, 2);
    }

    #[test]
    fn parse_fails_on_missing_record() {
        let mut bytes = RESPONSE[..63].to_vec();
        bytes[7] = 3;
        assert!(matches!(Message::parse(&bytes), Err(DnsError::Truncated)));
    }

    #[test]
    fn oversized_message_is_rejected() {
        let mut msg = Message::new(Header::default());
        let rr = ResourceRecord {
            rdata: vec![0; 65000],
            ..ResourceRecord::a("big.example", 1, Ipv4Addr::LOCALHOST)
        };
        msg.answers.push(rr.clone());
        msg.answers.push(rr);

        assert!(matches!(msg.to_bytes(), Err(DnsError::MessageTooLarge(_))));
    }
}
