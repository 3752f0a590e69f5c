use crate::codes::{OpCode, ResponseCode};
use crate::error::Result;
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::Cursor;

pub const HEADER_LEN: usize = 12;

const QR: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const OPCODE_SHIFT: u16 = 11;
const AA: u16 = 0x0400;
const TC: u16 = 0x0200;
const RD: u16 = 0x0100;
const RA: u16 = 0x0080;
const Z: u16 = 0x0040;
const AD: u16 = 0x0020;
const CD: u16 = 0x0010;
const RCODE_MASK: u16 = 0x000f;

/// The packed second word of the header:
///
/// ```text
/// |QR|   Opcode  |AA|TC|RD|RA| Z|AD|CD|   RCODE   |
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags(u16);

impl Flags {
    pub fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    fn get(&self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    fn set(&mut self, mask: u16, on: bool) {
        if on {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    pub fn is_response(&self) -> bool {
        self.get(QR)
    }

    pub fn set_response(&mut self, on: bool) {
        self.set(QR, on)
    }

    pub fn op_code(&self) -> OpCode {
        OpCode::new(((self.0 & OPCODE_MASK) >> OPCODE_SHIFT) as u8)
    }

    pub fn set_op_code(&mut self, op_code: OpCode) {
        let v = (u16::from(op_code.num()) << OPCODE_SHIFT) & OPCODE_MASK;
        self.0 = (self.0 & !OPCODE_MASK) | v;
    }

    pub fn authoritative(&self) -> bool {
        self.get(AA)
    }

    pub fn truncated(&self) -> bool {
        self.get(TC)
    }

    pub fn set_truncated(&mut self, on: bool) {
        self.set(TC, on)
    }

    pub fn recursion_desired(&self) -> bool {
        self.get(RD)
    }

    pub fn set_recursion_desired(&mut self, on: bool) {
        self.set(RD, on)
    }

    pub fn recursion_available(&self) -> bool {
        self.get(RA)
    }

    pub fn z(&self) -> bool {
        self.get(Z)
    }

    pub fn authentic_data(&self) -> bool {
        self.get(AD)
    }

    pub fn checking_disabled(&self) -> bool {
        self.get(CD)
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::new((self.0 & RCODE_MASK) as u8)
    }

    pub fn set_response_code(&mut self, code: ResponseCode) {
        let v = u16::from(code.num()) & RCODE_MASK;
        self.0 = (self.0 & !RCODE_MASK) | v;
    }
}

// 12 bytes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn new(id: u16, flags: Flags) -> Self {
        Self {
            id,
            flags,
            ..Self::default()
        }
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<()> {
        bytes.write_u16::<BE>(self.id)?;
        bytes.write_u16::<BE>(self.flags.bits())?;
        bytes.write_u16::<BE>(self.qdcount)?;
        bytes.write_u16::<BE>(self.ancount)?;
        bytes.write_u16::<BE>(self.nscount)?;
        bytes.write_u16::<BE>(self.arcount)?;

        Ok(())
    }

    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self> {
        let id = rdr.read_u16::<BE>()?;
        let flags = Flags::new(rdr.read_u16::<BE>()?);
        let qdcount = rdr.read_u16::<BE>()?;
        let ancount = rdr.read_u16::<BE>()?;
        let nscount = rdr.read_u16::<BE>()?;
        let arcount = rdr.read_u16::<BE>()?;

        let h = Self {
            id,
            flags,
            qdcount,
            ancount,
            nscount,
            arcount,
        };

        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_test() {
        let mut flags = Flags::new(0x0100);
        assert!(flags.recursion_desired());
        assert!(!flags.is_response());
        assert_eq!(flags.op_code(), OpCode::Query);

        flags.set_response(true);
        flags.set_response_code(ResponseCode::NameError);
        assert_eq!(flags.bits(), 0x8103);

        flags.set_op_code(OpCode::Status);
        assert_eq!(flags.op_code(), OpCode::Status);
        assert_eq!(flags.bits(), 0x9103);

        flags.set_recursion_desired(false);
        flags.set_truncated(true);
        assert_eq!(flags.bits(), 0x9203);
        assert_eq!(flags.response_code(), ResponseCode::NameError);
        assert!(!flags.z());
        assert!(!flags.authentic_data());
        assert!(!flags.checking_disabled());
    }

    #[test]
    fn reserved_and_dnssec_bits() {
        let flags = Flags::new(0x0070);
        assert!(flags.z());
        assert!(flags.authentic_data());
        assert!(flags.checking_disabled());
        assert_eq!(flags.response_code(), ResponseCode::NoError);
        assert!(!flags.recursion_available());

        let flags = Flags::new(0x0020);
        assert!(!flags.z());
        assert!(flags.authentic_data());
        assert!(!flags.checking_disabled());
    }

    #[test]
    fn parse_header_test() {
        let bytes: &[u8] = &[0x27, 0xd6, 0x81, 0x80, 0, 1, 0, 2, 0, 0, 0, 1];
        let mut rdr = Cursor::new(bytes);
        let h = Header::parse_from_reader(&mut rdr).unwrap();

        assert_eq!(h.id, 0x27d6);
        assert!(h.flags.is_response());
        assert!(h.flags.recursion_available());
        assert_eq!(h.qdcount, 1);
        assert_eq!(h.ancount, 2);
        assert_eq!(h.arcount, 1);

        let mut out = vec![];
        h.to_bytes(&mut out).unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn short_header_is_truncated() {
        let bytes: &[u8] = &[0x27, 0xd6, 0x81];
        let mut rdr = Cursor::new(bytes);
        let err = Header::parse_from_reader(&mut rdr).unwrap_err();
        assert!(matches!(err, crate::DnsError::Truncated));
    }
}
