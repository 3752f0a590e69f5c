use crate::error::{DnsError, Result};
use crate::name::{decode_name, encode_name, read_name, write_name};
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use domain_name_query_types::{QClass, QType};
use std::convert::TryFrom;
use std::io::Cursor;
use std::net::Ipv4Addr;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: QType,
    pub rclass: QClass,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    pub fn a(name: &str, ttl: u32, addr: Ipv4Addr) -> Self {
        Self {
            name: name.to_string(),
            rtype: QType::A,
            rclass: QClass::In,
            ttl,
            rdata: addr.octets().to_vec(),
        }
    }

    pub fn cname(name: &str, ttl: u32, target: &str) -> Result<Self> {
        let record = Self {
            name: name.to_string(),
            rtype: QType::Cname,
            rclass: QClass::In,
            ttl,
            rdata: encode_name(target)?,
        };

        Ok(record)
    }

    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if self.rtype != QType::A || self.rdata.len() != 4 {
            return None;
        }

        let addr = [self.rdata[0], self.rdata[1], self.rdata[2], self.rdata[3]];
        Some(Ipv4Addr::from(addr))
    }

    /// The alias target of a CNAME record.
    pub fn cname_target(&self) -> Result<Option<String>> {
        if self.rtype != QType::Cname {
            return Ok(None);
        }

        let (target, _) = decode_name(&self.rdata, 0)?;
        Ok(Some(target))
    }

    /// Writes name, type and class, then ttl and rdata unless `query_only`.
    pub fn to_bytes(&self, bytes: &mut Vec<u8>, query_only: bool) -> Result<()> {
        write_name(&self.name, bytes)?;
        bytes.write_u16::<BE>(self.rtype.num())?;
        bytes.write_u16::<BE>(self.rclass.num())?;

        if query_only {
            return Ok(());
        }

        let rdlength =
            u16::try_from(self.rdata.len()).map_err(|_| DnsError::RdataTooLong(self.rdata.len()))?;
        bytes.write_u32::<BE>(self.ttl)?;
        bytes.write_u16::<BE>(rdlength)?;
        bytes.extend_from_slice(&self.rdata);

        Ok(())
    }

    /// Reads one record at the cursor. With `query_only` the ttl and rdata
    /// are absent from the wire and left zero and empty.
    ///
    /// CNAME rdata is stored uncompressed, so a record taken out of its
    /// message still decodes.
    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>, query_only: bool) -> Result<Self> {
        let name = read_name(rdr)?;
        let rtype = QType::new(rdr.read_u16::<BE>()?);
        let rclass = QClass::new(rdr.read_u16::<BE>()?);

        let mut record = Self {
            name,
            rtype,
            rclass,
            ttl: 0,
            rdata: Vec::new(),
        };

        if query_only {
            return Ok(record);
        }

        record.ttl = rdr.read_u32::<BE>()?;
        let rdlength = usize::from(rdr.read_u16::<BE>()?);

        let wire = *rdr.get_ref();
        let rdata_begin = rdr.position() as usize;
        let rdata_end = rdata_begin + rdlength;
        let rdata = wire
            .get(rdata_begin..rdata_end)
            .ok_or(DnsError::Truncated)?;

        record.rdata = if rtype == QType::Cname {
            let (target, _) = decode_name(wire, rdata_begin)?;
            encode_name(&target)?
        } else {
            rdata.to_vec()
        };
        rdr.set_position(rdata_end as u64);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_record_to_bytes() {
        let rr = ResourceRecord::a("z.cn", 300, Ipv4Addr::new(1, 2, 3, 4));
        let mut bytes = vec![];
        rr.to_bytes(&mut bytes, false).unwrap();

        let expected = [
            1, 122, 2, 99, 110, 0, // name
            0, 1, 0, 1, // type, class
            0, 0, 1, 44, // ttl
            0, 4, 1, 2, 3, 4, // rdata
        ];
        assert_eq!(bytes, expected);

        let mut question = vec![];
        rr.to_bytes(&mut question, true).unwrap();
        assert_eq!(question, &expected[..10]);
    }

    #[test]
    fn parse_a_record() {
        let bytes: &[u8] = &[
            1, 122, 2, 99, 110, 0, 0, 1, 0, 1, 0, 0, 1, 44, 0, 4, 1, 2, 3, 4, 0xee,
        ];
        let mut rdr = Cursor::new(bytes);
        let rr = ResourceRecord::parse_from_reader(&mut rdr, false).unwrap();

        assert_eq!(rr.name, "z.cn");
        assert_eq!(rr.ttl, 300);
        assert_eq!(rr.ipv4(), Some(Ipv4Addr::new(1, 2, 3, 4)));
        assert_eq!(rdr.position(), 20);
    }

    #[test]
    fn parse_query_only_skips_ttl() {
        let bytes: &[u8] = &[1, 122, 2, 99, 110, 0, 0, 5, 0, 1];
        let mut rdr = Cursor::new(bytes);
        let rr = ResourceRecord::parse_from_reader(&mut rdr, true).unwrap();

        assert_eq!(rr.rtype, QType::Cname);
        assert_eq!(rr.ttl, 0);
        assert!(rr.rdata.is_empty());
        assert_eq!(rdr.position(), 10);
    }

    #[test]
    fn parse_compressed_cname_rdata() {
        // target.example at 0, then alias record whose rdata points at it
        let mut wire = encode_name("target.example").unwrap();
        let record_at = wire.len();
        wire.extend_from_slice(&[5, b'a', b'l', b'i', b'a', b's', 0xc0, 7]);
        wire.extend_from_slice(&[0, 5, 0, 1, 0, 0, 0, 60, 0, 2, 0xc0, 0]);

        let mut rdr = Cursor::new(&wire[..]);
        rdr.set_position(record_at as u64);
        let rr = ResourceRecord::parse_from_reader(&mut rdr, false).unwrap();

        assert_eq!(rr.name, "alias.example");
        assert_eq!(rr.cname_target().unwrap().as_deref(), Some("target.example"));
        assert_eq!(rr.rdata, encode_name("target.example").unwrap());
        assert_eq!(rdr.position() as usize, wire.len());
    }

    #[test]
    fn parse_truncated_rdata() {
        let bytes: &[u8] = &[0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 4, 1, 2];
        let mut rdr = Cursor::new(bytes);
        let err = ResourceRecord::parse_from_reader(&mut rdr, false).unwrap_err();
        assert!(matches!(err, DnsError::Truncated));
    }

    #[test]
    fn ipv4_requires_a_type() {
        let rr = ResourceRecord::cname("a.example", 1, "b.example").unwrap();
        assert_eq!(rr.ipv4(), None);
        assert_eq!(rr.cname_target().unwrap().as_deref(), Some("b.example"));

        let rr = ResourceRecord::a("a.example", 1, Ipv4Addr::LOCALHOST);
        assert_eq!(rr.cname_target().unwrap(), None);
    }
}
