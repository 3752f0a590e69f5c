use crate::error::Result;
use crate::name::write_name;
use crate::resource_record::ResourceRecord;
use byteorder::{WriteBytesExt, BE};
use domain_name_query_types::{NameQuery, QClass, QType};
use std::io::Cursor;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Question {
    pub name: String,
    pub qtype: QType,
    pub qclass: QClass,
}

impl Question {
    pub fn new(name: &str, qtype: QType) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            qclass: QClass::In,
        }
    }

    pub fn name_query(&self) -> NameQuery {
        NameQuery::new(&self.name, self.qtype)
    }

    pub fn to_bytes(&self, bytes: &mut Vec<u8>) -> Result<()> {
        write_name(&self.name, bytes)?;
        bytes.write_u16::<BE>(self.qtype.num())?;
        bytes.write_u16::<BE>(self.qclass.num())?;

        Ok(())
    }

    // A question is a record without ttl and rdata.
    pub fn parse_from_reader(rdr: &mut Cursor<&[u8]>) -> Result<Self> {
        let rr = ResourceRecord::parse_from_reader(rdr, true)?;

        let q = Self {
            name: rr.name,
            qtype: rr.rtype,
            qclass: rr.rclass,
        };

        Ok(q)
    }
}
