use crate::error::SeedLineError;
use dns::ResourceRecord;
use domain_name_query_types::{canonicalize, QClass, QType};
use std::net::Ipv4Addr;

/// Parses one `<name> <ttl> <class> <type> <data>` line into a record whose
/// ttl is the advertised lifetime. Blank lines and comments give `None`.
///
/// Types other than A and CNAME are kept with type 0 and no rdata.
pub fn parse_line(line: &str) -> Result<Option<ResourceRecord>, SeedLineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let mut next_field = |field: &'static str| fields.next().ok_or(SeedLineError::MissingField(field));

    let name = canonicalize(next_field("name")?);
    let ttl_text = next_field("ttl")?;
    let ttl = ttl_text
        .parse::<u32>()
        .map_err(|_| SeedLineError::InvalidTtl(ttl_text.to_string()))?;
    let rclass = next_field("class")?.parse::<QClass>().unwrap_or(QClass::Other(0));
    let rtype = next_field("type")?.parse::<QType>().unwrap_or(QType::Other(0));
    let data = next_field("data")?;

    let rdata = match rtype {
        QType::A => {
            let addr = data
                .parse::<Ipv4Addr>()
                .map_err(|_| SeedLineError::InvalidAddress(data.to_string()))?;
            addr.octets().to_vec()
        }
        QType::Cname => dns::encode_name(&canonicalize(data))?,
        QType::Other(_) => Vec::new(),
    };

    let record = ResourceRecord {
        name,
        rtype,
        rclass,
        ttl,
        rdata,
    };

    Ok(Some(record))
}
