use crate::error::{DnsError, Result};
use std::io::Cursor;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

/// Compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 64;

const POINTER_MASK: u8 = 0xc0;

/// Appends the wire form of `name` to `bytes` and returns the number of bytes
/// written. Empty labels are skipped, so "a..b" and "a.b." both encode as
/// "a.b" and "." encodes as the lone terminator.
pub fn write_name(name: &str, bytes: &mut Vec<u8>) -> Result<usize> {
    let start = bytes.len();

    for label in name.split('.').filter(|l| !l.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            bytes.truncate(start);
            return Err(DnsError::LabelTooLong(label.len()));
        }

        bytes.push(label.len() as u8);
        bytes.extend_from_slice(label.as_bytes());
    }

    bytes.push(0);

    let written = bytes.len() - start;
    if written > MAX_NAME_LEN {
        bytes.truncate(start);
        return Err(DnsError::NameTooLong(written));
    }

    Ok(written)
}

pub fn encode_name(name: &str) -> Result<Vec<u8>> {
    let mut qname = Vec::new();
    write_name(name, &mut qname)?;

    Ok(qname)
}

/// Decodes the name starting at `offset` in `wire`, following compression
/// pointers into earlier parts of the same message.
///
/// Returns the dotted name and the offset just past the name as it appears at
/// `offset`: one past the terminator, or two past the first pointer met.
pub fn decode_name(wire: &[u8], offset: usize) -> Result<(String, usize)> {
    let mut labels: Vec<String> = Vec::new();
    let mut encoded_len = 0;
    let mut pos = offset;
    let mut next_offset = None;
    let mut hops = 0;

    loop {
        let len = *wire.get(pos).ok_or(DnsError::Truncated)?;

        if len == 0 {
            pos += 1;
            break;
        }

        if len & POINTER_MASK == POINTER_MASK {
            let low = *wire.get(pos + 1).ok_or(DnsError::Truncated)?;
            let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);

            // strictly backwards, so every chain terminates
            if target >= pos {
                return Err(DnsError::ForwardPointer { at: pos, target });
            }
            hops += 1;
            if hops > MAX_POINTER_HOPS {
                return Err(DnsError::PointerLoop(MAX_POINTER_HOPS));
            }

            if next_offset.is_none() {
                next_offset = Some(pos + 2);
            }
            pos = target;
            continue;
        }

        if len & POINTER_MASK != 0 {
            return Err(DnsError::UnsupportedLabel(len));
        }

        let label_begin = pos + 1;
        let label_end = label_begin + usize::from(len);
        let label_bytes = wire
            .get(label_begin..label_end)
            .ok_or(DnsError::Truncated)?;

        encoded_len += 1 + label_bytes.len();
        if encoded_len + 1 > MAX_NAME_LEN {
            return Err(DnsError::NameTooLong(encoded_len + 1));
        }

        labels.push(String::from_utf8_lossy(label_bytes).to_string());
        pos = label_end;
    }

    let name = if labels.is_empty() {
        String::from(".")
    } else {
        labels.join(".")
    };

    Ok((name, next_offset.unwrap_or(pos)))
}

/// Reads a name at the cursor position and leaves the cursor just past it.
pub fn read_name(rdr: &mut Cursor<&[u8]>) -> Result<String> {
    let wire = *rdr.get_ref();
    let (name, next_offset) = decode_name(wire, rdr.position() as usize)?;
    rdr.set_position(next_offset as u64);

    Ok(name)
}
