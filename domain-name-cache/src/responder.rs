use crate::store::{CacheHit, CacheStore, Timestamp};
use dns::{Flags, Header, Message, ResourceRecord, ResponseCode};
use domain_name_query_types::{Name, NameQuery};
use std::sync::Arc;

// https://datatracker.ietf.org/doc/html/rfc1035#section-4.2.1
const MAX_UDP_RESPONSE: usize = 512;

/// Answers queries from a read-only [`CacheStore`], chasing CNAME chains.
#[derive(Clone, Debug)]
pub struct Responder {
    cache: Arc<CacheStore>,
    max_udp_response: usize,
}

impl Responder {
    pub fn new(cache: Arc<CacheStore>) -> Self {
        Self {
            cache,
            max_udp_response: MAX_UDP_RESPONSE,
        }
    }

    /// Sets the UDP size limit. A reply never shrinks below its header, so
    /// limits under [`dns::HEADER_LEN`] act as that length.
    pub fn with_udp_limit(mut self, limit: usize) -> Self {
        self.max_udp_response = limit.max(dns::HEADER_LEN);
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Builds the wire response for one request. Every request gets an
    /// answer; malformed ones get a bare FORMERR header.
    pub fn respond(&self, request: &[u8], now: Timestamp) -> Vec<u8> {
        let response = self.build_response(request, now);
        encode(&response)
    }

    /// Like [`respond`](Self::respond), but a response over the UDP limit is
    /// cut back to header and question with TC set, or to the bare header
    /// when even that does not fit.
    pub fn respond_udp(&self, request: &[u8], now: Timestamp) -> Vec<u8> {
        let mut response = self.build_response(request, now);
        let bytes = encode(&response);
        if bytes.len() <= self.max_udp_response {
            return bytes;
        }

        tracing::debug!(
            "response of {} bytes exceeds {}, truncating",
            bytes.len(),
            self.max_udp_response
        );
        response.answers.clear();
        response.header.flags.set_truncated(true);
        let bytes = encode(&response);
        if bytes.len() <= self.max_udp_response {
            return bytes;
        }

        // limit below header plus question
        response.questions.clear();
        encode(&response)
    }

    pub fn build_response(&self, request: &[u8], now: Timestamp) -> Message {
        let id = read_u16(request, 0).unwrap_or(0);
        let request_flags = Flags::new(read_u16(request, 2).unwrap_or(0));

        let mut flags = Flags::default();
        flags.set_response(true);
        flags.set_recursion_desired(request_flags.recursion_desired());
        let mut response = Message::new(Header::new(id, flags));

        if !dns::is_valid_request(request) {
            tracing::debug!("invalid request {:#06x}, flags {:#06x}", id, request_flags.bits());
            response.header.flags.set_response_code(ResponseCode::FormatError);
            return response;
        }

        let question = match dns::parse_question(request) {
            Ok(q) => q,
            Err(e) => {
                tracing::debug!("undecodable question in request {:#06x}: {}", id, e);
                response.header.flags.set_response_code(ResponseCode::FormatError);
                return response;
            }
        };

        let query = question.name_query();
        let (answers, code) = self.chase(&query, now);
        tracing::debug!("query {} -> {:?}, {} answers", query, code, answers.len());

        response.header.flags.set_response_code(code);
        response.questions.push(question);
        response.answers = answers;
        response
    }

    /// Follows CNAMEs from `query.name` until a record of the query type is
    /// found or the chain ends.
    ///
    /// Without a terminal record the code is NXDOMAIN. Aliases collected
    /// before the chain broke or looped stay in the answers.
    fn chase(&self, query: &NameQuery, now: Timestamp) -> (Vec<ResourceRecord>, ResponseCode) {
        let mut answers = Vec::new();
        let mut visited: Vec<Name> = Vec::new();
        let mut sought = query.clone();

        loop {
            match self.cache.lookup_or_alias(&sought, now) {
                Some(CacheHit::Answer(rr)) => {
                    answers.push(rr);
                    return (answers, ResponseCode::NoError);
                }
                Some(CacheHit::Alias(rr)) => {
                    let target = match rr.cname_target() {
                        Ok(Some(t)) => t,
                        _ => break,
                    };
                    answers.push(rr);
                    visited.push(sought.name);

                    sought = NameQuery::new(&target, query.q_type);
                    if visited.contains(&sought.name) {
                        tracing::warn!("CNAME loop at {}", sought.name);
                        break;
                    }
                }
                None => break,
            }
        }

        (answers, ResponseCode::NameError)
    }
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let b = bytes.get(at..at + 2)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

fn encode(response: &Message) -> Vec<u8> {
    match response.to_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("failed to encode response {:#06x}: {}", response.header.id, e);
            let mut header = Header::new(response.header.id, response.header.flags);
            header.flags.set_response_code(ResponseCode::ServerFailure);
            let mut bytes = Vec::with_capacity(dns::HEADER_LEN);
            // a bare header always encodes
            let _ = header.to_bytes(&mut bytes);
            bytes
        }
    }
}
