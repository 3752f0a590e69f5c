use crate::error::CacheError;
use crate::seed;
use dns::ResourceRecord;
use domain_name_query_types::{NameQuery, QType};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_CAPACITY: usize = 1024;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

pub fn now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub record: ResourceRecord,
    pub expires: Timestamp,
}

impl CacheEntry {
    /// Seconds left before expiry, `None` once expired.
    pub fn remaining(&self, now: Timestamp) -> Option<u32> {
        if self.expires <= now {
            return None;
        }

        let left = self.expires - now;
        Some(left.min(u64::from(u32::MAX)) as u32)
    }

    /// The stored record advertising its remaining lifetime as ttl.
    pub fn live_record(&self, now: Timestamp) -> Option<ResourceRecord> {
        let ttl = self.remaining(now)?;
        let mut record = self.record.clone();
        record.ttl = ttl;

        Some(record)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CacheHit {
    /// A record of the asked type.
    Answer(ResourceRecord),
    /// A CNAME owned by the asked name.
    Alias(ResourceRecord),
}

/// Fixed-capacity record table, filled once and read-only afterwards.
#[derive(Debug)]
pub struct CacheStore {
    entries: Vec<CacheEntry>,
    capacity: usize,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl CacheStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    /// Adds a record living `record.ttl` seconds from `now`. Returns false
    /// when the table is full.
    pub fn insert(&mut self, record: ResourceRecord, now: Timestamp) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }

        let expires = now + u64::from(record.ttl);
        self.entries.push(CacheEntry { record, expires });
        true
    }

    /// Loads seed lines from `source`, returning the number of records added.
    pub fn load<R: BufRead>(&mut self, source: R, now: Timestamp) -> Result<usize, CacheError> {
        let mut added = 0;

        for (index, line) in source.lines().enumerate() {
            let line = line?;
            let record = seed::parse_line(&line).map_err(|source| CacheError::InvalidLine {
                line: index + 1,
                source,
            })?;

            let record = match record {
                Some(r) => r,
                None => continue,
            };

            if !self.insert(record, now) {
                tracing::warn!(
                    "cache full at {} entries, skipping seed line {}",
                    self.capacity,
                    index + 1
                );
                continue;
            }
            added += 1;
        }

        tracing::debug!("loaded {} cache records", added);
        Ok(added)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, now: Timestamp) -> Result<usize, CacheError> {
        let f = File::open(path)?;
        self.load(BufReader::new(f), now)
    }

    fn live<'a>(
        &'a self,
        name: &'a str,
        now: Timestamp,
    ) -> impl Iterator<Item = (&'a CacheEntry, ResourceRecord)> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.record.name == name)
            .filter_map(move |e| e.live_record(now).map(|r| (e, r)))
    }

    /// First live record with the query's name and type.
    pub fn lookup(&self, query: &NameQuery, now: Timestamp) -> Option<ResourceRecord> {
        self.live(&query.name, now)
            .find(|(e, _)| e.record.rtype == query.q_type)
            .map(|(_, r)| r)
    }

    /// First live record with the query's name whose type is either the
    /// query type or CNAME, in table order.
    pub fn lookup_or_alias(&self, query: &NameQuery, now: Timestamp) -> Option<CacheHit> {
        self.live(&query.name, now).find_map(|(e, r)| {
            if e.record.rtype == query.q_type {
                Some(CacheHit::Answer(r))
            } else if e.record.rtype == QType::Cname {
                Some(CacheHit::Alias(r))
            } else {
                None
            }
        })
    }
}
