mod error;
mod responder;
mod seed;
mod store;

pub use error::{CacheError, SeedLineError};
pub use responder::Responder;
pub use seed::parse_line;
pub use store::{now, CacheEntry, CacheHit, CacheStore, Timestamp, DEFAULT_CAPACITY};
