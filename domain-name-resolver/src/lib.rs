mod error;
mod resolve;

pub use error::ResolveError;
pub use resolve::{extract_address, resolve, Resolver, DNS_PORT};
