//! Feed acquisition: fetching raw bytes and turning them into records.
//!
//! The [`Fetcher`] trait is the I/O boundary; [`HttpFetcher`] is the only
//! production implementation.  Parsing lives in [`geojson`] and never
//! touches the network, so the loader can run `fetch` then `parse` on a
//! background thread and tests can swap in a scripted fetcher.

mod earthquake;
mod error;
pub mod geojson;
mod http;

pub use earthquake::Earthquake;
pub use error::{LoadError, NetworkError, ParseError};
pub use geojson::{parse, parse_feed, ParsedFeed};
pub use http::HttpFetcher;

/// Retrieves the raw bytes of a feed.
///
/// The loader calls [`fetch()`](Fetcher::fetch) on a background thread, so
/// implementations must be [`Send`] + [`Sync`].  One call is one round trip;
/// implementations must not retry.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}
