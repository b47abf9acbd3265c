pub mod config;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod result;
pub mod text;

pub use config::SiteConfig;
pub use discovery::{LocationMap, discover_locations, discover_locations_in, resolve_href};
pub use error::{RetrievalError, ScanError};
pub use extraction::{ItemRecord, classify, extract_records, extract_records_in};
pub use fetch::{Fetch, HttpFetcher};
pub use result::Document;
