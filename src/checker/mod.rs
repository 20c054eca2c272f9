//! Checker module: the site-check pipeline
//!
//! This module contains the core check logic:
//! - HTTP fetching with a typed failure taxonomy
//! - Best-effort HTML extraction of H1, title and meta description
//! - The check service that stores one record per check
//! - The pipeline callers drive: register an address, then check it

mod fetcher;
mod parser;
mod pipeline;
mod service;

pub use fetcher::{build_http_client, fetch_url, FetchErrorKind, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{clip, extract, PageSummary, MAX_FIELD_LENGTH};
pub use pipeline::{Pipeline, Registration};
pub use service::{CheckOutcome, CheckService};
