//! Fetching module for post pages
//!
//! This module retrieves raw page bytes through an ordered list of
//! transport tiers:
//! - A direct request, tried first
//! - A proxied request, tried only when the direct one fails
//!
//! Transport failures never surface as errors. The caller gets the body from
//! the first tier that produced one, or `None` when every tier failed.

mod fetcher;
mod transport;

pub use fetcher::{status_diagnostic, Fetcher, StatusPolicy, SUCCESS_STATUS};
pub use transport::{
    build_header_map, build_http_client, AttemptOutcome, DirectTransport, Headers,
    ProxyTransport, Timeouts, Transport,
};
