//! Tiered fetcher
//!
//! Tries each transport tier in order and stops at the first one that
//! produces a response.

use crate::config::FetchConfig;
use crate::fetch::transport::{
    AttemptOutcome, DirectTransport, Headers, ProxyTransport, Timeouts, Transport,
};
use std::fmt;
use tracing::{debug, info, warn};

/// The only status the proxy tier treats as success
pub const SUCCESS_STATUS: u16 = 200;

/// What a tier does with the status code of a response it obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Return the body without looking at the status
    Ignore,
    /// Emit a diagnostic for any status other than 200, then return the body
    Report,
}

struct Tier {
    transport: Box<dyn Transport>,
    status_policy: StatusPolicy,
}

/// Fetches raw page bytes through an ordered list of transport tiers
///
/// # Example
///
/// ```no_run
/// use post_hydrator::config::FetchConfig;
/// use post_hydrator::fetch::{Fetcher, Headers};
///
/// # async fn run() {
/// let fetcher = Fetcher::from_config(&FetchConfig::default()).unwrap();
/// let body = fetcher.fetch("https://example.com/", &Headers::new()).await;
/// # }
/// ```
pub struct Fetcher {
    tiers: Vec<Tier>,
}

impl Fetcher {
    /// Creates a fetcher with no tiers; every fetch returns `None`
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Appends a tier, tried after all tiers added before it
    pub fn with_tier<T>(mut self, transport: T, status_policy: StatusPolicy) -> Self
    where
        T: Transport + 'static,
    {
        self.tiers.push(Tier {
            transport: Box::new(transport),
            status_policy,
        });
        self
    }

    /// Builds the standard chain: direct first, then the proxy if one is
    /// configured
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let timeouts = Timeouts::from(config);
        let mut fetcher =
            Self::new().with_tier(DirectTransport::new(&timeouts)?, StatusPolicy::Ignore);

        match &config.proxy_url {
            Some(proxy_url) => {
                let proxy = ProxyTransport::new(proxy_url.clone(), timeouts);
                info!(proxy = proxy.proxy_url(), "Proxy fallback tier enabled");
                fetcher = fetcher.with_tier(proxy, StatusPolicy::Report);
            }
            None => {
                info!("No proxy-url configured; direct failures will not be retried");
            }
        }

        Ok(fetcher)
    }

    /// Names of the configured tiers, in the order they are tried
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|tier| tier.transport.name()).collect()
    }

    /// Fetches `url` with `headers`
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - Body from the first tier that got a response,
    ///   whatever its status code
    /// * `None` - Every tier failed
    pub async fn fetch(&self, url: &str, headers: &Headers) -> Option<Vec<u8>> {
        for tier in &self.tiers {
            let name = tier.transport.name();
            debug!(tier = name, url = %url, "Attempting fetch");

            match tier.transport.attempt(url, headers).await {
                AttemptOutcome::Fetched { status, body } => {
                    if tier.status_policy == StatusPolicy::Report && status != SUCCESS_STATUS {
                        warn!("{}", status_diagnostic(status, url));
                    }
                    debug!(tier = name, status, bytes = body.len(), "Fetch complete");
                    return Some(body);
                }
                AttemptOutcome::Failed { reason } => {
                    warn!(tier = name, url = %url, reason = %reason, "Fetch attempt failed");
                }
            }
        }

        None
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("tiers", &self.tier_names())
            .finish()
    }
}

/// Diagnostic line for a non-success status on a reporting tier
pub fn status_diagnostic(status: u16, url: &str) -> String {
    format!("{}: {}", status, url)
}
