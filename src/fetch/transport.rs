//! Transport implementations
//!
//! A transport performs one GET attempt and reports the outcome as a value.
//! Connection errors, timeouts, bad headers and body read errors all become
//! `AttemptOutcome::Failed` so the fetcher can decide what to do next.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Proxy};
use std::collections::HashMap;
use std::time::Duration;

/// Request headers, keyed by header name
pub type Headers = HashMap<String, String>;

/// Result of a single transport attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response arrived; the body is returned exactly as received
    Fetched {
        /// HTTP status code
        status: u16,
        /// Raw, undecoded response body
        body: Vec<u8>,
    },

    /// The attempt did not produce a response
    Failed {
        /// Error description
        reason: String,
    },
}

impl AttemptOutcome {
    /// Returns true if the attempt produced a response
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }
}

/// A way of issuing a GET request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Issues a GET for `url` carrying `headers`
    async fn attempt(&self, url: &str, headers: &Headers) -> AttemptOutcome;
}

/// Client timeouts; `None` keeps the reqwest default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Option<Duration>,
    pub connect: Option<Duration>,
}

impl Timeouts {
    fn apply(&self, mut builder: ClientBuilder) -> ClientBuilder {
        if let Some(request) = self.request {
            builder = builder.timeout(request);
        }
        if let Some(connect) = self.connect {
            builder = builder.connect_timeout(connect);
        }
        builder
    }
}

impl From<&FetchConfig> for Timeouts {
    fn from(config: &FetchConfig) -> Self {
        Self {
            request: config.timeout_secs.map(Duration::from_secs),
            connect: config.connect_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Builds the client used by the direct tier
///
/// The client ignores proxy environment variables; routing through a proxy
/// is the job of `ProxyTransport`.
///
/// # Example
///
/// ```no_run
/// use post_hydrator::fetch::{build_http_client, Timeouts};
///
/// let client = build_http_client(&Timeouts::default()).unwrap();
/// ```
pub fn build_http_client(timeouts: &Timeouts) -> Result<Client, reqwest::Error> {
    timeouts
        .apply(Client::builder().no_proxy().gzip(true).brotli(true))
        .build()
}

/// Converts a header mapping into a `HeaderMap`
///
/// Returns a description of the first invalid name or value.
pub fn build_header_map(headers: &Headers) -> Result<HeaderMap, String> {
    let mut header_map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("Invalid header name '{}': {}", name, e))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| format!("Invalid value for header '{}': {}", name, e))?;
        header_map.insert(header_name, header_value);
    }

    Ok(header_map)
}

/// Issues the GET and reads the whole body
async fn send_get(client: &Client, url: &str, headers: &Headers) -> AttemptOutcome {
    let header_map = match build_header_map(headers) {
        Ok(header_map) => header_map,
        Err(reason) => return AttemptOutcome::Failed { reason },
    };

    let mut request = client.get(url);
    if !header_map.is_empty() {
        request = request.headers(header_map);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            return AttemptOutcome::Failed {
                reason: describe_error(&e),
            }
        }
    };

    let status = response.status().as_u16();
    match response.bytes().await {
        Ok(body) => AttemptOutcome::Fetched {
            status,
            body: body.to_vec(),
        },
        Err(e) => AttemptOutcome::Failed {
            reason: format!("Failed to read body: {}", describe_error(&e)),
        },
    }
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// Plain request straight to the target host
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: Client,
}

impl DirectTransport {
    /// Creates a direct transport with its own client
    pub fn new(timeouts: &Timeouts) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(timeouts)?))
    }

    /// Creates a direct transport around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for DirectTransport {
    fn name(&self) -> &str {
        "direct"
    }

    async fn attempt(&self, url: &str, headers: &Headers) -> AttemptOutcome {
        send_get(&self.client, url, headers).await
    }
}

/// Request routed through a proxying intermediary
///
/// A fresh client is built for every attempt and dropped afterwards, so no
/// proxied connection outlives the fetch that needed it. Headers are only
/// attached when some were supplied; otherwise a plain GET goes out.
#[derive(Debug, Clone)]
pub struct ProxyTransport {
    proxy_url: String,
    timeouts: Timeouts,
}

impl ProxyTransport {
    pub fn new(proxy_url: impl Into<String>, timeouts: Timeouts) -> Self {
        Self {
            proxy_url: proxy_url.into(),
            timeouts,
        }
    }

    /// The proxy all requests are routed through
    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    fn build_client(&self) -> Result<Client, reqwest::Error> {
        let proxy = Proxy::all(self.proxy_url.as_str())?;
        self.timeouts
            .apply(Client::builder().proxy(proxy).gzip(true).brotli(true))
            .build()
    }
}

#[async_trait]
impl Transport for ProxyTransport {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn attempt(&self, url: &str, headers: &Headers) -> AttemptOutcome {
        let client = match self.build_client() {
            Ok(client) => client,
            Err(e) => {
                return AttemptOutcome::Failed {
                    reason: format!("Failed to build proxied client: {}", e),
                }
            }
        };

        send_get(&client, url, headers).await
    }
}
