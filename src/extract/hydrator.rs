//! Post hydration
//!
//! Builds the post URL, fetches it with the legacy user agent and hands the
//! markup to the field extraction rules.

use crate::config::Config;
use crate::extract::{parse_post, Post};
use crate::fetch::{Fetcher, Headers};
use crate::{HydrateError, Result};
use reqwest::header::USER_AGENT;
use tracing::{debug, info};
use url::Url;

/// Path under the base URL where posts live; any user name resolves
pub const STATUS_PATH: &str = "anyuser/status";

/// Fetches post pages and extracts `Post` records from them
#[derive(Debug)]
pub struct Hydrator {
    fetcher: Fetcher,
    base_url: Url,
    user_agent: String,
}

impl Hydrator {
    /// Creates a hydrator reading from `base_url`
    pub fn new(fetcher: Fetcher, base_url: &str, user_agent: impl Into<String>) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(base_url)?,
            user_agent: user_agent.into(),
        })
    }

    /// Creates a hydrator with the fetch chain and target from `config`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use post_hydrator::{Config, Hydrator};
    ///
    /// # async fn run() -> post_hydrator::Result<()> {
    /// let hydrator = Hydrator::from_config(&Config::default())?;
    /// if let Some(post) = hydrator.hydrate("20").await? {
    ///     println!("{}: {}", post.author_handle, post.body);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config.fetch)?;
        Self::new(fetcher, &config.target.base_url, config.target.user_agent.clone())
    }

    /// The fetcher used for every request
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// URL of the page for `post_id`
    pub fn post_url(&self, post_id: &str) -> Result<Url> {
        validate_post_id(post_id)?;
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}/{}", base, STATUS_PATH, post_id))?)
    }

    /// Fetches and extracts the post with the given id
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Post))` - The post, with every field populated
    /// * `Ok(None)` - Nothing was fetched, or the page shows no live post
    /// * `Err(HydrateError)` - Bad id, undecodable body, or a page whose
    ///   markup is missing required elements
    pub async fn hydrate(&self, post_id: &str) -> Result<Option<Post>> {
        let url = self.post_url(post_id)?;

        let mut headers = Headers::new();
        headers.insert(USER_AGENT.as_str().to_string(), self.user_agent.clone());

        let body = match self.fetcher.fetch(url.as_str(), &headers).await {
            Some(body) if !body.is_empty() => body,
            _ => {
                info!(post_id, url = %url, "No content fetched");
                return Ok(None);
            }
        };

        debug!(post_id, bytes = body.len(), "Parsing post page");
        let html = String::from_utf8(body)?;
        let post = parse_post(&html)?;

        match &post {
            Some(post) => info!(post_id, author = %post.author_handle, "Hydrated post"),
            None => info!(post_id, "Post unavailable (deleted or account suspended)"),
        }

        Ok(post)
    }
}

/// Hydrates `post_id` with the default configuration
pub async fn hydrate(post_id: &str) -> Result<Option<Post>> {
    Hydrator::from_config(&Config::default())?
        .hydrate(post_id)
        .await
}

/// Checks that a post id is a non-empty run of ASCII digits
pub fn validate_post_id(post_id: &str) -> Result<()> {
    if post_id.is_empty() || !post_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HydrateError::InvalidPostId(post_id.to_string()));
    }
    Ok(())
}
