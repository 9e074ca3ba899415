use serde::Deserialize;

/// Host serving the legacy post markup
pub const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Browser identification that gets served the static, legacy markup.
///
/// The double space after `compatible;` is part of the string.
pub const LEGACY_USER_AGENT: &str = "Mozilla/5.0 (compatible;  MSIE 7.01; Windows NT 5.0)";

/// Main configuration structure for Post-Hydrator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Which site to read posts from and how to present ourselves to it
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Scheme and host that post paths are appended to
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent on every tier
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Transport configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds (client default when unset)
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// Connect timeout in seconds (client default when unset)
    #[serde(rename = "connect-timeout-secs", default)]
    pub connect_timeout_secs: Option<u64>,

    /// Proxy used by the fallback tier; no fallback tier when unset
    #[serde(rename = "proxy-url", default)]
    pub proxy_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    LEGACY_USER_AGENT.to_string()
}
