//! Integration tests for fetching and hydrating posts
//!
//! These tests use wiremock mock servers as the post site and, for the
//! fallback tier, as the proxy.

use chrono::{Datelike, Timelike};
use post_hydrator::config::{FetchConfig, LEGACY_USER_AGENT};
use post_hydrator::fetch::{
    AttemptOutcome, DirectTransport, Fetcher, Headers, ProxyTransport, StatusPolicy, Timeouts,
    Transport,
};
use post_hydrator::{Config, ExtractError, HydrateError, Hydrator};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens here, so direct requests fail to connect
const UNREACHABLE_BASE: &str = "http://127.0.0.1:1";

const POST_PAGE: &str = r#"<html>
<head><title>Ferris on Twitter</title></head>
<body>
  <table class="main-tweet">
    <tr>
      <td class="user-info">
        <div class="fullname"><a href="/ferris"><strong class="fullname">Ferris the Crab</strong></a></div>
        <span class="username"><span>@</span>ferris</span>
      </td>
    </tr>
    <tr>
      <td colspan="2">
        <div class="tweet-text" data-id="20">
          <div class="dir-ltr" dir="ltr">Shipping today</div> <a class="twitter-hashtag">#rustlang</a>
        </div>
      </td>
    </tr>
    <tr>
      <td colspan="2">
        <div class="metadata"><a href="/ferris/status/20">3:15 PM - 04 Jul 2021</a></div>
      </td>
    </tr>
  </table>
</body>
</html>"#;

const SUSPENDED_PAGE: &str = r#"<html><body>
  <div class="system-flash">This account has been suspended.</div>
</body></html>"#;

const NO_USERNAME_PAGE: &str = r#"<html><body>
  <div class="fullname"><strong>Ferris the Crab</strong></div>
  <div class="tweet-text"><div>Shipping today</div></div>
  <div class="metadata"><a>3:15 PM - 04 Jul 2021</a></div>
</body></html>"#;

fn agent_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("User-Agent".to_string(), LEGACY_USER_AGENT.to_string());
    headers
}

fn direct_only(base_url: &str) -> Hydrator {
    let config = Config::default();
    let fetcher = Fetcher::from_config(&config.fetch).expect("Failed to build fetcher");
    Hydrator::new(fetcher, base_url, LEGACY_USER_AGENT).expect("Failed to build hydrator")
}

fn direct_then_proxy(base_url: &str, proxy_url: &str) -> Hydrator {
    let fetch = FetchConfig {
        proxy_url: Some(proxy_url.to_string()),
        ..Default::default()
    };
    let fetcher = Fetcher::from_config(&fetch).expect("Failed to build fetcher");
    Hydrator::new(fetcher, base_url, LEGACY_USER_AGENT).expect("Failed to build hydrator")
}

async fn serve_post(mock_server: &MockServer, post_id: &str, page: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/anyuser/status/{}", post_id)))
        .and(header("user-agent", LEGACY_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(page)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_hydrate_live_post() {
    let mock_server = MockServer::start().await;
    serve_post(&mock_server, "20", POST_PAGE, 200).await;

    let post = direct_only(&mock_server.uri())
        .hydrate("20")
        .await
        .expect("Hydration failed")
        .expect("Expected a post");

    assert_eq!(post.author_handle, "@ferris");
    assert_eq!(post.display_name, "Ferris the Crab");
    assert_eq!(post.body, "Shipping today #rustlang");
    assert_eq!(post.posted_at.hour(), 15);
    assert_eq!(post.posted_at.minute(), 15);
    assert_eq!(post.posted_at.day(), 4);
    assert_eq!(post.posted_at.month(), 7);
    assert_eq!(post.posted_at.year(), 2021);
}

#[tokio::test]
async fn test_hydrate_suspended_account_is_none() {
    let mock_server = MockServer::start().await;
    serve_post(&mock_server, "21", SUSPENDED_PAGE, 200).await;

    let post = direct_only(&mock_server.uri())
        .hydrate("21")
        .await
        .expect("Hydration should not fail");

    assert!(post.is_none());
}

#[tokio::test]
async fn test_hydrate_direct_error_status_is_parsed_anyway() {
    let mock_server = MockServer::start().await;
    serve_post(&mock_server, "22", SUSPENDED_PAGE, 404).await;

    let post = direct_only(&mock_server.uri())
        .hydrate("22")
        .await
        .expect("Hydration should not fail");

    assert!(post.is_none());
}

#[tokio::test]
async fn test_hydrate_missing_username_fails() {
    let mock_server = MockServer::start().await;
    serve_post(&mock_server, "23", NO_USERNAME_PAGE, 200).await;

    let err = direct_only(&mock_server.uri())
        .hydrate("23")
        .await
        .expect_err("Expected a malformed page error");

    assert!(matches!(
        err,
        HydrateError::Extract(ExtractError::MissingElement { .. })
    ));
}

#[tokio::test]
async fn test_hydrate_empty_body_is_none() {
    let mock_server = MockServer::start().await;
    serve_post(&mock_server, "24", "", 200).await;

    let post = direct_only(&mock_server.uri())
        .hydrate("24")
        .await
        .expect("Hydration should not fail");

    assert!(post.is_none());
}

#[tokio::test]
async fn test_hydrate_invalid_utf8_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/anyuser/status/25"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x3c, 0xff, 0xfe, 0x3e]))
        .mount(&mock_server)
        .await;

    let err = direct_only(&mock_server.uri())
        .hydrate("25")
        .await
        .expect_err("Expected a decode error");

    assert!(matches!(err, HydrateError::Decode(_)));
}

#[tokio::test]
async fn test_hydrate_unreachable_without_proxy_is_none() {
    let post = direct_only(UNREACHABLE_BASE)
        .hydrate("26")
        .await
        .expect("Hydration should not fail");

    assert!(post.is_none());
}

#[tokio::test]
async fn test_hydrate_falls_back_to_proxy() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", LEGACY_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(POST_PAGE))
        .expect(1)
        .mount(&proxy)
        .await;

    let post = direct_then_proxy(UNREACHABLE_BASE, &proxy.uri())
        .hydrate("20")
        .await
        .expect("Hydration failed")
        .expect("Expected a post from the proxy tier");

    assert_eq!(post.author_handle, "@ferris");
}

#[tokio::test]
async fn test_direct_success_never_touches_proxy() {
    let site = MockServer::start().await;
    serve_post(&site, "20", POST_PAGE, 200).await;

    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&proxy)
        .await;

    let post = direct_then_proxy(&site.uri(), &proxy.uri())
        .hydrate("20")
        .await
        .expect("Hydration failed");

    assert!(post.is_some());
}

#[tokio::test]
async fn test_proxy_non_success_status_returns_body() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .expect(1)
        .mount(&proxy)
        .await;

    let fetcher = Fetcher::from_config(&FetchConfig {
        proxy_url: Some(proxy.uri()),
        ..Default::default()
    })
    .expect("Failed to build fetcher");

    let url = format!("{}/anyuser/status/27", UNREACHABLE_BASE);
    let body = fetcher.fetch(&url, &agent_headers()).await;

    assert_eq!(body, Some(b"not here".to_vec()));
}

#[tokio::test]
async fn test_both_tiers_failing_returns_none() {
    let fetcher = Fetcher::new()
        .with_tier(
            DirectTransport::new(&Timeouts::default()).expect("Failed to build client"),
            StatusPolicy::Ignore,
        )
        .with_tier(
            ProxyTransport::new(UNREACHABLE_BASE, Timeouts::default()),
            StatusPolicy::Report,
        );

    let url = format!("{}/anyuser/status/28", UNREACHABLE_BASE);
    assert!(fetcher.fetch(&url, &agent_headers()).await.is_none());
}

#[tokio::test]
async fn test_direct_transport_sends_headers_and_returns_raw_bytes() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .and(header("x-probe", "1"))
        .respond_with(ResponseTemplate::new(503).set_body_bytes(vec![0u8, 159, 146, 150]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = DirectTransport::new(&Timeouts::default()).expect("Failed to build client");
    let mut headers = Headers::new();
    headers.insert("X-Probe".to_string(), "1".to_string());

    let outcome = transport
        .attempt(&format!("{}/raw", mock_server.uri()), &headers)
        .await;

    assert_eq!(
        outcome,
        AttemptOutcome::Fetched {
            status: 503,
            body: vec![0u8, 159, 146, 150],
        }
    );
}

#[tokio::test]
async fn test_proxy_transport_without_headers_sends_plain_get() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&proxy)
        .await;

    let transport = ProxyTransport::new(proxy.uri(), Timeouts::default());
    let outcome = transport
        .attempt(&format!("{}/anyuser/status/29", UNREACHABLE_BASE), &Headers::new())
        .await;

    assert!(outcome.is_fetched());

    let requests = proxy
        .received_requests()
        .await
        .expect("Request recording enabled");
    assert_eq!(requests.len(), 1);
}
