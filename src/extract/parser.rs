//! Field extraction rules for legacy post markup
//!
//! The rules only work against the static markup served to legacy user
//! agents. Lookups go through `Field`, whose `on_absence` policy decides
//! whether a missing element means "no post" or a malformed page.

use crate::extract::{Absence, Field, Post};
use crate::{ExtractError, ExtractResult};
use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Format of the timestamp link text, e.g. `3:15 PM - 04 Jul 2021`
pub const TIMESTAMP_FORMAT: &str = "%I:%M %p - %d %b %Y";

/// Parses a post page and extracts its fields
///
/// # Returns
///
/// * `Ok(Some(Post))` - The page holds a live post
/// * `Ok(None)` - No tweet-text container (deleted post, suspended account)
/// * `Err(ExtractError)` - Container present but another field is missing
///   or its timestamp does not parse
///
/// # Example
///
/// ```
/// use post_hydrator::extract::parse_post;
///
/// let html = r#"<html><body><p>This account is suspended</p></body></html>"#;
/// assert!(parse_post(html).unwrap().is_none());
/// ```
pub fn parse_post(html: &str) -> ExtractResult<Option<Post>> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let Some(tweet_text) = locate(root, Field::TweetText)? else {
        debug!("No tweet text container; post unavailable");
        return Ok(None);
    };

    let post = Post {
        author_handle: extract_username(root)?,
        display_name: extract_full_name(root)?,
        body: extract_body(tweet_text),
        posted_at: extract_posted_at(root)?,
    };

    Ok(Some(post))
}

/// Joins the text of the container's element children
///
/// Bare text nodes directly inside the container are skipped, so only text
/// wrapped in a child element ends up in the body.
pub fn extract_body(container: ElementRef<'_>) -> String {
    container
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| child.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Parses timestamp text such as `3:15 PM - 04 Jul 2021`
pub fn parse_timestamp(value: &str) -> ExtractResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| {
        ExtractError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

fn extract_username(root: ElementRef<'_>) -> ExtractResult<String> {
    let username = require(root, Field::Username)?;
    Ok(username.text().collect())
}

fn extract_full_name(root: ElementRef<'_>) -> ExtractResult<String> {
    let full_name = require(root, Field::FullName)?;
    let strong = require(full_name, Field::FullNameStrong)?;
    Ok(strong.text().collect())
}

fn extract_posted_at(root: ElementRef<'_>) -> ExtractResult<NaiveDateTime> {
    let metadata = require(root, Field::Metadata)?;
    let link = require(metadata, Field::MetadataLink)?;
    parse_timestamp(&link.text().collect::<String>())
}

/// Finds the first element for `field` under `scope`, applying its absence
/// policy: `Ok(None)` only for fields whose absence means "no post"
fn locate<'a>(scope: ElementRef<'a>, field: Field) -> ExtractResult<Option<ElementRef<'a>>> {
    let selector = Selector::parse(field.selector())
        .map_err(|e| ExtractError::Selector(format!("{}: {:?}", field.selector(), e)))?;

    match scope.select(&selector).next() {
        Some(element) => Ok(Some(element)),
        None => match field.on_absence() {
            Absence::PageUnavailable => Ok(None),
            Absence::Malformed => Err(ExtractError::MissingElement { field }),
        },
    }
}

/// Like `locate`, but the element must be there
fn require<'a>(scope: ElementRef<'a>, field: Field) -> ExtractResult<ElementRef<'a>> {
    locate(scope, field)?.ok_or(ExtractError::MissingElement { field })
}
