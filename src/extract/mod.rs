//! Extraction module for post pages
//!
//! This module turns the legacy markup of a post page into a `Post`:
//! - Locating the tweet-text container that marks a live post
//! - Reading the handle, display name, body and timestamp
//! - Driving the fetcher for a given post id

mod hydrator;
mod parser;
mod post;

pub use hydrator::{hydrate, validate_post_id, Hydrator, STATUS_PATH};
pub use parser::{extract_body, parse_post, parse_timestamp, TIMESTAMP_FORMAT};
pub use post::Post;

use std::fmt;

/// Elements the extractor looks up, each identified by a CSS selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Container holding the post body; its presence marks a live post
    TweetText,
    /// Span holding the author handle
    Username,
    /// Container holding the display name
    FullName,
    /// Bold element inside the display name container
    FullNameStrong,
    /// Container holding the timestamp link
    Metadata,
    /// Link inside the metadata container whose text is the timestamp
    MetadataLink,
}

/// How the extractor reacts when a field's element is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    /// The page does not show a live post; the result is "no post"
    PageUnavailable,
    /// The page is broken; extraction fails with an error
    Malformed,
}

impl Field {
    /// CSS selector for the element, relative to its search scope
    pub fn selector(self) -> &'static str {
        match self {
            Self::TweetText => "div.tweet-text",
            Self::Username => "span.username",
            Self::FullName => "div.fullname",
            Self::FullNameStrong => "strong",
            Self::Metadata => "div.metadata",
            Self::MetadataLink => "a",
        }
    }

    /// Only a missing tweet-text container is tolerated
    pub fn on_absence(self) -> Absence {
        match self {
            Self::TweetText => Absence::PageUnavailable,
            _ => Absence::Malformed,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TweetText => "tweet text",
            Self::Username => "username",
            Self::FullName => "full name",
            Self::FullNameStrong => "full name <strong>",
            Self::Metadata => "metadata",
            Self::MetadataLink => "metadata link",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.selector())
    }
}
