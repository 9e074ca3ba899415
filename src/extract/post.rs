use chrono::NaiveDateTime;
use serde::Serialize;

/// A post read from its page
///
/// Only ever built with every field populated; a page that lacks the data
/// yields no `Post` at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Author handle, verbatim from the page
    pub author_handle: String,

    /// Author display name
    pub display_name: String,

    /// Text of the element children of the body container, space-joined
    pub body: String,

    /// Time as written on the page; no timezone
    pub posted_at: NaiveDateTime,
}
