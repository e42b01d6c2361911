// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Parses links to Slack messages.
//!
//! A link copied from Slack ("Copy link" on a message) looks like one of
//!
//! ```text
//! https://COMPANY.slack.com/archives/C123ABCD4/p1658312123456789
//! https://COMPANY.slack.com/archives/C123ABCD4/p1658312123456789?thread_ts=1658312000.000100&cid=C123ABCD4
//! ```
//!
//! The last path segment is the message timestamp with its decimal point
//! removed and a `p` stuck in front of it. The segment before it is the
//! channel ID.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DIRTY_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^p(?<secs>[0-9]{10,11})(?<micros>[0-9]{6})$")
        .expect("invalid permalink timestamp pattern")
});

/// Identifies a single message: the channel it was posted in and its
/// timestamp, which Slack uses as the message ID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRef {
    channel: String,
    timestamp: String,
}

impl MessageRef {
    /// Creates a reference to the message posted at `timestamp` in `channel`.
    ///
    /// `timestamp` is used as is, e.g. `"1658312123.456789"`.
    pub fn new(channel: impl Into<String>, timestamp: impl Into<String>) -> Self {
        let channel = channel.into();
        let timestamp = timestamp.into();
        Self { channel, timestamp }
    }

    /// The channel ID.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// The message timestamp, with microsecond precision.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// A malformed message link.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The last path segment is not `p` followed by the timestamp digits.
    #[error("malformed message timestamp {0:?}")]
    MalformedTimestamp(String),

    /// There is no path segment for the channel.
    #[error("missing channel ID")]
    MissingChannel,
}

/// Breaks a message link into the channel and timestamp it points to.
///
/// Any query string is dropped before parsing.
///
/// # Examples
///
/// ```
/// use slak::link::parse_permalink;
/// let link = "https://x.slack.com/archives/C123ABCD4/p1658312123456789";
/// let msg = parse_permalink(link).unwrap();
/// assert_eq!(msg.channel(), "C123ABCD4");
/// assert_eq!(msg.timestamp(), "1658312123.456789");
/// ```
pub fn parse_permalink(link: &str) -> Result<MessageRef, ParseError> {
    let (path, _query) = link.split_once('?').unwrap_or((link, ""));
    let (rest, dirty_timestamp) = path.rsplit_once('/').unwrap_or(("", path));

    let caps = DIRTY_TIMESTAMP
        .captures(dirty_timestamp)
        .ok_or_else(|| ParseError::MalformedTimestamp(dirty_timestamp.to_string()))?;
    let timestamp = format!("{}.{}", &caps["secs"], &caps["micros"]);

    let channel = match rest.rsplit_once('/') {
        Some((_, channel)) => channel,
        None => rest,
    };
    if channel.is_empty() {
        return Err(ParseError::MissingChannel);
    }

    Ok(MessageRef::new(channel, timestamp))
}
