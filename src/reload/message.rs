//! Live update message protocol.
//!
//! # Server → browser
//!
//! - `page`: a full page view for the path the browser is showing
//! - `refresh`: reload from the server (page gone, or assets changed)
//!
//! # Browser → server
//!
//! - `page`: the path the browser is currently showing
//!
//! HTML inside messages is sent as-is; serde_json does not escape `<`, `>`
//! or `&`, so rendered documents reach the page script unchanged.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::content::PageView;

/// Message sent to a browser session.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveMessage<'a> {
    /// Replace page regions with this view.
    Page {
        path: &'a str,
        page: PageView<'a>,
    },
    /// Reload the page from the server.
    Refresh { reason: &'a str },
}

impl LiveMessage<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Message received from a browser session.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientMessage {
    Page { path: String },
}

/// Parse a browser `page` message into a decoded request path.
pub fn parse_page_message(text: &str) -> Option<String> {
    let ClientMessage::Page { path } = serde_json::from_str(text).ok()?;
    Some(decode_path(&path))
}

/// Percent-decode a request path, keeping it as-is if not valid UTF-8.
pub fn decode_path(path: &str) -> String {
    percent_decode_str(path)
        .decode_utf8()
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_owned())
}
