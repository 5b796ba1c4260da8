//! Link header parsing (RFC 5988)
//!
//! Page-based APIs advertise navigation URLs in a `Link` response header:
//! `<https://api.example.com/items?page=2>; rel="next", <...>; rel="last"`.
//! Presence of the `next` relation is what drives pagination forward;
//! the URLs themselves are informational.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for one `<url>; rel="name"` segment
static LINK_SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>;\s*rel="([^"]+)""#).unwrap());

/// Parse a Link header into a relation-to-URL map.
///
/// Absent or empty headers produce an empty map. Malformed segments are
/// skipped rather than failing the whole parse.
pub fn parse_link_header(header: Option<&str>) -> HashMap<String, String> {
    let mut links = HashMap::new();
    let Some(header) = header else {
        return links;
    };
    for caps in LINK_SEGMENT_REGEX.captures_iter(header) {
        links.insert(caps[2].to_string(), caps[1].to_string());
    }
    links
}

/// The pagination relations of interest, pulled out of a parsed Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub prev: Option<String>,
    /// URL of the first page, if any
    pub first: Option<String>,
    /// URL of the last page, if any
    pub last: Option<String>,
}

impl PageLinks {
    /// Parse a Link header into the typed view
    pub fn from_header(header: Option<&str>) -> Self {
        let mut links = parse_link_header(header);
        Self {
            next: links.remove("next"),
            prev: links.remove("prev"),
            first: links.remove("first"),
            last: links.remove("last"),
        }
    }

    /// True when the server advertised a next page
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// True when the server advertised a previous page
    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }
}
