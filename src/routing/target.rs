//! Target URL reconstruction.
//!
//! # Responsibilities
//! - Pull the `service` key out of the incoming query string
//! - Classify `path`/`path*` entries as path segments
//! - Forward every other entry as a query parameter, repeats included
//!
//! # Design Decisions
//! - Segment order: `path`, then numeric suffixes ascending, then the rest
//!   by suffix; repeated keys keep arrival order
//! - Surrounding slashes are trimmed and empty segments dropped, so
//!   malformed input degrades to the bare base URL

use url::{form_urlencoded, Url};

use crate::error::{GatewayError, Result};

const SERVICE_PARAM: &str = "service";
const PATH_PARAM: &str = "path";

/// The incoming `/api/proxy` query string, classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyQuery {
    /// Value of the first `service` parameter.
    pub service: Option<String>,
    /// Path segments, already ordered.
    pub segments: Vec<String>,
    /// Forwarded query parameters in arrival order.
    pub params: Vec<(String, String)>,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentOrder {
    Bare,
    Numbered(u64),
    Named(String),
}

impl ProxyQuery {
    /// Parse a raw (still percent-encoded) query string.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        let mut segments: Vec<(SegmentOrder, String)> = Vec::new();

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            if key == SERVICE_PARAM {
                if query.service.is_none() {
                    query.service = Some(value.into_owned());
                }
                continue;
            }

            match key.strip_prefix(PATH_PARAM) {
                Some(suffix) => {
                    let order = if suffix.is_empty() {
                        SegmentOrder::Bare
                    } else if let Ok(n) = suffix.parse::<u64>() {
                        SegmentOrder::Numbered(n)
                    } else {
                        SegmentOrder::Named(suffix.to_string())
                    };
                    let segment = value.trim_matches('/');
                    if !segment.is_empty() {
                        segments.push((order, segment.to_string()));
                    }
                }
                None => query.params.push((key.into_owned(), value.into_owned())),
            }
        }

        // stable: repeated keys keep arrival order
        segments.sort_by(|a, b| a.0.cmp(&b.0));
        query.segments = segments.into_iter().map(|(_, s)| s).collect();
        query
    }

    /// `{base}/{segments}?{params}`, leaving out the empty parts.
    pub fn target_url(&self, base_url: &str) -> Result<Url> {
        let mut target = base_url.trim_end_matches('/').to_string();

        if !self.segments.is_empty() {
            target.push('/');
            target.push_str(&self.segments.join("/"));
        }

        if !self.params.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.params.iter())
                .finish();
            target.push('?');
            target.push_str(&encoded);
        }

        Url::parse(&target).map_err(|e| GatewayError::InvalidTarget(format!("{target}: {e}")))
    }

    /// Last path segment, if any (`"auth/login"` -> `"login"`).
    pub fn last_segment(&self) -> Option<&str> {
        self.segments
            .last()
            .and_then(|s| s.rsplit('/').next())
            .filter(|s| !s.is_empty())
    }
}
