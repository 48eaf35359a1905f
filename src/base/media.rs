//! Image URL detection for inbound mention text.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the first `http(s)` URL ending in a known image extension.
/// The `.+` is deliberately greedy and unanchored; tightening it would change
/// which URLs downstream consumers receive.
static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)https?://.+\.(?:png|jpg|jpeg|gif)").unwrap());

/// Returns the first image URL embedded in `text`, or `None`.
///
/// The match is permissive: anything after the scheme up to a recognized
/// image extension is accepted as-is, and the URL is treated as opaque from
/// here on (no reachability or host checks).
pub fn extract_image_url(text: &str) -> Option<&str> {
    IMAGE_URL_RE.find(text).map(|m| m.as_str())
}
