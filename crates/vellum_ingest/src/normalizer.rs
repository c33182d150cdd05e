//! Rewrites known hosting links into their embeddable form.

use regex::Regex;
use std::sync::LazyLock;
use vellum_core::UrlProvider;

static FILE_HOSTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"file/d/([^/?&#\s]+)").expect("Valid file-hosting regex"));
static VIDEO_WATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"watch\?v=([^&#/?\s]+)").expect("Valid watch-link regex"));
static VIDEO_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([^?&#/\s]+)").expect("Valid short-link regex"));

/// A normalized URL and the hosting family it was recognized as.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", url)]
pub struct NormalizedUrl {
    /// Which rewrite applied
    pub provider: UrlProvider,
    /// Rewritten (or trimmed) URL
    pub url: String,
}

/// Classifies and rewrites a URL.
///
/// # Examples
///
/// ```
/// use vellum_core::UrlProvider;
/// use vellum_ingest::classify;
///
/// let normalized = classify("https://youtu.be/abc123?si=xyz");
/// assert_eq!(normalized.provider, UrlProvider::VideoHosting);
/// assert_eq!(normalized.url, "https://www.youtube.com/embed/abc123");
/// ```
pub fn classify(raw: &str) -> NormalizedUrl {
    let trimmed = raw.trim();

    if let Some(id) = capture(&FILE_HOSTING_RE, trimmed) {
        return NormalizedUrl {
            provider: UrlProvider::FileHosting,
            url: format!("https://drive.google.com/file/d/{}/preview", id),
        };
    }

    if let Some(id) = capture(&VIDEO_WATCH_RE, trimmed).or_else(|| capture(&VIDEO_SHORT_RE, trimmed)) {
        return NormalizedUrl {
            provider: UrlProvider::VideoHosting,
            url: format!("https://www.youtube.com/embed/{}", id),
        };
    }

    NormalizedUrl {
        provider: UrlProvider::Direct,
        url: trimmed.to_string(),
    }
}

/// Rewrites a URL into its embeddable form, or returns it trimmed.
///
/// Total and idempotent.
pub fn normalize(raw: &str) -> String {
    classify(raw).url
}

fn capture<'a>(re: &Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}
