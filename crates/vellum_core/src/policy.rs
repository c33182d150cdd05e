//! Accept policy: size ceiling plus ordered type matchers.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Default size ceiling (50 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// A single entry of an accept list.
///
/// Tokens follow the syntax of the HTML `accept` attribute:
/// `.pdf` is an extension, `image/*` a wildcard, `video/mp4` an exact type.
///
/// # Examples
///
/// ```
/// use vellum_core::TypeMatcher;
///
/// let ext = TypeMatcher::parse(".PDF").unwrap();
/// assert!(ext.matches("application/octet-stream", "Report.pdf"));
///
/// let wildcard = TypeMatcher::parse("image/*").unwrap();
/// assert!(wildcard.matches("image/webp", "photo"));
/// assert!(!wildcard.matches("video/mp4", "clip.mp4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum TypeMatcher {
    /// `*` or `*/*`, accepts every type
    #[display("*/*")]
    Any,
    /// File name suffix such as `.pdf`, compared case-insensitively
    #[display("{}", _0)]
    Extension(String),
    /// MIME prefix including the slash, e.g. `image/` for `image/*`
    #[display("{}*", _0)]
    MimeWildcard(String),
    /// Full MIME type that must match exactly
    #[display("{}", _0)]
    Exact(String),
}

impl TypeMatcher {
    /// Parse one accept-list token. Blank tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let matcher = if token == "*" || token == "*/*" {
            TypeMatcher::Any
        } else if token.starts_with('.') {
            TypeMatcher::Extension(token.to_lowercase())
        } else if let Some(prefix) = token.strip_suffix('*')
            && prefix.ends_with('/')
        {
            TypeMatcher::MimeWildcard(prefix.to_string())
        } else {
            TypeMatcher::Exact(token.to_string())
        };

        Some(matcher)
    }

    /// Whether a candidate with this media type and file name satisfies the matcher.
    pub fn matches(&self, media_type: &str, file_name: &str) -> bool {
        match self {
            TypeMatcher::Any => true,
            TypeMatcher::Extension(ext) => file_name.to_lowercase().ends_with(ext.as_str()),
            TypeMatcher::MimeWildcard(prefix) => media_type.starts_with(prefix.as_str()),
            TypeMatcher::Exact(expected) => media_type == expected,
        }
    }
}

/// Rules governing whether a candidate is ingestible.
///
/// # Examples
///
/// ```
/// use vellum_core::AcceptPolicy;
///
/// let policy = AcceptPolicy::from_accept_list("image/*, .pdf", 10 * 1024 * 1024);
/// assert_eq!(policy.matchers().len(), 2);
/// assert_eq!(policy.accept_list(), "image/*,.pdf");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AcceptPolicy {
    /// Largest accepted size in bytes (inclusive)
    max_bytes: u64,
    /// Matchers evaluated in order
    matchers: Vec<TypeMatcher>,
}

impl Default for AcceptPolicy {
    fn default() -> Self {
        Self::from_accept_list("image/*,video/*,audio/*,application/pdf", DEFAULT_MAX_BYTES)
    }
}

impl AcceptPolicy {
    /// Creates a policy from explicit matchers.
    pub fn new(max_bytes: u64, matchers: Vec<TypeMatcher>) -> Self {
        Self {
            max_bytes,
            matchers,
        }
    }

    /// Creates a policy from a comma-separated accept list.
    pub fn from_accept_list(accept: &str, max_bytes: u64) -> Self {
        let matchers = accept.split(',').filter_map(TypeMatcher::parse).collect();
        Self::new(max_bytes, matchers)
    }

    /// Creates a new policy builder.
    pub fn builder() -> AcceptPolicyBuilder {
        AcceptPolicyBuilder::default()
    }

    /// Renders the matchers back into accept-list syntax.
    pub fn accept_list(&self) -> String {
        self.matchers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Index of the first matcher the candidate satisfies.
    pub fn first_match(&self, media_type: &str, file_name: &str) -> Option<usize> {
        self.matchers
            .iter()
            .position(|matcher| matcher.matches(media_type, file_name))
    }
}

/// Builder for `AcceptPolicy`.
#[derive(Debug, Default)]
pub struct AcceptPolicyBuilder {
    max_bytes: Option<u64>,
    matchers: Vec<TypeMatcher>,
}

impl AcceptPolicyBuilder {
    /// Sets the size ceiling.
    pub fn max_bytes(mut self, value: u64) -> Self {
        self.max_bytes = Some(value);
        self
    }

    /// Appends a matcher.
    pub fn matcher(mut self, matcher: TypeMatcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Appends every matcher of an accept list.
    pub fn accept(mut self, accept: &str) -> Self {
        self.matchers
            .extend(accept.split(',').filter_map(TypeMatcher::parse));
        self
    }

    /// Builds the `AcceptPolicy`.
    pub fn build(self) -> AcceptPolicy {
        AcceptPolicy {
            max_bytes: self.max_bytes.unwrap_or(DEFAULT_MAX_BYTES),
            matchers: self.matchers,
        }
    }
}
