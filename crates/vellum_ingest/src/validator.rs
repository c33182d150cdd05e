//! Synchronous checks run before anything is sent.

use tracing::debug;
use vellum_core::{AcceptPolicy, Candidate, CanonicalUrl};
use vellum_error::{IngestError, IngestErrorKind, IngestResult};

/// Checks a candidate against the size limit and the accept matchers.
///
/// A size equal to the limit is accepted. Matchers are tried in order and the
/// first satisfied one admits the candidate.
///
/// # Errors
///
/// `SizeExceeded` when the candidate is too large, `UnsupportedType` when no
/// matcher is satisfied.
///
/// # Examples
///
/// ```
/// use vellum_core::{AcceptPolicy, Candidate};
/// use vellum_ingest::validate;
///
/// let policy = AcceptPolicy::from_accept_list("image/*,.pdf", 1024);
/// assert!(validate(&Candidate::new("a.png", "image/png", 10), &policy).is_ok());
/// assert!(validate(&Candidate::new("a.PDF", "application/octet-stream", 10), &policy).is_ok());
/// assert!(validate(&Candidate::new("a.zip", "application/zip", 10), &policy).is_err());
/// ```
pub fn validate(candidate: &Candidate, policy: &AcceptPolicy) -> IngestResult<()> {
    if *candidate.size_bytes() > *policy.max_bytes() {
        return Err(IngestError::new(IngestErrorKind::SizeExceeded {
            size_bytes: *candidate.size_bytes(),
            max_bytes: *policy.max_bytes(),
        }));
    }

    match policy.first_match(candidate.media_type(), candidate.file_name()) {
        Some(index) => {
            debug!(file = %candidate.file_name(), matcher = index, "Candidate accepted");
            Ok(())
        }
        None => Err(IngestError::new(IngestErrorKind::UnsupportedType {
            media_type: candidate.media_type().clone(),
            file_name: candidate.file_name().clone(),
        })),
    }
}

/// Checks URL syntax and returns the trimmed input.
///
/// The URL must be absolute and carry a host.
///
/// # Errors
///
/// `InvalidUrl` for empty, relative, or otherwise malformed input.
pub fn validate_url(raw: &str) -> IngestResult<String> {
    CanonicalUrl::parse(raw).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::TypeMatcher;

    fn policy(accept: &str, max_bytes: u64) -> AcceptPolicy {
        AcceptPolicy::from_accept_list(accept, max_bytes)
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let policy = policy("*", 100);
        assert!(validate(&Candidate::new("a", "text/plain", 100), &policy).is_ok());

        let err = validate(&Candidate::new("a", "text/plain", 101), &policy).unwrap_err();
        assert_eq!(
            err.kind(),
            &IngestErrorKind::SizeExceeded {
                size_bytes: 101,
                max_bytes: 100
            }
        );
    }

    #[test]
    fn test_size_checked_before_type() {
        let err = validate(&Candidate::new("a.exe", "application/x-msdownload", 500), &policy("image/*", 100))
            .unwrap_err();
        assert!(matches!(err.kind(), IngestErrorKind::SizeExceeded { .. }));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let policy = policy(".png", 100);
        assert!(validate(&Candidate::new("SHOT.PNG", "", 1), &policy).is_ok());
        assert!(validate(&Candidate::new("shot.png.txt", "text/plain", 1), &policy).is_err());
    }

    #[test]
    fn test_wildcard_is_prefix_only() {
        let policy = policy("image/*", 100);
        assert!(validate(&Candidate::new("a", "image/webp", 1), &policy).is_ok());
        assert!(validate(&Candidate::new("a", "video/image", 1), &policy).is_err());
        assert!(validate(&Candidate::new("a", "imagex/png", 1), &policy).is_err());
    }

    #[test]
    fn test_exact_requires_equality() {
        let policy = policy("application/pdf", 100);
        assert!(validate(&Candidate::new("a", "application/pdf", 1), &policy).is_ok());
        assert!(validate(&Candidate::new("a", "application/pdfx", 1), &policy).is_err());
    }

    #[test]
    fn test_unsupported_type_names_the_file() {
        let err = validate(&Candidate::new("notes.txt", "text/plain", 1), &policy("image/*", 100))
            .unwrap_err();
        assert_eq!(
            err.kind(),
            &IngestErrorKind::UnsupportedType {
                media_type: "text/plain".to_string(),
                file_name: "notes.txt".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_policy_rejects_everything() {
        let policy = AcceptPolicy::new(100, Vec::new());
        assert!(validate(&Candidate::new("a.png", "image/png", 1), &policy).is_err());

        let policy = AcceptPolicy::builder().max_bytes(100).matcher(TypeMatcher::Any).build();
        assert!(validate(&Candidate::new("a.bin", "application/octet-stream", 1), &policy).is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
        assert!(validate_url("").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("/relative/path").is_err());
        assert!(matches!(
            validate_url("example.com").unwrap_err().kind(),
            IngestErrorKind::InvalidUrl(_)
        ));
    }
}
