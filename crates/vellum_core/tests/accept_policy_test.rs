use vellum_core::{AcceptPolicy, DEFAULT_MAX_BYTES, TypeMatcher};

#[test]
fn parses_each_token_kind() {
    assert_eq!(TypeMatcher::parse("*"), Some(TypeMatcher::Any));
    assert_eq!(TypeMatcher::parse("*/*"), Some(TypeMatcher::Any));
    assert_eq!(
        TypeMatcher::parse(".Docx"),
        Some(TypeMatcher::Extension(".docx".to_string()))
    );
    assert_eq!(
        TypeMatcher::parse(" image/* "),
        Some(TypeMatcher::MimeWildcard("image/".to_string()))
    );
    assert_eq!(
        TypeMatcher::parse("application/pdf"),
        Some(TypeMatcher::Exact("application/pdf".to_string()))
    );
    assert_eq!(TypeMatcher::parse("   "), None);
}

#[test]
fn extension_match_ignores_case() {
    let matcher = TypeMatcher::parse(".pdf").unwrap();
    assert!(matcher.matches("application/pdf", "REPORT.PDF"));
    assert!(matcher.matches("", "notes.Pdf"));
    assert!(!matcher.matches("application/pdf", "report.pdf.txt"));
}

#[test]
fn wildcard_compares_prefix_only() {
    let matcher = TypeMatcher::parse("video/*").unwrap();
    assert!(matcher.matches("video/mp4", "a.bin"));
    assert!(matcher.matches("video/x-matroska", "a.mkv"));
    assert!(!matcher.matches("videos/mp4", "a.mp4"));
    assert!(!matcher.matches("audio/mpeg", "a.mp3"));
}

#[test]
fn exact_requires_full_equality() {
    let matcher = TypeMatcher::parse("image/png").unwrap();
    assert!(matcher.matches("image/png", "a.png"));
    assert!(!matcher.matches("image/pngx", "a.png"));
    assert!(!matcher.matches("image/jpeg", "a.png"));
}

#[test]
fn accept_list_round_trips_through_display() {
    let policy = AcceptPolicy::from_accept_list("image/*,.pdf,video/mp4,*/*", 1024);
    assert_eq!(policy.accept_list(), "image/*,.pdf,video/mp4,*/*");
    assert_eq!(*policy.max_bytes(), 1024);
}

#[test]
fn first_match_respects_order() {
    let policy = AcceptPolicy::from_accept_list(".png,image/*", 1024);
    assert_eq!(policy.first_match("image/png", "a.png"), Some(0));
    assert_eq!(policy.first_match("image/gif", "a.gif"), Some(1));
    assert_eq!(policy.first_match("text/plain", "a.txt"), None);
}

#[test]
fn builder_defaults_size_ceiling() {
    let policy = AcceptPolicy::builder()
        .accept("image/*")
        .matcher(TypeMatcher::Extension(".pdf".to_string()))
        .build();

    assert_eq!(*policy.max_bytes(), DEFAULT_MAX_BYTES);
    assert_eq!(policy.matchers().len(), 2);
}

#[test]
fn default_policy_accepts_common_media() {
    let policy = AcceptPolicy::default();
    assert!(policy.first_match("image/jpeg", "a.jpg").is_some());
    assert!(policy.first_match("application/pdf", "a.pdf").is_some());
    assert!(policy.first_match("application/zip", "a.zip").is_none());
}
