use uuid::Uuid;
use vellum_core::{
    CanonicalUrl, ExternalMedia, MediaReference, SourceKind, UploadedMedia, UrlProvider,
};

fn uploaded() -> MediaReference {
    let url = CanonicalUrl::parse("https://cdn.example.com/uploads/photo.png").unwrap();
    MediaReference::LocalUpload(UploadedMedia::new(
        Uuid::new_v4(),
        "photo.png",
        2048,
        "image/png",
        url,
    ))
}

#[test]
fn canonical_url_rejects_unusable_input() {
    assert!(CanonicalUrl::parse("").is_err());
    assert!(CanonicalUrl::parse("   ").is_err());
    assert!(CanonicalUrl::parse("uploads/photo.png").is_err());
    assert!(CanonicalUrl::parse("mailto:someone@example.com").is_err());
}

#[test]
fn canonical_url_keeps_text_as_entered() {
    let url = CanonicalUrl::parse("  https://example.com  ").unwrap();
    assert_eq!(url.as_str(), "https://example.com");
    assert_eq!(url.to_string(), "https://example.com");
}

#[test]
fn uploaded_reference_exposes_metadata() {
    let reference = uploaded();
    assert_eq!(reference.source_kind(), SourceKind::LocalUpload);
    assert_eq!(reference.original_name(), "photo.png");
    assert_eq!(reference.size_bytes(), 2048);
    assert_eq!(reference.media_type(), "image/png");
    assert_eq!(
        reference.canonical_url().as_str(),
        "https://cdn.example.com/uploads/photo.png"
    );
}

#[test]
fn external_reference_uses_sentinels() {
    let url = CanonicalUrl::parse("https://example.com/video.mp4").unwrap();
    let reference: MediaReference = ExternalMedia::new(UrlProvider::Direct, url).into();

    assert_eq!(reference.source_kind(), SourceKind::ExternalUrl);
    assert_eq!(reference.original_name(), "External link");
    assert_eq!(reference.size_bytes(), 0);
    assert_eq!(reference.media_type(), "external/url");
}

#[test]
fn serializes_with_source_kind_tag() {
    let url = CanonicalUrl::parse("https://www.youtube.com/embed/abc123").unwrap();
    let reference: MediaReference = ExternalMedia::new(UrlProvider::VideoHosting, url).into();

    let json = serde_json::to_value(&reference).unwrap();
    assert_eq!(json["source_kind"], "external_url");
    assert_eq!(json["provider"], "video_hosting");
    assert_eq!(json["canonical_url"], "https://www.youtube.com/embed/abc123");

    let back: MediaReference = serde_json::from_value(json).unwrap();
    assert_eq!(back, reference);
}

#[test]
fn deserialization_rejects_empty_url() {
    let json = serde_json::json!({
        "source_kind": "external_url",
        "provider": "direct",
        "original_name": "External link",
        "size_bytes": 0,
        "media_type": "external/url",
        "canonical_url": ""
    });
    assert!(serde_json::from_value::<MediaReference>(json).is_err());
}
