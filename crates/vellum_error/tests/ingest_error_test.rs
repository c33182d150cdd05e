use vellum_error::{IngestError, IngestErrorKind, VellumError, VellumErrorKind};

#[test]
fn validation_kinds_are_flagged() {
    assert!(
        IngestErrorKind::SizeExceeded {
            size_bytes: 10,
            max_bytes: 5
        }
        .is_validation()
    );
    assert!(
        IngestErrorKind::UnsupportedType {
            media_type: "text/plain".to_string(),
            file_name: "notes.txt".to_string(),
        }
        .is_validation()
    );
    assert!(IngestErrorKind::InvalidUrl("nope".to_string()).is_validation());
    assert!(!IngestErrorKind::NetworkFailure("reset".to_string()).is_validation());
}

#[test]
fn transfer_kinds_are_flagged() {
    assert!(IngestErrorKind::NetworkFailure("reset".to_string()).is_transfer());
    assert!(IngestErrorKind::ServerError("quota".to_string()).is_transfer());
    assert!(!IngestErrorKind::FileRead("gone".to_string()).is_transfer());
}

#[test]
fn server_message_is_shown_verbatim() {
    let err = IngestError::new(IngestErrorKind::ServerError("File too large".to_string()));
    assert_eq!(err.message(), "File too large");
}

#[test]
fn location_is_captured() {
    let err = IngestError::new(IngestErrorKind::InvalidUrl("x".to_string()));
    assert!(err.file.ends_with("ingest_error_test.rs"));
    assert!(err.line > 0);
}

#[test]
fn converts_into_top_level_error() {
    let err: VellumError = IngestError::new(IngestErrorKind::InvalidUrl("x".to_string())).into();
    assert!(matches!(err.kind(), VellumErrorKind::Ingest(_)));
    assert!(format!("{}", err).contains("Invalid URL"));
}
