//! End-to-end tests for MediaWidget with an in-process transport.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vellum_core::{AcceptPolicy, CanonicalUrl, DEFAULT_MAX_BYTES, MediaReference, SourceKind};
use vellum_error::{IngestError, IngestErrorKind, IngestResult};
use vellum_ingest::{InputMode, MediaWidget, WidgetOptions};
use vellum_transfer::{
    LocalFile, NoCredentials, ProgressReporter, ServerUpload, TransferManager, UploadRequest,
    UploadTransport,
};

/// Transport answering `/uploads/<file name>` unless the name starts with "fail".
#[derive(Default)]
struct MockTransport {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl UploadTransport for MockTransport {
    async fn send(
        &self,
        request: UploadRequest,
        progress: ProgressReporter,
    ) -> IngestResult<ServerUpload> {
        self.calls.lock().unwrap().push(request.file_name.clone());
        let total = request.bytes.len() as u64;
        progress.report(total / 2, Some(total));
        progress.report(total, Some(total));
        tokio::task::yield_now().await;

        if request.file_name.starts_with("fail") {
            return Err(IngestError::new(IngestErrorKind::ServerError(
                "Storage unavailable".to_string(),
            )));
        }
        Ok(ServerUpload::new(format!("/uploads/{}", request.file_name))
            .with_original_name(request.file_name.clone())
            .with_size_bytes(total)
            .with_media_type(request.media_type.clone()))
    }
}

/// Observer recording every notification.
type Notifications = Arc<Mutex<Vec<(String, MediaReference)>>>;

fn widget(options: WidgetOptions) -> (MediaWidget, Arc<Mutex<Vec<String>>>, Notifications) {
    let transport = MockTransport::default();
    let calls = transport.calls.clone();
    let manager = TransferManager::new(
        Arc::new(transport),
        Arc::new(NoCredentials),
        "https://api.example.com",
    );

    let notifications: Notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = notifications.clone();
    let widget = MediaWidget::new(options, AcceptPolicy::default(), manager).with_observer(
        Arc::new(move |url: &CanonicalUrl, reference: &MediaReference| {
            sink.lock()
                .unwrap()
                .push((url.as_str().to_string(), reference.clone()));
        }),
    );
    (widget, calls, notifications)
}

fn image(name: &str, size: usize) -> LocalFile {
    LocalFile::new(name, "image/png", vec![0u8; size])
}

#[tokio::test]
async fn test_two_mebibyte_upload_attaches_once() {
    let (mut widget, calls, notifications) = widget(WidgetOptions::default());

    let results = widget
        .submit_files(vec![image("abc.png", 2_097_152)])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let reference = results[0].as_ref().unwrap();
    assert_eq!(reference.source_kind(), SourceKind::LocalUpload);
    assert_eq!(reference.size_bytes(), 2_097_152);
    assert_eq!(
        reference.canonical_url().as_str(),
        "https://api.example.com/uploads/abc.png"
    );

    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(widget.references(), vec![reference.clone()]);

    let notifications = notifications.lock().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].0, "https://api.example.com/uploads/abc.png");
    assert_eq!(&notifications[0].1, reference);

    assert!(widget.error().is_none());
    assert_eq!(widget.progress(), None);
}

#[tokio::test]
async fn test_oversize_file_is_never_sent() {
    let (mut widget, calls, notifications) = widget(WidgetOptions::default());
    let too_big = (DEFAULT_MAX_BYTES + 1) as usize;

    let results = widget.submit_files(vec![image("big.png", too_big)]).await.unwrap();

    assert!(matches!(
        results[0].as_ref().unwrap_err().kind(),
        IngestErrorKind::SizeExceeded { .. }
    ));
    assert!(calls.lock().unwrap().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
    assert!(widget.references().is_empty());
    assert!(widget.error().is_some());
}

#[tokio::test]
async fn test_unsupported_type_is_never_sent() {
    let (mut widget, calls, _) = widget(WidgetOptions::default());

    let results = widget
        .submit_files(vec![LocalFile::new("notes.txt", "text/plain", b"hi".to_vec())])
        .await
        .unwrap();

    assert!(matches!(
        results[0].as_ref().unwrap_err().kind(),
        IngestErrorKind::UnsupportedType { .. }
    ));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_single_mode_takes_first_file_only() {
    let (mut widget, calls, _) = widget(WidgetOptions::default());

    let results = widget
        .submit_files(vec![image("one.png", 10), image("two.png", 10)])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(*calls.lock().unwrap(), vec!["one.png".to_string()]);
}

#[tokio::test]
async fn test_multiple_mode_reports_each_file_in_order() {
    let options = WidgetOptions {
        allow_external_url: true,
        multiple: true,
    };
    let (mut widget, calls, notifications) = widget(options);

    let results = widget
        .submit_files(vec![
            image("a.png", 10),
            LocalFile::new("b.txt", "text/plain", vec![1]),
            image("fail.png", 10),
            image("c.png", 10),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1].as_ref().unwrap_err().kind(),
        IngestErrorKind::UnsupportedType { .. }
    ));
    assert_eq!(results[2].as_ref().unwrap_err().message(), "Storage unavailable");
    assert!(results[3].is_ok());

    assert_eq!(calls.lock().unwrap().len(), 3);
    assert_eq!(notifications.lock().unwrap().len(), 2);

    let names: Vec<String> = widget
        .references()
        .iter()
        .map(|r| r.original_name().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"a.png".to_string()));
    assert!(names.contains(&"c.png".to_string()));

    assert_eq!(widget.error().unwrap().message(), "Storage unavailable");
    assert!(widget.dismiss_error().is_some());
    assert!(widget.error().is_none());
}

#[tokio::test]
async fn test_files_rejected_in_url_mode() {
    let (mut widget, calls, _) = widget(WidgetOptions::default());
    assert!(widget.toggle_mode());

    let err = widget.submit_files(vec![image("a.png", 1)]).await.unwrap_err();

    assert!(matches!(err.kind(), IngestErrorKind::ModeMismatch(_)));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_short_video_link_attaches_embed_url() {
    let (mut widget, calls, notifications) = widget(WidgetOptions::default());
    assert!(widget.toggle_mode());
    assert_eq!(widget.mode(), InputMode::ExternalUrl);

    widget.set_url_draft("https://youtu.be/abc123?si=xyz").unwrap();
    let reference = widget.submit_url().unwrap();

    assert_eq!(reference.source_kind(), SourceKind::ExternalUrl);
    assert_eq!(reference.media_type(), "external/url");
    assert_eq!(reference.size_bytes(), 0);
    assert_eq!(
        reference.canonical_url().as_str(),
        "https://www.youtube.com/embed/abc123"
    );

    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(notifications.lock().unwrap().len(), 1);
    assert_eq!(widget.controller().url_draft(), "");
    assert_eq!(widget.references().len(), 1);
}

#[tokio::test]
async fn test_malformed_url_changes_nothing() {
    let (mut widget, _, notifications) = widget(WidgetOptions::default());
    widget.toggle_mode();

    widget.set_url_draft("not a url").unwrap();
    let err = widget.submit_url().unwrap_err();

    assert!(matches!(err.kind(), IngestErrorKind::InvalidUrl(_)));
    assert!(widget.references().is_empty());
    assert!(notifications.lock().unwrap().is_empty());
    assert_eq!(widget.controller().url_draft(), "not a url");
    assert!(widget.error().is_some());
}

#[tokio::test]
async fn test_url_submission_requires_url_mode() {
    let (mut widget, _, _) = widget(WidgetOptions::default());

    let err = widget.submit_url().unwrap_err();

    assert!(matches!(err.kind(), IngestErrorKind::ModeMismatch(_)));
}

#[tokio::test]
async fn test_toggle_clears_draft_and_error() {
    let (mut widget, _, _) = widget(WidgetOptions::default());
    widget.toggle_mode();
    widget.set_url_draft("bad").unwrap();
    let _ = widget.submit_url();
    assert!(widget.error().is_some());

    assert!(widget.toggle_mode());

    assert_eq!(widget.mode(), InputMode::LocalUpload);
    assert!(widget.error().is_none());
    assert_eq!(widget.controller().url_draft(), "");
    assert_eq!(widget.progress(), None);
}

#[tokio::test]
async fn test_url_mode_disabled() {
    let options = WidgetOptions {
        allow_external_url: false,
        multiple: false,
    };
    let (mut widget, _, _) = widget(options);

    assert!(!widget.toggle_mode());
    assert_eq!(widget.mode(), InputMode::LocalUpload);
    assert!(widget.set_url_draft("https://a.example").is_err());
}

#[tokio::test]
async fn test_failure_does_not_switch_mode() {
    let (mut widget, _, _) = widget(WidgetOptions::default());

    let results = widget.submit_files(vec![image("fail.png", 4)]).await.unwrap();

    assert!(results[0].is_err());
    assert_eq!(widget.mode(), InputMode::LocalUpload);
    assert!(widget.references().is_empty());
}

#[tokio::test]
async fn test_remove_does_not_notify() {
    let options = WidgetOptions {
        allow_external_url: true,
        multiple: true,
    };
    let (mut widget, _, notifications) = widget(options);
    widget
        .submit_files(vec![image("a.png", 1), image("b.png", 1)])
        .await
        .unwrap();
    assert_eq!(notifications.lock().unwrap().len(), 2);

    let removed = widget.remove(0).unwrap();

    assert_eq!(widget.references().len(), 1);
    assert_ne!(widget.references()[0], removed);
    assert_eq!(notifications.lock().unwrap().len(), 2);
    assert!(widget.remove(5).is_none());
}

/// Widget whose observer reads the registry it is notified from.
///
/// Records the entry count seen by each notification, or `None` when the
/// registry was still locked.
fn reentrant_widget(options: WidgetOptions) -> (MediaWidget, Arc<Mutex<Vec<Option<usize>>>>) {
    let manager = TransferManager::new(
        Arc::new(MockTransport::default()),
        Arc::new(NoCredentials),
        "https://api.example.com",
    );
    let widget = MediaWidget::new(options, AcceptPolicy::default(), manager);
    let registry = widget.registry();
    let seen: Arc<Mutex<Vec<Option<usize>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let widget = widget.with_observer(Arc::new(
        move |_: &CanonicalUrl, _: &MediaReference| {
            let len = registry.try_lock().ok().map(|registry| registry.len());
            sink.lock().unwrap().push(len);
        },
    ));
    (widget, seen)
}

#[tokio::test]
async fn test_observer_can_read_registry_after_upload() {
    let options = WidgetOptions {
        allow_external_url: true,
        multiple: true,
    };
    let (mut widget, seen) = reentrant_widget(options);

    widget
        .submit_files(vec![image("a.png", 4), image("b.png", 4)])
        .await
        .unwrap();

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec![Some(1), Some(2)]);
}

#[tokio::test]
async fn test_observer_can_read_registry_after_link() {
    let (mut widget, seen) = reentrant_widget(WidgetOptions::default());
    widget.toggle_mode();
    widget.set_url_draft("https://example.com/a.png").unwrap();

    widget.submit_url().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some(1)]);
    assert_eq!(widget.references().len(), 1);
}
