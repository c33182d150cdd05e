use vellum_core::{UploadSession, UploadStatus, progress_percent};

#[test]
fn percent_is_clamped_and_defaults_to_zero() {
    assert_eq!(progress_percent(0, Some(100)), 0);
    assert_eq!(progress_percent(99, Some(100)), 99);
    assert_eq!(progress_percent(100, Some(100)), 100);
    assert_eq!(progress_percent(250, Some(100)), 100);
    assert_eq!(progress_percent(10, Some(0)), 0);
    assert_eq!(progress_percent(10, None), 0);
    assert_eq!(progress_percent(u64::MAX, Some(u64::MAX)), 100);
}

#[test]
fn session_walks_the_happy_path() {
    let mut session = UploadSession::new("photo.png");
    assert_eq!(*session.status(), UploadStatus::Idle);

    assert!(session.start());
    assert_eq!(*session.status(), UploadStatus::InProgress);

    assert_eq!(session.advance(25, Some(100)), Some(25));
    assert_eq!(session.advance(80, Some(100)), Some(80));
    assert!(session.succeed());

    assert_eq!(*session.status(), UploadStatus::Succeeded);
    assert_eq!(*session.progress_percent(), 100);
}

#[test]
fn progress_never_decreases() {
    let mut session = UploadSession::new("clip.mp4");
    session.start();

    assert_eq!(session.advance(60, Some(100)), Some(60));
    assert_eq!(session.advance(30, Some(100)), None);
    assert_eq!(session.advance(60, Some(100)), None);
    assert_eq!(*session.progress_percent(), 60);
}

#[test]
fn idle_session_ignores_progress() {
    let mut session = UploadSession::new("a.pdf");
    assert_eq!(session.advance(50, Some(100)), None);
    assert_eq!(*session.progress_percent(), 0);
}

#[test]
fn terminal_states_are_final() {
    let mut session = UploadSession::new("a.pdf");
    session.start();
    assert!(session.fail());

    assert!(!session.succeed());
    assert!(!session.start());
    assert_eq!(session.advance(100, Some(100)), None);
    assert_eq!(*session.status(), UploadStatus::Failed);
    assert!(session.status().is_terminal());
}

#[test]
fn cannot_finish_before_starting() {
    let mut session = UploadSession::new("a.pdf");
    assert!(!session.succeed());
    assert!(!session.fail());
    assert_eq!(*session.status(), UploadStatus::Idle);
}

#[test]
fn sessions_get_distinct_ids() {
    let a = UploadSession::new("a");
    let b = UploadSession::new("a");
    assert_ne!(a.id(), b.id());
}
