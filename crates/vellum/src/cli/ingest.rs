//! Ingestion command handlers.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vellum::{
    AcceptPolicy, IngestError, IngestErrorKind, IngestResult, LocalFile, MediaWidget, PendingFile,
    VellumConfig, VellumResult, classify, validate,
};

use super::output::{ItemReport, display_path, print_json, print_reports};

/// Print the embeddable form of a URL.
pub fn normalize_url(url: &str) -> VellumResult<bool> {
    let normalized = classify(url);
    print_json(&serde_json::json!({
        "provider": normalized.provider,
        "url": normalized.url,
    }))?;
    Ok(true)
}

/// Validate files without sending them.
pub async fn check_files(config: &VellumConfig, files: &[PathBuf]) -> VellumResult<bool> {
    print_reports(&collect_check_reports(config, files).await)
}

/// One report per path, from file metadata only.
async fn collect_check_reports(config: &VellumConfig, files: &[PathBuf]) -> Vec<ItemReport> {
    let policy = config.widget.accept_policy();
    debug!(accept = %policy.accept_list(), max_bytes = *policy.max_bytes(), "Checking files");

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let input = display_path(path);
        let checked = PendingFile::inspect(path)
            .await
            .and_then(|pending| validate(&pending.candidate(), &policy));
        reports.push(match checked {
            Ok(()) => ItemReport::accepted(input),
            Err(error) => ItemReport::failed(input, &error),
        });
    }
    reports
}

/// Validate and upload files.
pub async fn upload_files(
    config: &VellumConfig,
    files: Vec<PathBuf>,
    multiple: bool,
) -> VellumResult<bool> {
    print_reports(&collect_upload_reports(config, &files, multiple).await?)
}

/// One report per path, in input order.
///
/// Files are checked from their metadata and only read once accepted. Without
/// `multiple` every path after the first is reported as skipped.
async fn collect_upload_reports(
    config: &VellumConfig,
    files: &[PathBuf],
    multiple: bool,
) -> VellumResult<Vec<ItemReport>> {
    let mut config = config.clone();
    config.widget.multiple |= multiple;
    let mut widget = MediaWidget::from_config(&config)?;
    let policy = config.widget.accept_policy();
    let taken = if config.widget.multiple { files.len() } else { files.len().min(1) };

    let mut reports: Vec<Option<ItemReport>> = Vec::with_capacity(files.len());
    let mut accepted = Vec::new();
    let mut accepted_at = Vec::new();
    for (index, path) in files.iter().enumerate() {
        let input = display_path(path);
        if index >= taken {
            reports.push(Some(ItemReport::skipped(input)));
            continue;
        }
        match load_accepted(path, &policy).await {
            Ok(file) => {
                reports.push(None);
                accepted.push(file);
                accepted_at.push((index, input));
            }
            Err(error) => reports.push(Some(ItemReport::failed(input, &error))),
        }
    }

    if !accepted.is_empty() {
        let results = widget.submit_files(accepted).await?;
        for ((index, input), result) in accepted_at.into_iter().zip(results) {
            reports[index] = Some(ItemReport::from_result(input, result));
        }
    }

    info!(attached = widget.references().len(), "Upload finished");
    Ok(reports.into_iter().flatten().collect())
}

async fn load_accepted(path: &Path, policy: &AcceptPolicy) -> IngestResult<LocalFile> {
    let pending = PendingFile::inspect(path).await?;
    validate(&pending.candidate(), policy)?;
    pending.read().await
}

/// Attach an external media link.
pub fn link_url(config: &VellumConfig, url: &str) -> VellumResult<bool> {
    let mut widget = MediaWidget::from_config(config)?;
    if !widget.toggle_mode() {
        return Err(IngestError::new(IngestErrorKind::ModeMismatch(
            "External URLs are disabled (widget.allow_external_url = false)".to_string(),
        ))
        .into());
    }

    widget.set_url_draft(url)?;
    let report = ItemReport::from_result(url, widget.submit_url());
    print_reports(&[report])
}

/// Print the effective configuration.
pub fn show_config(config: &VellumConfig) -> VellumResult<bool> {
    print!("{}", config.to_toml()?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn upload_server(expected: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"path":"/uploads/x"}"#))
            .expect(expected)
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer, dir: &TempDir) -> VellumConfig {
        let mut config = VellumConfig::default();
        config.origin.api_origin = format!("{}/api", server.uri());
        config.credentials.store_path = Some(dir.path().join("session.json"));
        config
    }

    fn sparse(dir: &TempDir, name: &str, len: u64) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::File::create(&path).unwrap().set_len(len).unwrap();
        path
    }

    fn inputs(reports: &[ItemReport]) -> Vec<(String, bool, bool)> {
        reports
            .iter()
            .map(|report| {
                let name = Path::new(&report.input)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                (name, report.ok, report.skipped)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_check_rejects_oversize_file_from_metadata() {
        let dir = TempDir::new().unwrap();
        let huge = sparse(&dir, "huge.mp4", 6 * 1024 * 1024 * 1024);

        let reports = collect_check_reports(&VellumConfig::default(), &[huge]).await;

        assert_eq!(reports.len(), 1);
        assert!(!reports[0].ok);
        assert!(reports[0].error.as_deref().unwrap_or_default().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_single_upload_reports_extra_files_as_skipped() {
        let dir = TempDir::new().unwrap();
        let server = upload_server(1).await;
        let files = vec![
            sparse(&dir, "a.png", 16),
            dir.path().join("missing.png"),
            sparse(&dir, "b.png", 16),
        ];

        let reports = collect_upload_reports(&config_for(&server, &dir), &files, false)
            .await
            .unwrap();

        assert_eq!(
            inputs(&reports),
            vec![
                ("a.png".to_string(), true, false),
                ("missing.png".to_string(), false, true),
                ("b.png".to_string(), false, true),
            ]
        );
        assert!(reports[0].reference.is_some());
    }

    #[tokio::test]
    async fn test_multiple_upload_reports_follow_input_order() {
        let dir = TempDir::new().unwrap();
        let server = upload_server(2).await;
        let files = vec![
            dir.path().join("missing.png"),
            sparse(&dir, "a.png", 16),
            sparse(&dir, "huge.mp4", 6 * 1024 * 1024 * 1024),
            sparse(&dir, "b.png", 16),
        ];

        let reports = collect_upload_reports(&config_for(&server, &dir), &files, true)
            .await
            .unwrap();

        assert_eq!(
            inputs(&reports),
            vec![
                ("missing.png".to_string(), false, false),
                ("a.png".to_string(), true, false),
                ("huge.mp4".to_string(), false, false),
                ("b.png".to_string(), true, false),
            ]
        );
        assert!(reports[2].error.as_deref().unwrap_or_default().contains("exceeds"));
    }
}
