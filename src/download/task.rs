//! Single download tasks and their handles.
//!
//! A download fetches one URL, derives the save filename according to its
//! [`DownloadKind`], and writes the bytes into the target directory.
//! [`DownloadHandle::spawn`] runs it as an independent Tokio task.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span};

use super::client::{HttpClient, ResolvedDownload};
use super::error::DownloadError;
use super::filename::{binary_filename, image_filename};

/// What is being downloaded, which decides how the filename is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// Item image; named from the asset path of the request URL.
    Image,
    /// Purchased file; named from the last segment of the resolved URL.
    Binary,
}

impl DownloadKind {
    /// Returns the stable label used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Binary => "binary",
        }
    }

    /// Derives the save filename for a finished fetch.
    fn filename(
        self,
        request_url: &str,
        resolved: &ResolvedDownload,
    ) -> Result<String, DownloadError> {
        match self {
            Self::Image => {
                image_filename(request_url).map_err(|e| DownloadError::filename(request_url, e))
            }
            Self::Binary => {
                let final_url = resolved.final_url.as_str();
                binary_filename(final_url).map_err(|e| DownloadError::filename(final_url, e))
            }
        }
    }
}

/// One URL to download into one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Source URL.
    pub url: String,
    /// Existing directory the file is written into.
    pub target_dir: PathBuf,
    /// How the filename is derived.
    pub kind: DownloadKind,
}

impl DownloadRequest {
    /// Creates an image download request.
    pub fn image(url: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            target_dir: target_dir.into(),
            kind: DownloadKind::Image,
        }
    }

    /// Creates a purchased-file download request.
    pub fn binary(url: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            target_dir: target_dir.into(),
            kind: DownloadKind::Binary,
        }
    }
}

/// Runs one download to completion and returns the written path.
///
/// The target directory must exist; it is never created. An existing file
/// with the same name is overwritten. Nothing is written when the fetch or
/// filename derivation fails.
///
/// # Errors
///
/// Returns [`DownloadError`] for fetch failures, when no filename can be
/// derived, or when writing the file fails.
pub async fn run_download(
    client: &HttpClient,
    request: &DownloadRequest,
) -> Result<PathBuf, DownloadError> {
    let span = info_span!("download", url = %request.url, kind = request.kind.as_str());

    async {
        info!("starting download");

        let resolved = client.fetch(&request.url).await?;
        let filename = request.kind.filename(&request.url, &resolved)?;
        let path = write_download(&request.target_dir, &filename, &resolved.bytes).await?;

        info!(path = %path.display(), bytes = resolved.bytes.len(), "finished download");
        Ok::<_, DownloadError>(path)
    }
    .instrument(span)
    .await
}

async fn write_download(
    target_dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, DownloadError> {
    let path = target_dir.join(filename);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;
    Ok(path)
}

/// Handle to a download running on its own Tokio task.
///
/// Awaiting the handle yields the written path or the task's error. Dropping
/// it does not cancel the download.
#[derive(Debug)]
pub struct DownloadHandle {
    url: String,
    kind: DownloadKind,
    task: JoinHandle<Result<PathBuf, DownloadError>>,
}

impl DownloadHandle {
    /// Spawns `request` on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use = "the handle reports whether the download succeeded"]
    pub fn spawn(client: HttpClient, request: DownloadRequest) -> Self {
        let url = request.url.clone();
        let kind = request.kind;
        let task = tokio::spawn(async move { run_download(&client, &request).await });
        Self { url, kind, task }
    }

    /// Returns the source URL of this download.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the kind of this download.
    #[must_use]
    pub fn kind(&self) -> DownloadKind {
        self.kind
    }
}

impl Future for DownloadHandle {
    type Output = Result<PathBuf, DownloadError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(join_error) => Err(DownloadError::task_failed(this.url.clone(), join_error)),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use tempfile::TempDir;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::Session;

    fn client_for(server: &MockServer) -> HttpClient {
        let origin = server.uri().parse::<Url>().unwrap();
        HttpClient::with_session(&Session::new("token"), &origin).unwrap()
    }

    fn resolved(final_url: &str) -> ResolvedDownload {
        ResolvedDownload {
            final_url: final_url.parse().unwrap(),
            bytes: Vec::new(),
        }
    }

    #[test]
    fn test_image_kind_names_from_request_url() {
        let name = DownloadKind::Image
            .filename(
                "https://host/abcdef/i/1/cover.jpg",
                &resolved("https://cdn.example/other.bin?x=1"),
            )
            .unwrap();
        assert_eq!(name, "cover.jpg");
    }

    #[test]
    fn test_binary_kind_names_from_resolved_url() {
        let name = DownloadKind::Binary
            .filename(
                "https://booth.pm/downloadables/42",
                &resolved("https://storage.example/x/model.zip?sig=1"),
            )
            .unwrap();
        assert_eq!(name, "model.zip");
    }

    #[test]
    fn test_binary_kind_error_reports_resolved_url() {
        let err = DownloadKind::Binary
            .filename(
                "https://booth.pm/downloadables/42",
                &resolved("https://storage.example/x/model.zip"),
            )
            .unwrap_err();
        match err {
            DownloadError::Filename { url, .. } => {
                assert_eq!(url, "https://storage.example/x/model.zip");
            }
            other => panic!("Expected Filename error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_download_overwrites_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/abc123/i/7/thumb.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&server)
            .await;
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("thumb.png"), b"old contents").unwrap();

        let request = DownloadRequest::image(
            format!("{}/abc123/i/7/thumb.png", server.uri()),
            temp_dir.path(),
        );
        let path = run_download(&client_for(&server), &request).await.unwrap();

        assert_eq!(path, temp_dir.path().join("thumb.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_run_download_missing_directory_is_io_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/abc123/i/7/thumb.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png".to_vec()))
            .mount(&server)
            .await;
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("not-created");

        let request =
            DownloadRequest::image(format!("{}/abc123/i/7/thumb.png", server.uri()), &missing);
        let result = run_download(&client_for(&server), &request).await;

        assert!(
            matches!(result, Err(DownloadError::Io { .. })),
            "Expected Io error, got: {result:?}"
        );
        assert!(!missing.exists(), "target directory must not be created");
    }

    #[tokio::test]
    async fn test_handle_reports_url_and_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl/file.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip".to_vec()))
            .mount(&server)
            .await;
        let temp_dir = TempDir::new().unwrap();
        let url = format!("{}/dl/file.zip", server.uri());

        let handle = DownloadHandle::spawn(
            client_for(&server),
            DownloadRequest::binary(url.clone(), temp_dir.path()),
        );
        assert_eq!(handle.url(), url);
        assert_eq!(handle.kind(), DownloadKind::Binary);

        // No query string on the resolved URL, so no filename can be derived.
        let result = handle.await;
        assert!(matches!(result, Err(DownloadError::Filename { .. })));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }
}
