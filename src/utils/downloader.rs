use futures_util::future;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Progress bar template error: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),

    #[error("File verification failed: expected {expected}, got {actual}")]
    VerificationFailed { expected: String, actual: String },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
}

pub type DownloadResult<T> = Result<T, DownloadError>;

/// One file to fetch.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub destination: PathBuf,
    pub sha256: Option<String>,
}

/// Streams model files to disk with a progress bar.
///
/// Bytes land in `<destination>.part` and are renamed into place only once
/// the transfer (and the optional SHA-256 check) succeeded, so an interrupted
/// download never looks like a usable model.
pub struct ModelDownloader {
    client: Client,
}

impl Default for ModelDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDownloader {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    pub fn partial_path(destination: &Path) -> PathBuf {
        let mut name = destination.as_os_str().to_owned();
        name.push(".part");
        PathBuf::from(name)
    }

    pub async fn download_file(&self, url: &str, destination: &Path, expected_sha256: Option<&str>) -> DownloadResult<()> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = destination
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned();

        debug!("GET {url}");
        let mut response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(DownloadError::InvalidResponse {
                url: url.to_string(),
                reason: format!(
                    "HTTP {}: {}",
                    status,
                    response.text().await.unwrap_or_else(|_| "Unknown error".to_string())
                ),
            });
        }

        let pb = ProgressBar::new(response.content_length().unwrap_or(0));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Downloading {file_name}"));

        let partial = Self::partial_path(destination);
        let mut file = File::create(&partial).await?;
        let mut hasher = expected_sha256.map(|_| Sha256::new());
        let mut downloaded = 0u64;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            if let Some(hasher) = hasher.as_mut() {
                hasher.update(&chunk);
            }
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush().await?;
        drop(file);

        if let (Some(expected), Some(hasher)) = (expected_sha256, hasher) {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                pb.abandon_with_message(format!("Checksum mismatch for {file_name}"));
                if let Err(err) = tokio::fs::remove_file(&partial).await {
                    warn!("Could not remove {}: {}", partial.display(), err);
                }
                return Err(DownloadError::VerificationFailed {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        tokio::fs::rename(&partial, destination).await?;
        pb.finish_with_message(format!("Downloaded {file_name} ({downloaded} bytes)"));
        Ok(())
    }

    /// Fetches every request concurrently; the first failure is returned
    /// after all transfers have settled.
    pub async fn download_files(&self, requests: &[DownloadRequest]) -> DownloadResult<()> {
        let tasks = requests
            .iter()
            .map(|request| self.download_file(&request.url, &request.destination, request.sha256.as_deref()));

        future::join_all(tasks).await.into_iter().collect()
    }
}
