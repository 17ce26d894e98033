use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::filename::sanitize_filename;
use crate::persist::{PartialDownload, PersistError};
use crate::{CompressRequest, CompressedFile, DownloadRequest, FailureKind, ServiceError};

const COMPRESS_PATH: &str = "compress";
const PDF_MIME: &str = "application/pdf";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(600_000);

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Service root. Always ends with `/` so relative paths join under it.
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Client-side ceiling for one compression request.
    pub request_timeout: Duration,
}

impl ServiceSettings {
    pub fn with_base_url(raw: &str) -> Result<Self, url::ParseError> {
        let mut base = raw.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&base)?,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

#[async_trait::async_trait]
pub trait CompressionService: Send + Sync {
    /// Upload the file and wait for the service verdict.
    ///
    /// Resolves to `FailureKind::Cancelled` as soon as `cancel` fires and to
    /// `FailureKind::Timeout` once the request timeout elapses; in both cases
    /// the in-flight request is dropped. Failing to connect at all is a
    /// `FailureKind::Network` error, whatever the cause.
    async fn compress(
        &self,
        request: &CompressRequest,
        cancel: &CancellationToken,
    ) -> Result<CompressedFile, ServiceError>;

    /// Fetch a compressed file and store it under `dest_dir`.
    async fn download(
        &self,
        request: &DownloadRequest,
        dest_dir: &Path,
    ) -> Result<PathBuf, ServiceError>;
}

/// Body shapes the service answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireReply {
    Failed { error: String },
    Compressed(CompressedFile),
}

#[derive(Debug, Clone)]
pub struct ReqwestCompressionService {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl ReqwestCompressionService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, relative: &str) -> Result<Url, ServiceError> {
        self.settings
            .base_url
            .join(relative)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn upload(&self, request: &CompressRequest) -> Result<CompressedFile, ServiceError> {
        let bytes = tokio::fs::read(&request.source)
            .await
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))?;
        let byte_len = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(request.file_name.clone())
            .mime_str(PDF_MIME)
            .map_err(map_reqwest_error)?;
        let form = Form::new()
            .part("file", part)
            .text("target_mb", request.target_mb.to_string());

        let url = self.endpoint(COMPRESS_PATH)?;
        engine_logging::engine_info!(
            "job {} POST {} ({} bytes, target {}MB)",
            request.job_id,
            url,
            byte_len,
            request.target_mb
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        decode_reply(status, &body)
    }
}

#[async_trait::async_trait]
impl CompressionService for ReqwestCompressionService {
    async fn compress(
        &self,
        request: &CompressRequest,
        cancel: &CancellationToken,
    ) -> Result<CompressedFile, ServiceError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(ServiceError::new(FailureKind::Cancelled, "request cancelled"))
            }
            outcome = tokio::time::timeout(self.settings.request_timeout, self.upload(request)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => {
                        let after = self.settings.request_timeout;
                        Err(ServiceError::new(
                            FailureKind::Timeout { after },
                            format!("no response within {after:?}"),
                        ))
                    }
                }
            }
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        dest_dir: &Path,
    ) -> Result<PathBuf, ServiceError> {
        let url = self.endpoint(&request.relative_url)?;
        let response = self
            .client
            .get(url)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Err(match serde_json::from_slice::<WireReply>(&body) {
                Ok(WireReply::Failed { error }) => ServiceError::new(FailureKind::Service, error),
                _ => http_status_error(status),
            });
        }

        let mut partial = PartialDownload::create(dest_dir, &sanitize_filename(&request.filename))
            .map_err(map_persist_error)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            partial.write_chunk(&chunk).map_err(map_persist_error)?;
            engine_logging::engine_trace!(
                "{}: {} bytes received",
                request.filename,
                partial.bytes_written()
            );
        }
        partial.commit().map_err(map_persist_error)
    }
}

fn decode_reply(status: StatusCode, body: &[u8]) -> Result<CompressedFile, ServiceError> {
    match serde_json::from_slice::<WireReply>(body) {
        Ok(WireReply::Failed { error }) => Err(ServiceError::new(FailureKind::Service, error)),
        Ok(WireReply::Compressed(file)) if status.is_success() => Ok(file),
        Ok(WireReply::Compressed(_)) => Err(http_status_error(status)),
        Err(_) if !status.is_success() => Err(http_status_error(status)),
        Err(err) => Err(ServiceError::new(
            FailureKind::InvalidResponse,
            format!("Unexpected response from server: {err}"),
        )),
    }
}

fn http_status_error(status: StatusCode) -> ServiceError {
    ServiceError::new(
        FailureKind::HttpStatus(status.as_u16()),
        format!("Server error (HTTP {})", status.as_u16()),
    )
}

/// Transport failures are connectivity problems. Only the request ceiling in
/// `compress` counts as a timeout, so a connect timeout lands here too.
fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    ServiceError::new(FailureKind::Network, err.to_string())
}

fn map_persist_error(err: PersistError) -> ServiceError {
    ServiceError::new(FailureKind::Io, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let settings = ServiceSettings::with_base_url("http://host:8080/app").unwrap();
        assert_eq!(settings.base_url.as_str(), "http://host:8080/app/");
        assert_eq!(
            settings.base_url.join(COMPRESS_PATH).unwrap().as_str(),
            "http://host:8080/app/compress"
        );
    }

    #[test]
    fn error_body_wins_over_status() {
        let err = decode_reply(StatusCode::PAYLOAD_TOO_LARGE, br#"{"error":"too big"}"#)
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::Service);
        assert_eq!(err.message, "too big");
    }

    #[test]
    fn html_error_page_maps_to_status() {
        let err = decode_reply(StatusCode::BAD_GATEWAY, b"<html>502</html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::HttpStatus(502));
        assert_eq!(err.message, "Server error (HTTP 502)");
    }

    #[test]
    fn garbage_success_body_is_invalid() {
        let err = decode_reply(StatusCode::OK, b"not json").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidResponse);
    }

    #[test]
    fn already_under_target_has_no_target_echo() {
        let body = br#"{"status":"already_under_target","original_mb":1.5,"compressed_mb":1.5,
            "ratio":0,"download_id":"ab","filename":"x_compressed.pdf"}"#;
        let file = decode_reply(StatusCode::OK, body).unwrap();
        assert_eq!(file.status, crate::ReplyStatus::AlreadyUnderTarget);
        assert_eq!(file.target_mb, None);
    }
}
