//! The conversion endpoint seam.
//!
//! [`ConversionService`] is the one place the controller touches the
//! network. [`HttpConversionService`] is the real implementation: a single
//! multipart `POST` with one `file` field. Tests and alternative front ends
//! can substitute their own implementation.

use crate::config::ClientConfig;
use crate::error::Doc2SpeechError;
use crate::intake::file::SelectedFile;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Audio returned by a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedAudio {
    pub data: Bytes,
    /// `Content-Type` of the response, if the service sent one.
    pub content_type: Option<String>,
}

/// Turns a document into audio.
#[async_trait]
pub trait ConversionService: Send + Sync {
    /// Convert one file. Returns [`Doc2SpeechError::Service`] when the
    /// service rejects the document and [`Doc2SpeechError::Transport`] or
    /// [`Doc2SpeechError::Timeout`] when no usable answer arrived.
    async fn convert(&self, file: &SelectedFile) -> Result<ConvertedAudio, Doc2SpeechError>;
}

/// Failure body sent by the service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    /// `None` when the body carries no usable detail (`null`).
    fn detail_text(self) -> Option<String> {
        match self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }
}

/// [`ConversionService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConversionService {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl HttpConversionService {
    pub fn new(config: &ClientConfig) -> Result<Self, Doc2SpeechError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Doc2SpeechError::Internal(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport(&self, reason: impl ToString) -> Doc2SpeechError {
        Doc2SpeechError::Transport {
            endpoint: self.endpoint.clone(),
            reason: reason.to_string(),
        }
    }

    fn map_reqwest(&self, e: reqwest::Error) -> Doc2SpeechError {
        if e.is_timeout() {
            Doc2SpeechError::Timeout {
                endpoint: self.endpoint.clone(),
                secs: self.timeout_secs,
            }
        } else {
            self.transport(e)
        }
    }
}

#[async_trait]
impl ConversionService for HttpConversionService {
    async fn convert(&self, file: &SelectedFile) -> Result<ConvertedAudio, Doc2SpeechError> {
        info!("Uploading '{}' ({} bytes) to {}", file.name, file.size(), self.endpoint);

        let part = Part::stream_with_length(file.content().clone(), file.size())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| self.transport(e))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(|e| self.map_reqwest(e))?;
            let parsed: ErrorBody = serde_json::from_slice(&body).map_err(|e| {
                self.transport(format!("HTTP {} with unreadable error body: {}", status, e))
            })?;
            let detail = parsed.detail_text().ok_or_else(|| {
                self.transport(format!("HTTP {} with null error detail", status))
            })?;
            warn!("Conversion rejected with HTTP {}: {}", status, detail);
            return Err(Doc2SpeechError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = response.bytes().await.map_err(|e| self.map_reqwest(e))?;
        debug!("Received {} bytes of audio ({:?})", data.len(), content_type);

        Ok(ConvertedAudio { data, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_verbatim() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"bad format"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("bad format"));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#)
                .unwrap();
        let text = body.detail_text().unwrap();
        assert!(text.contains("field required"), "got: {text}");
    }

    #[test]
    fn missing_detail_does_not_parse() {
        assert!(serde_json::from_str::<ErrorBody>(r#"{"error":"x"}"#).is_err());
    }

    #[test]
    fn null_detail_is_not_a_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":null}"#).unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn new_keeps_endpoint() {
        let config = ClientConfig::builder()
            .endpoint("http://localhost:1/convert")
            .build()
            .unwrap();
        let svc = HttpConversionService::new(&config).unwrap();
        assert_eq!(svc.endpoint(), "http://localhost:1/convert");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on loopback is closed on any sane test host.
        let config = ClientConfig::builder()
            .endpoint("http://127.0.0.1:9/convert")
            .request_timeout_secs(5)
            .build()
            .unwrap();
        let svc = HttpConversionService::new(&config).unwrap();
        let file = SelectedFile::from_bytes(
            "a.pdf",
            crate::intake::media::PDF_MEDIA_TYPE,
            vec![0u8; 4],
        );
        let err = svc.convert(&file).await.unwrap_err();
        assert!(
            matches!(
                err,
                Doc2SpeechError::Transport { .. } | Doc2SpeechError::Timeout { .. }
            ),
            "got: {err:?}"
        );
    }
}
