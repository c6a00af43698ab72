//! Single-file multipart uploads to the media library.

use bytes::{Bytes, BytesMut};
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::client::{WordPressClient, reason};
use super::error::{ApiError, ApiResult, Surface, error_chain};

const BOUNDARY_PREFIX: &str = "----WebKitFormBoundary";
const BOUNDARY_RANDOM_LEN: usize = 16;
const OCTET_STREAM: &str = "application/octet-stream";

/// Filename used when neither the caller nor the source URL provides one.
pub const FALLBACK_FILENAME: &str = "upload";

const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
];

/// Content type for a filename, by extension.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    let ext = ext.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(OCTET_STREAM)
}

/// Last non-empty path segment of a URL, or [`FALLBACK_FILENAME`].
pub fn filename_from_url(source: &str) -> String {
    url::Url::parse(source)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last().map(str::to_string))
        })
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// A `multipart/form-data` body with exactly one part named `file`.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    body: Bytes,
}

impl MultipartBody {
    /// Encode `data` as the single `file` part, with a fresh random boundary.
    pub fn file(filename: &str, content_type: &str, data: &[u8]) -> Self {
        let mut boundary = random_boundary();
        while contains(data, boundary.as_bytes()) {
            boundary = random_boundary();
        }
        Self::with_boundary(boundary, filename, content_type, data)
    }

    /// Encode with a caller-chosen boundary.
    pub fn with_boundary(boundary: String, filename: &str, content_type: &str, data: &[u8]) -> Self {
        let head = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: {content_type}\r\n\r\n",
            sanitize_filename(filename)
        );
        let tail = format!("\r\n--{boundary}--\r\n");

        let mut buf = BytesMut::with_capacity(head.len() + data.len() + tail.len());
        buf.extend_from_slice(head.as_bytes());
        buf.extend_from_slice(data);
        buf.extend_from_slice(tail.as_bytes());

        Self {
            boundary,
            body: buf.freeze(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }
}

fn random_boundary() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_RANDOM_LEN)
        .map(char::from)
        .collect();
    format!("{BOUNDARY_PREFIX}{suffix}")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Quotes and line breaks would corrupt the part header.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '"' => '\'',
            '\r' | '\n' => '_',
            other => other,
        })
        .collect()
}

impl WordPressClient {
    /// Upload raw bytes to the media library as `filename`.
    pub async fn upload_media(&self, data: &[u8], filename: &str) -> ApiResult<Value> {
        let body = MultipartBody::file(filename, mime_for_filename(filename), data);
        self.post_multipart(body).await
    }

    /// Fetch a remote file and upload it to the media library.
    ///
    /// The upload reuses the source's `Content-Type`. The filename defaults
    /// to the last path segment of `source_url`.
    pub async fn upload_media_from_url(
        &self,
        source_url: &str,
        filename: Option<&str>,
    ) -> ApiResult<Value> {
        debug!(source_url, "Fetching remote media");
        let response = self
            .http()
            .get(source_url)
            .send()
            .await
            .map_err(|e| ApiError::SourceTransport {
                message: error_chain(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::SourceStatus {
                status: status.as_u16(),
                reason: reason(status),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(OCTET_STREAM)
            .to_string();
        let data = response
            .bytes()
            .await
            .map_err(|e| ApiError::SourceTransport {
                message: error_chain(&e),
            })?;

        let filename = match filename.filter(|f| !f.is_empty()) {
            Some(name) => name.to_string(),
            None => filename_from_url(source_url),
        };

        let body = MultipartBody::file(&filename, &content_type, &data);
        self.post_multipart(body).await
    }

    async fn post_multipart(&self, body: MultipartBody) -> ApiResult<Value> {
        debug!(bytes = body.as_bytes().len(), "Uploading media");
        let request = self
            .http()
            .post(self.core_url("/media"))
            .header(AUTHORIZATION, self.basic_auth())
            .header(CONTENT_TYPE, body.content_type())
            .body(body.into_body());
        self.send(Surface::Media, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_filename("photo.PNG"), "image/png");
        assert_eq!(mime_for_filename("a.jpeg"), "image/jpeg");
        assert_eq!(mime_for_filename("a.webp"), "image/webp");
        assert_eq!(mime_for_filename("notes.txt"), OCTET_STREAM);
        assert_eq!(mime_for_filename("README"), OCTET_STREAM);
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(filename_from_url("https://cdn.example.com/img/cat.jpg?x=1"), "cat.jpg");
        assert_eq!(filename_from_url("https://cdn.example.com/img/"), "img");
        assert_eq!(filename_from_url("https://cdn.example.com/"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url("not a url"), FALLBACK_FILENAME);
    }

    #[test]
    fn test_body_layout() {
        let body = MultipartBody::with_boundary(
            "----WebKitFormBoundaryTEST".to_string(),
            "a.png",
            "image/png",
            b"PNGDATA",
        );
        let expected = "------WebKitFormBoundaryTEST\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\r\n\
            PNGDATA\r\n\
            ------WebKitFormBoundaryTEST--\r\n";
        assert_eq!(body.as_bytes(), expected.as_bytes());
        assert_eq!(
            body.content_type(),
            "multipart/form-data; boundary=----WebKitFormBoundaryTEST"
        );
    }

    #[test]
    fn test_random_boundary_shape() {
        let body = MultipartBody::file("a.bin", OCTET_STREAM, b"data");
        let boundary = body.boundary();
        assert!(boundary.starts_with(BOUNDARY_PREFIX));
        assert_eq!(boundary.len(), BOUNDARY_PREFIX.len() + BOUNDARY_RANDOM_LEN);
    }

    #[test]
    fn test_filename_is_sanitized() {
        let body = MultipartBody::with_boundary("b".to_string(), "x\"y\r\n.png", "image/png", b"");
        let text = String::from_utf8(body.as_bytes().to_vec()).unwrap();
        assert!(text.contains("filename=\"x'y__.png\""));
    }

    #[tokio::test]
    async fn test_upload_media_posts_multipart_with_auth() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wp/v2/media")
                .status(StatusCode::CREATED)
                .json(json!({"id": 99, "source_url": "https://site/cat.png"})),
        ])
        .await;

        let value = backend
            .client()
            .upload_media(b"\x89PNG", "cat.png")
            .await
            .unwrap();
        assert_eq!(value["id"], 99);

        let request = &backend.requests()[0];
        assert_eq!(request.header("authorization"), Some("Basic YWRtaW46c2VjcmV0"));
        let content_type = request.header("content-type").unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data; boundary=----WebKitFormBoundary"));
        let body = String::from_utf8_lossy(&request.body);
        assert!(body.contains("filename=\"cat.png\""));
        assert!(body.contains("Content-Type: image/png"));
    }

    #[tokio::test]
    async fn test_upload_from_url_reuses_source_type_and_name() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/remote/files/report.pdf")
                .content_type("application/pdf")
                .text("%PDF-1.7"),
            MockRoute::post("/wp-json/wp/v2/media").json(json!({"id": 5})),
        ])
        .await;

        let source = format!("{}/remote/files/report.pdf", backend.url);
        let value = backend
            .client()
            .upload_media_from_url(&source, None)
            .await
            .unwrap();
        assert_eq!(value["id"], 5);

        let uploads = backend.requests_to("/wp-json/wp/v2/media");
        assert_eq!(uploads.len(), 1);
        let body = String::from_utf8_lossy(&uploads[0].body);
        assert!(body.contains("filename=\"report.pdf\""));
        assert!(body.contains("Content-Type: application/pdf"));
        assert!(body.contains("%PDF-1.7"));
    }

    #[tokio::test]
    async fn test_upload_from_url_source_failure() {
        let backend = MockBackend::start(vec![]).await;

        let source = format!("{}/remote/missing.png", backend.url);
        let err = backend
            .client()
            .upload_media_from_url(&source, Some("x.png"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch media from URL: 404 Not Found");
        assert!(backend.requests_to("/wp-json/wp/v2/media").is_empty());
    }
}
