//! WordPress REST API connector implementation
//!
//! Implements the `MediaLibrary` trait for `wp/v2/media`.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::media::{
    CreatedMedia, MediaItem, MediaLibrary, MediaPage, MediaQuery, MediaUpload,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::WordPressError;
use crate::types::{WpErrorBody, WpMedia, INVALID_PAGE_NUMBER, TOTAL_PAGES_HEADER};

/// Media collection route, relative to the API base
const MEDIA_ROUTE: &str = "wp/v2/media";

/// HTTP basic-auth credentials
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// WordPress media library connector
///
/// # Features
///
/// - Paginated listing with media-type filtering and page-count hints
/// - Raw-body uploads with explicit content type and filename
/// - Listing requests retried on 429/5xx; uploads sent exactly once
///
/// # Example
///
/// ```ignore
/// use provider_wordpress::{Credentials, WordPressMediaLibrary};
///
/// let library = WordPressMediaLibrary::new(
///     http_client,
///     "https://blog.example.com/wp-json/",
///     Credentials::new("editor", "app-password"),
/// );
/// let page = library.list_media(&MediaQuery::images(1)).await?;
/// ```
pub struct WordPressMediaLibrary {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// API root, always ending with `/`
    api_base: String,

    credentials: Credentials,

    /// Per-request timeout; requests wait indefinitely when unset
    timeout: Option<Duration>,
}

impl WordPressMediaLibrary {
    /// Create a new connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `api_base` - REST root, e.g. `https://example.com/wp-json/`
    /// * `credentials` - user name and (application) password
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_base: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        let mut api_base = api_base.into();
        if !api_base.ends_with('/') {
            api_base.push('/');
        }

        Self {
            http_client,
            api_base,
            credentials,
            timeout: None,
        }
    }

    /// Give up on any request after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// REST root this connector talks to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn media_endpoint(&self) -> String {
        format!("{}{}", self.api_base, MEDIA_ROUTE)
    }

    fn list_url(&self, query: &MediaQuery) -> String {
        let mut url = format!(
            "{}?page={}&per_page={}",
            self.media_endpoint(),
            query.page,
            query.per_page
        );
        if let Some(media_type) = &query.media_type {
            url.push_str(&format!("&media_type={}", urlencoding::encode(media_type)));
        }
        url
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        let request = HttpRequest::new(method, url)
            .basic_auth(&self.credentials.username, &self.credentials.password)
            .header("Accept", "application/json");
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Turn a non-2xx response into a classified error
    fn error_from_response(response: &HttpResponse) -> WordPressError {
        let message = match serde_json::from_slice::<WpErrorBody>(&response.body) {
            Ok(body) if !body.message.is_empty() => format!("{} ({})", body.message, body.code),
            Ok(body) => body.code,
            Err(_) => String::from_utf8_lossy(&response.body).trim().to_string(),
        };
        WordPressError::from_status(response.status, message)
    }

    fn is_past_last_page(response: &HttpResponse) -> bool {
        response.status == 400
            && serde_json::from_slice::<WpErrorBody>(&response.body)
                .map(|body| body.code == INVALID_PAGE_NUMBER)
                .unwrap_or(false)
    }

    fn total_pages(response: &HttpResponse) -> Option<u32> {
        response
            .header(TOTAL_PAGES_HEADER)
            .and_then(|value| value.trim().parse().ok())
    }
}

/// Quote a filename for `Content-Disposition`
///
/// Non-ASCII names also get the RFC 5987 `filename*` form.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if filename.is_ascii() {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

#[async_trait]
impl MediaLibrary for WordPressMediaLibrary {
    #[instrument(skip(self), fields(page = query.page))]
    async fn list_media(&self, query: &MediaQuery) -> Result<MediaPage> {
        let request = self.request(HttpMethod::Get, self.list_url(query));
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        if Self::is_past_last_page(&response) {
            debug!("Requested page is past the end of the listing");
            return Ok(MediaPage::default());
        }

        if !response.is_success() {
            warn!(status = response.status, "Media listing failed");
            return Err(Self::error_from_response(&response).into());
        }

        let media: Vec<WpMedia> = serde_json::from_slice(&response.body).map_err(|e| {
            WordPressError::ParseError(format!("Failed to parse media list response: {}", e))
        })?;

        let items: Vec<MediaItem> = media
            .into_iter()
            .map(|m| MediaItem {
                id: m.id,
                source_url: m.source_url,
            })
            .collect();

        debug!(count = items.len(), "Listed media page");

        Ok(MediaPage {
            items,
            total_pages: Self::total_pages(&response),
        })
    }

    #[instrument(skip(self, upload), fields(filename = %upload.filename, bytes = upload.data.len()))]
    async fn create_media(&self, upload: MediaUpload) -> Result<CreatedMedia> {
        let request = self
            .request(HttpMethod::Post, self.media_endpoint())
            .header("Content-Type", upload.content_type.as_str())
            .header("Content-Disposition", content_disposition(&upload.filename))
            .body(upload.data);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await?;

        if !response.is_success() {
            return Err(Self::error_from_response(&response).into());
        }

        let media: WpMedia = serde_json::from_slice(&response.body).map_err(|e| {
            WordPressError::ParseError(format!("Failed to parse created media: {}", e))
        })?;

        info!(id = media.id, "Created media");

        Ok(CreatedMedia {
            id: media.id,
            title: media.title.rendered,
            source_url: media.source_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
            async fn execute_with_retry(&self, request: HttpRequest, policy: RetryPolicy) -> Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn library(http: MockHttpClient) -> WordPressMediaLibrary {
        WordPressMediaLibrary::new(
            Arc::new(http),
            "https://example.com/wp-json",
            Credentials::new("editor", "secret"),
        )
    }

    #[test]
    fn test_api_base_gets_trailing_slash() {
        let library = library(MockHttpClient::new());
        assert_eq!(library.api_base(), "https://example.com/wp-json/");
        assert_eq!(
            library.list_url(&MediaQuery::images(2)),
            "https://example.com/wp-json/wp/v2/media?page=2&per_page=100&media_type=image"
        );
    }

    #[test]
    fn test_requests_have_no_timeout_by_default() {
        let request = library(MockHttpClient::new())
            .request(HttpMethod::Get, "https://example.com/wp-json/wp/v2/media".to_string());
        assert!(request.timeout.is_none());

        let request = library(MockHttpClient::new())
            .with_timeout(Duration::from_secs(15))
            .request(HttpMethod::Get, "https://example.com/wp-json/wp/v2/media".to_string());
        assert_eq!(request.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("editor", "hunter2"));
        assert!(rendered.contains("editor"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("pic_1.png"),
            "attachment; filename=\"pic_1.png\""
        );
        assert_eq!(
            content_disposition("café.png"),
            "attachment; filename=\"caf_.png\"; filename*=UTF-8''caf%C3%A9.png"
        );
    }

    #[tokio::test]
    async fn test_list_media_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute_with_retry().times(1).returning(|req, policy| {
            assert!(policy.max_attempts > 1);
            assert_eq!(req.method, HttpMethod::Get);
            assert!(req.url.contains("page=1"));
            assert!(req.url.contains("media_type=image"));
            assert!(req.headers.contains_key("Authorization"));

            let mut headers = HashMap::new();
            headers.insert("x-wp-totalpages".to_string(), "4".to_string());
            Ok(HttpResponse {
                status: 200,
                headers,
                body: Bytes::from(
                    r#"[
                        {"id": 1, "title": {"rendered": "cat"}, "source_url": "https://example.com/wp-content/uploads/cat.png"},
                        {"id": 2, "title": {"rendered": "dog"}, "source_url": "https://example.com/wp-content/uploads/dog.jpg"}
                    ]"#,
                ),
            })
        });

        let page = library(mock_http)
            .list_media(&MediaQuery::images(1))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, 2);
        assert_eq!(page.total_pages, Some(4));
    }

    #[tokio::test]
    async fn test_list_media_past_last_page_is_empty() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute_with_retry().times(1).returning(|_, _| {
            Ok(response(
                400,
                r#"{"code": "rest_post_invalid_page_number", "message": "The page number requested is larger than the number of pages available.", "data": {"status": 400}}"#,
            ))
        });

        let page = library(mock_http)
            .list_media(&MediaQuery::images(9))
            .await
            .unwrap();

        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_list_media_other_errors_surface() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|_, _| Ok(response(500, "Internal Server Error")));

        let err = library(mock_http)
            .list_media(&MediaQuery::images(1))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_create_media_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|req, policy| {
                assert_eq!(policy.max_attempts, 1);
                assert_eq!(req.method, HttpMethod::Post);
                assert!(req.url.ends_with("/wp-json/wp/v2/media"));
                assert_eq!(
                    req.headers.get("Content-Type"),
                    Some(&"image/png".to_string())
                );
                assert_eq!(
                    req.headers.get("Content-Disposition"),
                    Some(&"attachment; filename=\"cat.png\"".to_string())
                );
                assert_eq!(req.body.as_deref(), Some(&b"png-bytes"[..]));

                Ok(response(
                    201,
                    r#"{"id": 99, "title": {"rendered": "cat"}, "source_url": "https://example.com/wp-content/uploads/cat.png"}"#,
                ))
            });

        let created = library(mock_http)
            .create_media(MediaUpload {
                data: Bytes::from_static(b"png-bytes"),
                filename: "cat.png".to_string(),
                content_type: "image/png".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, 99);
        assert_eq!(created.title, "cat");
        assert_eq!(
            created.source_url,
            "https://example.com/wp-content/uploads/cat.png"
        );
    }

    #[tokio::test]
    async fn test_create_media_bad_gateway_keeps_status() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute_with_retry()
            .times(1)
            .returning(|_, _| Ok(response(502, "<html>Bad Gateway</html>")));

        let err = library(mock_http)
            .create_media(MediaUpload {
                data: Bytes::from_static(b"x"),
                filename: "cat.png".to_string(),
                content_type: "image/png".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(502));
    }

    #[tokio::test]
    async fn test_create_media_rejected_credentials() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute_with_retry().times(1).returning(|_, _| {
            Ok(response(
                401,
                r#"{"code": "rest_cannot_create", "message": "Sorry, you are not allowed to upload files.", "data": {"status": 401}}"#,
            ))
        });

        let err = library(mock_http)
            .create_media(MediaUpload {
                data: Bytes::from_static(b"x"),
                filename: "cat.png".to_string(),
                content_type: "image/png".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(401));
        assert!(err.to_string().contains("rest_cannot_create"));
    }
}
