//! WordPress REST API response types
//!
//! Data structures for deserializing `wp/v2/media` responses.

use serde::{Deserialize, Serialize};

/// Error code WordPress answers with when `page` is past the last page
pub const INVALID_PAGE_NUMBER: &str = "rest_post_invalid_page_number";

/// Header carrying the total number of pages of a listing
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Media attachment resource
///
/// See: https://developer.wordpress.org/rest-api/reference/media/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WpMedia {
    /// Attachment ID
    pub id: u64,

    /// Attachment title
    #[serde(default)]
    pub title: RenderedField,

    /// URL of the original file
    pub source_url: String,

    /// `image`, `file`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// `{ "rendered": ... }` wrapper used by WordPress for text fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedField {
    #[serde(default)]
    pub rendered: String,
}

/// Error body returned by the REST API
#[derive(Debug, Deserialize)]
pub struct WpErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_media() {
        let body = r#"{
            "id": 42,
            "title": {"rendered": "cat"},
            "source_url": "https://example.com/wp-content/uploads/2024/01/cat.png",
            "media_type": "image",
            "mime_type": "image/png",
            "alt_text": ""
        }"#;

        let media: WpMedia = serde_json::from_str(body).unwrap();
        assert_eq!(media.id, 42);
        assert_eq!(media.title.rendered, "cat");
        assert_eq!(media.media_type.as_deref(), Some("image"));
    }

    #[test]
    fn test_deserialize_media_without_title() {
        let body = r#"{"id": 7, "source_url": "https://example.com/a.jpg"}"#;

        let media: WpMedia = serde_json::from_str(body).unwrap();
        assert_eq!(media.title.rendered, "");
        assert!(media.mime_type.is_none());
    }

    #[test]
    fn test_deserialize_error_body() {
        let body = r#"{
            "code": "rest_post_invalid_page_number",
            "message": "The page number requested is larger than the number of pages available.",
            "data": {"status": 400}
        }"#;

        let error: WpErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(error.code, INVALID_PAGE_NUMBER);
    }
}
