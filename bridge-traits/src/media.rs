//! Remote Media Library Abstraction
//!
//! Contract for the content-management backend that owns the media library
//! assets are uploaded to.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Page size used when walking the media listing
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parameters of a single media listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    /// 1-based page cursor
    pub page: u32,
    /// Entries per page
    pub per_page: u32,
    /// Restrict to one media type (e.g. `image`)
    pub media_type: Option<String>,
}

impl MediaQuery {
    /// Image listing query for the given page
    pub fn images(page: u32) -> Self {
        Self {
            page,
            per_page: DEFAULT_PAGE_SIZE,
            media_type: Some("image".to_string()),
        }
    }

    /// Same query, next page
    pub fn next_page(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

/// One entry of the remote media library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    /// Canonical URL of the stored file
    pub source_url: String,
}

/// One page of the media listing
#[derive(Debug, Clone, Default)]
pub struct MediaPage {
    pub items: Vec<MediaItem>,
    /// Total number of pages, when the backend advertises it
    pub total_pages: Option<u32>,
}

impl MediaPage {
    /// Whether a page after `current` may hold entries.
    ///
    /// An empty page always ends the listing; without a hint the caller has to
    /// ask for the next page to find out.
    pub fn has_more_after(&self, current: u32) -> bool {
        if self.items.is_empty() {
            return false;
        }
        match self.total_pages {
            Some(total) => current < total,
            None => true,
        }
    }
}

/// A file to create in the media library
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Media entry created by an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedMedia {
    pub id: u64,
    pub title: String,
    pub source_url: String,
}

/// Remote media library trait
///
/// Implementations are shared across concurrent upload tasks and must be
/// safe for concurrent use.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::media::{MediaLibrary, MediaQuery};
///
/// async fn first_page(library: &dyn MediaLibrary) -> Result<usize> {
///     let page = library.list_media(&MediaQuery::images(1)).await?;
///     Ok(page.items.len())
/// }
/// ```
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// List one page of media entries
    ///
    /// A page past the end of the listing is reported as an empty page,
    /// not as an error.
    async fn list_media(&self, query: &MediaQuery) -> Result<MediaPage>;

    /// Create a media entry from raw bytes
    ///
    /// # Errors
    ///
    /// Rejections by the backend are returned as
    /// [`BridgeError::HttpStatus`](crate::error::BridgeError::HttpStatus) so
    /// callers can classify them by status code.
    async fn create_media(&self, upload: MediaUpload) -> Result<CreatedMedia>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: usize, total_pages: Option<u32>) -> MediaPage {
        MediaPage {
            items: (0..items as u64)
                .map(|id| MediaItem {
                    id,
                    source_url: format!("https://example.com/uploads/{}.png", id),
                })
                .collect(),
            total_pages,
        }
    }

    #[test]
    fn test_image_query_defaults() {
        let query = MediaQuery::images(1);
        assert_eq!(query.per_page, 100);
        assert_eq!(query.media_type.as_deref(), Some("image"));
        assert_eq!(query.next_page().page, 2);
        assert_eq!(query.next_page().per_page, 100);
    }

    #[test]
    fn test_empty_page_ends_listing() {
        assert!(!page(0, None).has_more_after(1));
        assert!(!page(0, Some(5)).has_more_after(1));
    }

    #[test]
    fn test_total_pages_hint() {
        assert!(page(100, Some(3)).has_more_after(2));
        assert!(!page(100, Some(3)).has_more_after(3));
        assert!(page(100, None).has_more_after(7));
    }
}
