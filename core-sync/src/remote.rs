//! # Remote Inventory
//!
//! Pages through the media library and collects the file names it already
//! holds.
//!
//! Listing stops on an empty page or when the page-count hint says the last
//! page was reached. A failing request aborts the fetch with
//! [`SyncError::RemoteListing`] unless lenient mode is on, in which case it
//! is logged and treated as the end of the listing.

use crate::{Result, SyncError};
use bridge_traits::media::{MediaLibrary, MediaQuery};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// File names present in the remote library
#[derive(Debug, Clone, Default)]
pub struct RemoteInventory {
    names: HashSet<String>,
    keys: HashSet<String>,
}

impl RemoteInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file name, case preserved.
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.keys.insert(name.to_lowercase());
        self.names.insert(name);
    }

    /// Case-insensitive membership test on a base file name
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RemoteInventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut inventory = RemoteInventory::new();
        for name in iter {
            inventory.insert(name);
        }
        inventory
    }
}

/// Extracts the percent-decoded last path segment of a media URL.
///
/// Returns `None` for URLs without a file component.
pub fn remote_file_name(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;

    match urlencoding::decode(segment) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(segment.to_string()),
    }
}

/// Builds the [`RemoteInventory`] from a [`MediaLibrary`]
pub struct RemoteInventoryFetcher {
    library: Arc<dyn MediaLibrary>,
    lenient: bool,
}

impl RemoteInventoryFetcher {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            library,
            lenient: false,
        }
    }

    /// Treat listing failures as the end of the listing.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    #[instrument(skip(self), fields(lenient = self.lenient))]
    pub async fn fetch(&self) -> Result<RemoteInventory> {
        let mut inventory = RemoteInventory::new();
        let mut query = MediaQuery::images(1);

        loop {
            let page = match self.library.list_media(&query).await {
                Ok(page) => page,
                Err(e) if self.lenient => {
                    warn!(
                        page = query.page,
                        error = %e,
                        "Remote listing failed, treating as end of data"
                    );
                    break;
                }
                Err(e) => {
                    return Err(SyncError::RemoteListing {
                        page: query.page,
                        message: e.to_string(),
                    })
                }
            };

            if page.items.is_empty() {
                debug!(page = query.page, "Empty page, listing complete");
                break;
            }

            for item in &page.items {
                match remote_file_name(&item.source_url) {
                    Some(name) => inventory.insert(name),
                    None => debug!(id = item.id, url = %item.source_url, "Media without file name"),
                }
            }

            info!(page = query.page, total = inventory.len(), "Fetched remote media");

            if !page.has_more_after(query.page) {
                break;
            }
            query = query.next_page();
        }

        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::media::{CreatedMedia, MediaItem, MediaPage, MediaUpload};
    use mockall::mock;
    use mockall::predicate::function;

    mock! {
        Library {}

        #[async_trait]
        impl MediaLibrary for Library {
            async fn list_media(&self, query: &MediaQuery) -> BridgeResult<MediaPage>;
            async fn create_media(&self, upload: MediaUpload) -> BridgeResult<CreatedMedia>;
        }
    }

    fn full_page(page: u32, size: usize) -> MediaPage {
        MediaPage {
            items: (0..size)
                .map(|i| MediaItem {
                    id: (page as u64) * 1000 + i as u64,
                    source_url: format!(
                        "https://example.com/wp-content/uploads/2024/01/p{}-{}.png",
                        page, i
                    ),
                })
                .collect(),
            total_pages: None,
        }
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let mut library = MockLibrary::new();
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page <= 2))
            .times(2)
            .returning(|q| Ok(full_page(q.page, 100)));
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page == 3))
            .times(1)
            .returning(|_| Ok(MediaPage::default()));

        let inventory = RemoteInventoryFetcher::new(Arc::new(library))
            .fetch()
            .await
            .unwrap();

        assert_eq!(inventory.len(), 200);
        assert!(inventory.contains("P1-0.PNG"));
    }

    #[tokio::test]
    async fn test_stops_on_total_pages_hint() {
        let mut library = MockLibrary::new();
        library.expect_list_media().times(2).returning(|q| {
            let mut page = full_page(q.page, 3);
            page.total_pages = Some(2);
            Ok(page)
        });

        let inventory = RemoteInventoryFetcher::new(Arc::new(library))
            .fetch()
            .await
            .unwrap();

        assert_eq!(inventory.len(), 6);
    }

    #[tokio::test]
    async fn test_listing_error_is_surfaced() {
        let mut library = MockLibrary::new();
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page == 1))
            .returning(|q| Ok(full_page(q.page, 100)));
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page == 2))
            .returning(|_| {
                Err(BridgeError::HttpStatus {
                    status: 503,
                    message: "Service Unavailable".to_string(),
                })
            });

        let result = RemoteInventoryFetcher::new(Arc::new(library)).fetch().await;

        assert!(matches!(result, Err(SyncError::RemoteListing { page: 2, .. })));
    }

    #[tokio::test]
    async fn test_lenient_listing_keeps_partial_inventory() {
        let mut library = MockLibrary::new();
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page == 1))
            .returning(|q| Ok(full_page(q.page, 100)));
        library
            .expect_list_media()
            .with(function(|q: &MediaQuery| q.page == 2))
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let inventory = RemoteInventoryFetcher::new(Arc::new(library))
            .lenient(true)
            .fetch()
            .await
            .unwrap();

        assert_eq!(inventory.len(), 100);
    }

    #[test]
    fn test_remote_file_name() {
        assert_eq!(
            remote_file_name("https://example.com/wp-content/uploads/2024/01/Cat.PNG").as_deref(),
            Some("Cat.PNG")
        );
        assert_eq!(
            remote_file_name("https://example.com/uploads/my%20cat.png?ver=2").as_deref(),
            Some("my cat.png")
        );
        assert_eq!(remote_file_name("https://example.com/"), None);
        assert_eq!(remote_file_name("not a url"), None);
    }

    #[test]
    fn test_inventory_is_case_insensitive() {
        let inventory: RemoteInventory = ["Dog.png", "cat.PNG"].into_iter().collect();

        assert!(inventory.contains("cat.png"));
        assert!(inventory.contains("DOG.PNG"));
        assert!(!inventory.contains("bird.png"));
        assert_eq!(inventory.names().count(), 2);
    }
}
