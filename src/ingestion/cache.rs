//! Fetch-if-absent disk cache for raw FAQ pages.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use url::Url;

use crate::types::{HarvestError, PageId};

/// Filesystem-backed cache for downloaded pages.
///
/// Pages are keyed by [`PageId`] and stored under
/// `<root>/<language>/<category><index+1>.html`, so repeated runs reuse
/// previously downloaded pages instead of hitting the network.
#[derive(Clone, Debug)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    /// Creates a cache rooted at the provided path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Computes the cache file path for a page.
    pub fn page_path(&self, page: &PageId) -> PathBuf {
        self.root
            .join(page.language.as_str())
            .join(format!("{}.html", page.file_stem()))
    }
}

/// Result of fetching a page, indicating whether it came from the cache.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub page: PageId,
    pub content: String,
    pub bytes: usize,
    pub cache_path: Option<PathBuf>,
    pub from_cache: bool,
}

/// Fetches the page behind `url`, optionally persisting it in `cache`.
///
/// When a cache entry already exists the contents are loaded from disk and
/// no network request is performed; the core never re-fetches on its own.
pub async fn fetch_page(
    client: &Client,
    page: &PageId,
    url: &str,
    cache: Option<&PageCache>,
) -> Result<FetchOutcome, HarvestError> {
    let url = Url::parse(url)
        .map_err(|err| HarvestError::Fetch(format!("{page}: invalid url {url}: {err}")))?;
    let cache_path = cache.map(|cache| cache.page_path(page));

    if let Some(path) = cache_path.as_deref().filter(|path| path.exists()) {
        let content = fs::read_to_string(path).await?;
        tracing::debug!(page = %page, path = %path.display(), "cache hit");
        return Ok(FetchOutcome {
            page: page.clone(),
            bytes: content.len(),
            content,
            cache_path,
            from_cache: true,
        });
    }

    let content = fetch_from_network(client, &url).await?;
    if let Some(path) = &cache_path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, &content).await?;
        tracing::info!(page = %page, bytes = content.len(), "page downloaded and cached");
    }

    Ok(FetchOutcome {
        page: page.clone(),
        bytes: content.len(),
        content,
        cache_path,
        from_cache: false,
    })
}

async fn fetch_from_network(client: &Client, url: &Url) -> Result<String, HarvestError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Language};
    use httpmock::prelude::*;
    use tempfile::tempdir;

    fn page() -> PageId {
        PageId::new(Category::Intrel, Language::En, 0)
    }

    #[test]
    fn cache_path_follows_the_original_naming() {
        let cache = PageCache::new("raw_html");
        let path = cache.page_path(&PageId::new(Category::Doctorate, Language::Es, 1));
        assert!(path.ends_with("es/doctorate2.html"));
    }

    #[tokio::test]
    async fn fetch_uses_cache_when_available() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        let cache_path = cache.page_path(&page());
        fs::create_dir_all(cache_path.parent().unwrap()).await.unwrap();
        fs::write(&cache_path, "cached html").await.unwrap();

        let client = Client::new();
        let outcome = fetch_page(&client, &page(), "http://127.0.0.1:1/faq", Some(&cache))
            .await
            .unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.content, "cached html");
    }

    #[tokio::test]
    async fn fetch_downloads_and_persists_when_absent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/faq");
                then.status(200).body("<html>fresh</html>");
            })
            .await;

        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        let client = Client::new();

        let outcome = fetch_page(&client, &page(), &server.url("/faq"), Some(&cache))
            .await
            .unwrap();
        assert!(!outcome.from_cache);
        assert_eq!(outcome.content, "<html>fresh</html>");
        mock.assert_async().await;

        // Second fetch is served from disk; the mock sees no further hits.
        let outcome = fetch_page(&client, &page(), &server.url("/faq"), Some(&cache))
            .await
            .unwrap();
        assert!(outcome.from_cache);
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test]
    async fn fetch_without_cache_always_hits_the_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/faq");
                then.status(200).body("<html>live</html>");
            })
            .await;

        let client = Client::new();
        for _ in 0..2 {
            let outcome = fetch_page(&client, &page(), &server.url("/faq"), None)
                .await
                .unwrap();
            assert!(!outcome.from_cache);
            assert!(outcome.cache_path.is_none());
            assert_eq!(outcome.content, "<html>live</html>");
        }
        assert_eq!(mock.hits_async().await, 2);
    }
}
