//! Paginated fetching with an on-disk result cache in front of the API client.

use scorecard_api::types::RawRecord;
use scorecard_api::{Client, Error as ApiError, Query, SchoolQuery};

use crate::cache::DiskCache;
use crate::error::ScoutError;

/// API client wrapper that assembles every page of a query and caches the
/// full result on disk.
///
/// Cache hits bypass the network entirely. On a miss, pages are requested one
/// at a time in ascending order; any failure aborts the fetch and nothing is
/// cached.
pub struct CachedClient {
    inner: Client,
    cache: DiskCache,
}

impl CachedClient {
    pub fn new(inner: Client, cache: DiskCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    /// Returns every record matching `query`, in API order.
    ///
    /// The first request carries no page cursor and tells us the total and
    /// the page size. Its results are page 0, so the remaining pages start
    /// at index 1.
    pub async fn fetch_all(&self, query: &SchoolQuery) -> Result<Vec<RawRecord>, ScoutError> {
        if let Some(records) = self.cache.lookup(query) {
            tracing::debug!("Cache hit for [{}]: {} records", query.canonical(), records.len());
            return Ok(records);
        }

        let first = self.inner.get_schools(query, None).await?;
        let metadata = first.metadata;
        let pages = metadata
            .page_count()
            .and_then(|pages| u32::try_from(pages).ok())
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!(
                    "cannot page {} results at {} per page",
                    metadata.total, metadata.per_page
                ))
            })?;
        tracing::info!(
            "Fetching {} results across {} pages for [{}]",
            metadata.total,
            pages,
            query.canonical()
        );

        let mut records = Vec::new();
        if pages > 0 {
            tracing::info!("Fetching page 0");
            records.extend(first.results);
        }
        for page in 1..pages {
            tracing::info!("Fetching page {}", page);
            let resp = self.inner.get_schools(query, Some(page)).await?;
            records.extend(resp.results);
        }

        self.cache.store(query, &records)?;
        Ok(records)
    }
}
