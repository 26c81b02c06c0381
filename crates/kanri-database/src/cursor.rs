//! Seek cursors and their persistence in the cache port.
//!
//! A [`SeekCursor`] records the composite sort key of the last row of
//! a page. Page N+1 is fetched by filtering to rows strictly after
//! that key, which stays O(page size) no matter how deep the page is.
//! Cursors are advisory: when one is missing the page query falls
//! back to a skip/limit scan, so correctness never depends on cache
//! contents.

use std::time::Duration;

use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use kanri_cache::{CacheManager, keys};
use kanri_core::traits::cache::CacheProvider;
use kanri_core::types::pagination::PageRequest;
use kanri_core::types::sorting::{SortDirection, SortField};

use crate::filter::{ID_FIELD, bson_path};

/// The last row returned for one page of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekCursor {
    /// Id of the last row.
    pub id: ObjectId,
    /// Value of the sort field on the last row.
    pub sort_value: Bson,
    /// Page this cursor terminates (1-based).
    pub page_number: u64,
    /// Page size the cursor was computed for.
    pub page_size: u64,
}

impl SeekCursor {
    /// Derive a cursor from the last raw document of a page. Returns
    /// `None` when the document has no id (which would make the
    /// tie-break undefined).
    pub fn from_document(
        doc: &Document,
        sort: &SortField,
        page_number: u64,
        page_size: u64,
    ) -> Option<Self> {
        let id = doc.get_object_id(ID_FIELD).ok()?;
        let sort_value = bson_path(doc, &sort.field).cloned().unwrap_or(Bson::Null);
        Some(Self {
            id,
            sort_value,
            page_number,
            page_size,
        })
    }

    /// Build the filter selecting rows strictly after this cursor in
    /// the composite `(sort_field, _id)` order. Comparisons flip for
    /// descending sorts.
    pub fn seek_filter(&self, sort: &SortField) -> Document {
        let op = match sort.direction {
            SortDirection::Asc => "$gt",
            SortDirection::Desc => "$lt",
        };

        let mut after_sort = Document::new();
        let mut cmp = Document::new();
        cmp.insert(op, self.sort_value.clone());
        after_sort.insert(sort.field.clone(), cmp);

        let mut same_sort = Document::new();
        same_sort.insert(sort.field.clone(), self.sort_value.clone());
        let mut id_cmp = Document::new();
        id_cmp.insert(op, self.id);

        doc! {
            "$or": [
                after_sort,
                { "$and": [ same_sort, { ID_FIELD: id_cmp } ] },
            ]
        }
    }
}

/// How a page query will be executed, selected by cursor-cache
/// lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum PageStrategy {
    /// Page 1 needs no anchor.
    FirstPage,
    /// Seek past the last row of the previous page.
    Seek(SeekCursor),
    /// No usable cursor: conventional skip/limit scan.
    Skip(u64),
}

/// Persists one seek cursor per (query prefix, page) in the cache
/// port. All operations are best-effort — a failing cache degrades to
/// the skip/limit path, never to an error.
#[derive(Debug, Clone)]
pub struct CursorStore {
    cache: CacheManager,
    ttl: Duration,
}

impl CursorStore {
    /// Create a new cursor store with the cursor TTL tier.
    pub fn new(cache: CacheManager, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Fetch the cursor for one page, if present.
    pub async fn get(&self, prefix: &str, page_number: u64) -> Option<SeekCursor> {
        let key = keys::cursor(prefix, page_number);
        match self.cache.get_json::<SeekCursor>(&key).await {
            Ok(cursor) => cursor,
            Err(e) => {
                warn!(key, error = %e, "Cursor read failed; treating as miss");
                None
            }
        }
    }

    /// Persist a page's tail cursor.
    pub async fn put(&self, prefix: &str, cursor: &SeekCursor) {
        let key = keys::cursor(prefix, cursor.page_number);
        if let Err(e) = self.cache.set_json(&key, cursor, self.ttl).await {
            warn!(key, error = %e, "Cursor write failed");
        }
    }

    /// Select the execution strategy for a page request: the previous
    /// page's cursor when available and computed for the same page
    /// size, otherwise the offset fallback.
    pub async fn strategy_for(&self, prefix: &str, page: &PageRequest) -> PageStrategy {
        if page.page <= 1 {
            return PageStrategy::FirstPage;
        }
        match self.get(prefix, page.page - 1).await {
            Some(cursor) if cursor.page_size == page.page_size => PageStrategy::Seek(cursor),
            _ => PageStrategy::Skip(page.offset()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kanri_cache::memory::MemoryCacheProvider;
    use kanri_core::config::cache::MemoryCacheConfig;

    use super::*;

    fn make_store() -> CursorStore {
        let provider = MemoryCacheProvider::new(
            &MemoryCacheConfig {
                max_capacity: 1000,
                time_to_live_seconds: 60,
            },
            60,
        );
        CursorStore::new(
            CacheManager::from_provider(Arc::new(provider)),
            Duration::from_secs(1800),
        )
    }

    fn make_cursor(page_number: u64, page_size: u64) -> SeekCursor {
        SeekCursor {
            id: ObjectId::new(),
            sort_value: Bson::String("2024-01-01".to_string()),
            page_number,
            page_size,
        }
    }

    #[test]
    fn test_seek_filter_ascending() {
        let cursor = make_cursor(1, 10);
        let sort = SortField::asc("stamp.create_time");
        let filter = cursor.seek_filter(&sort);

        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 2);
        let after = branches[0].as_document().unwrap();
        assert!(
            after
                .get_document("stamp.create_time")
                .unwrap()
                .contains_key("$gt")
        );
    }

    #[test]
    fn test_seek_filter_descending_flips_comparison() {
        let cursor = make_cursor(1, 10);
        let sort = SortField::desc("stamp.create_time");
        let filter = cursor.seek_filter(&sort);

        let branches = filter.get_array("$or").unwrap();
        let after = branches[0].as_document().unwrap();
        assert!(
            after
                .get_document("stamp.create_time")
                .unwrap()
                .contains_key("$lt")
        );
    }

    #[test]
    fn test_cursor_from_document() {
        let id = ObjectId::new();
        let doc = doc! { "_id": id, "stamp": { "create_time": "2024-01-01" } };
        let sort = SortField::asc("stamp.create_time");

        let cursor = SeekCursor::from_document(&doc, &sort, 2, 10).unwrap();
        assert_eq!(cursor.id, id);
        assert_eq!(cursor.sort_value, Bson::String("2024-01-01".into()));

        // A missing sort value degrades to Null rather than failing.
        let bare = doc! { "_id": id };
        let cursor = SeekCursor::from_document(&bare, &sort, 2, 10).unwrap();
        assert_eq!(cursor.sort_value, Bson::Null);

        assert!(SeekCursor::from_document(&doc! {}, &sort, 2, 10).is_none());
    }

    #[tokio::test]
    async fn test_roundtrip_through_cache() {
        let store = make_store();
        let cursor = make_cursor(3, 25);

        store.put("user:cursor:name:asc:h", &cursor).await;
        let loaded = store.get("user:cursor:name:asc:h", 3).await.unwrap();
        assert_eq!(loaded, cursor);
    }

    #[tokio::test]
    async fn test_strategy_selection() {
        let store = make_store();
        let prefix = "user:cursor:name:asc:h";

        // Page 1 never needs an anchor.
        let first = store
            .strategy_for(prefix, &PageRequest::new(1, 10))
            .await;
        assert_eq!(first, PageStrategy::FirstPage);

        // Cold cache: offset fallback.
        let cold = store.strategy_for(prefix, &PageRequest::new(3, 10)).await;
        assert_eq!(cold, PageStrategy::Skip(20));

        // Warm cache: seek from the previous page's cursor.
        let cursor = make_cursor(2, 10);
        store.put(prefix, &cursor).await;
        let warm = store.strategy_for(prefix, &PageRequest::new(3, 10)).await;
        assert_eq!(warm, PageStrategy::Seek(cursor));

        // A cursor computed for a different page size is unusable.
        let mismatched = store
            .strategy_for(prefix, &PageRequest::new(3, 50))
            .await;
        assert_eq!(mismatched, PageStrategy::Skip(100));
    }
}
