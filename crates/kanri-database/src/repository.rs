//! The generic, cache-coherent document repository.
//!
//! One `DocumentRepository<E>` exists per entity type. It owns index
//! creation, tenant-scoped filtering, cache read-through for single
//! entities, lists, counts and pages, partial-field updates, logical
//! deletion, and seek pagination with a skip/limit fallback.
//!
//! Cache handling is best-effort throughout: every cache failure is
//! logged at `warn` and treated as a miss, and the document store
//! stays authoritative. Store errors are never swallowed.

use std::time::Duration;

use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Collection, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use kanri_cache::{CacheManager, keys};
use kanri_core::config::cache::CacheConfig;
use kanri_core::error::{AppError, ErrorKind};
use kanri_core::result::AppResult;
use kanri_core::traits::cache::CacheProvider;
use kanri_core::traits::entity::{DocumentEntity, Projection};
use kanri_core::types::id::TenantId;
use kanri_core::types::options::OptionItem;
use kanri_core::types::pagination::{PageRequest, PageResponse};
use kanri_core::types::sorting::SortField;

use crate::connection::MongoDatabase;
use crate::cursor::{CursorStore, PageStrategy, SeekCursor};
use crate::filter::{self, ID_FIELD};

/// TTL tiers resolved from configuration once per repository.
#[derive(Debug, Clone, Copy)]
struct TtlTiers {
    entity: Duration,
    list: Duration,
    page: Duration,
    count: Duration,
}

impl TtlTiers {
    fn from_config(config: &CacheConfig) -> Self {
        Self {
            entity: Duration::from_secs(config.ttl.entity_seconds),
            list: Duration::from_secs(config.ttl.list_seconds),
            page: Duration::from_secs(config.ttl.page_seconds),
            count: Duration::from_secs(config.ttl.count_seconds),
        }
    }
}

/// Generic CRUD and query repository over one document collection.
#[derive(Debug, Clone)]
pub struct DocumentRepository<E: DocumentEntity> {
    /// Typed collection handle.
    collection: Collection<E>,
    /// Document-typed view of the same collection, used for projected
    /// and paged queries where cursor fields are read from the raw
    /// document.
    raw: Collection<Document>,
    /// Cache port.
    cache: CacheManager,
    /// Seek cursor persistence.
    cursors: CursorStore,
    /// TTL tiers.
    ttl: TtlTiers,
}

impl<E: DocumentEntity> DocumentRepository<E> {
    /// Create a repository and ensure the entity's declared indexes
    /// exist on the collection.
    pub async fn new(
        db: &MongoDatabase,
        cache: CacheManager,
        config: &CacheConfig,
    ) -> AppResult<Self> {
        let collection = db.collection::<E>(E::COLLECTION);
        let raw = collection.clone_with_type::<Document>();

        let indexes: Vec<IndexModel> = E::indexes()
            .into_iter()
            .map(|spec| {
                let options = IndexOptions::builder()
                    .name(spec.name.to_string())
                    .unique(spec.unique)
                    .build();
                IndexModel::builder().keys(spec.keys).options(options).build()
            })
            .collect();
        if !indexes.is_empty() {
            collection.create_indexes(indexes).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to create indexes on {}: {e}", E::COLLECTION),
                    e,
                )
            })?;
        }

        let cursors = CursorStore::new(
            cache.clone(),
            Duration::from_secs(config.ttl.cursor_seconds),
        );

        Ok(Self {
            collection,
            raw,
            cache,
            cursors,
            ttl: TtlTiers::from_config(config),
        })
    }

    /// Default sort specification for this entity.
    pub fn default_sort() -> SortField {
        SortField::asc(E::DEFAULT_SORT_FIELD)
    }

    // ── Cache helpers (best-effort) ────────────────────────

    async fn cache_get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.cache.get_json::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed; treating as miss");
                None
            }
        }
    }

    async fn cache_put<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(e) = self.cache.set_json(key, value, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    async fn cache_delete(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key, error = %e, "Cache delete failed");
        }
    }

    /// Drop every derived cache namespace of this entity type. Single-
    /// entity entries are spared: ids are immutable and writes refresh
    /// the entries they touch.
    pub async fn invalidate_query_caches(&self) {
        for pattern in keys::write_invalidation_patterns(E::CACHE_KEY) {
            if let Err(e) = self.cache.delete_pattern(&pattern).await {
                warn!(pattern, error = %e, "Cache invalidation failed");
            }
        }
    }

    /// Re-mirror one document into the single-entity cache from the
    /// store, or drop the entry when the document vanished.
    async fn refresh_entity_cache(&self, id: ObjectId) {
        let key = keys::entity(E::CACHE_KEY, &id);
        match self.fetch_by_id_uncached(id).await {
            Ok(Some(entity)) => self.cache_put(&key, &entity, self.ttl.entity).await,
            Ok(None) => self.cache_delete(&key).await,
            Err(e) => {
                warn!(key, error = %e, "Cache refresh fetch failed");
                self.cache_delete(&key).await;
            }
        }
    }

    // ── Reads ──────────────────────────────────────────────

    /// Fetch by id without scoping or caching. Used internally to
    /// refresh cache entries (logically deleted documents included).
    async fn fetch_by_id_uncached(&self, id: ObjectId) -> AppResult<Option<E>> {
        self.collection
            .find_one(doc! { ID_FIELD: id })
            .await
            .map_err(|e| db_err("find by id", e))
    }

    /// Get one entity by id, cache-through under `{key}:{id}`.
    ///
    /// Logically deleted documents read as absent; under a tenant, a
    /// document belonging to another tenant reads as absent.
    pub async fn find_by_id(
        &self,
        id: ObjectId,
        tenant: Option<&TenantId>,
    ) -> AppResult<Option<E>> {
        let key = keys::entity(E::CACHE_KEY, &id);
        if let Some(hit) = self.cache_get::<E>(&key).await {
            return Ok(visible(hit, tenant));
        }

        let scoped = filter::scoped(Some(&doc! { ID_FIELD: id }), tenant);
        let found = self
            .collection
            .find_one(scoped)
            .await
            .map_err(|e| db_err("find by id", e))?;
        if let Some(entity) = &found {
            self.cache_put(&key, entity, self.ttl.entity).await;
        }
        Ok(found)
    }

    /// Get the first entity matching a filter, cache-through under
    /// `{key}:one:{hash}`.
    pub async fn find_one(
        &self,
        query: Document,
        tenant: Option<&TenantId>,
    ) -> AppResult<Option<E>> {
        let scoped = filter::scoped(Some(&query), tenant);
        let key = filter::cache_key(&keys::one(E::CACHE_KEY), &scoped, None);
        if let Some(hit) = self.cache_get::<E>(&key).await {
            return Ok(Some(hit));
        }

        let found = self
            .collection
            .find_one(scoped)
            .await
            .map_err(|e| db_err("find one", e))?;
        if let Some(entity) = &found {
            self.cache_put(&key, entity, self.ttl.list).await;
        }
        Ok(found)
    }

    /// Get every entity of a tenant, cache-through under the fixed
    /// key `{key}:all[:{tenant}]`.
    pub async fn find_all(
        &self,
        tenant: Option<&TenantId>,
        sort: Option<SortField>,
    ) -> AppResult<Vec<E>> {
        let key = keys::all(E::CACHE_KEY, tenant);
        if let Some(hit) = self.cache_get::<Vec<E>>(&key).await {
            return Ok(hit);
        }

        let sort = sort.unwrap_or_else(Self::default_sort);
        let scoped = filter::scoped(None, tenant);
        let items = self.query_entities(scoped, &sort).await?;
        self.cache_put(&key, &items, self.ttl.list).await;
        Ok(items)
    }

    /// Get entities matching a filter, cache-through under
    /// `{key}:list:{hash}:{sort}`.
    pub async fn find(
        &self,
        query: Document,
        tenant: Option<&TenantId>,
        sort: Option<SortField>,
    ) -> AppResult<Vec<E>> {
        let sort = sort.unwrap_or_else(Self::default_sort);
        let scoped = filter::scoped(Some(&query), tenant);
        let key = filter::cache_key(
            &keys::list(E::CACHE_KEY),
            &scoped,
            Some(&keys::sort_suffix(&sort)),
        );
        if let Some(hit) = self.cache_get::<Vec<E>>(&key).await {
            return Ok(hit);
        }

        let items = self.query_entities(scoped, &sort).await?;
        self.cache_put(&key, &items, self.ttl.list).await;
        Ok(items)
    }

    /// Get a projected shape for entities matching a filter. When the
    /// shape shares fields with the entity the projection runs
    /// server-side; otherwise full entities are fetched and mapped
    /// in-process. Cached per shape so entity- and DTO-form results
    /// never collide.
    pub async fn find_projected<P>(
        &self,
        query: Document,
        tenant: Option<&TenantId>,
        sort: Option<SortField>,
    ) -> AppResult<Vec<P>>
    where
        P: Projection + From<E>,
    {
        let sort = sort.unwrap_or_else(Self::default_sort);
        let scoped = filter::scoped(Some(&query), tenant);
        let key = filter::cache_key(
            &keys::query(E::CACHE_KEY, P::SHAPE),
            &scoped,
            Some(&keys::sort_suffix(&sort)),
        );
        if let Some(hit) = self.cache_get::<Vec<P>>(&key).await {
            return Ok(hit);
        }

        let items = match filter::field_projection(P::FIELDS, E::FIELDS, &sort.field) {
            Some(projection) => {
                let docs = self
                    .query_documents(scoped, &sort, Some(projection))
                    .await?;
                docs.into_iter()
                    .map(decode::<P>)
                    .collect::<AppResult<Vec<P>>>()?
            }
            None => self
                .query_entities(scoped, &sort)
                .await?
                .into_iter()
                .map(P::from)
                .collect(),
        };

        self.cache_put(&key, &items, self.ttl.list).await;
        Ok(items)
    }

    /// Count entities matching a filter, cached under
    /// `{key}:count:{hash}`.
    pub async fn count(
        &self,
        query: Option<&Document>,
        tenant: Option<&TenantId>,
    ) -> AppResult<u64> {
        let scoped = filter::scoped(query, tenant);
        let hash = filter::filter_hash(&scoped);
        self.count_with_hash(&scoped, &hash).await
    }

    async fn count_with_hash(&self, scoped: &Document, hash: &str) -> AppResult<u64> {
        let key = format!("{}:{hash}", keys::count(E::CACHE_KEY));
        if let Some(hit) = self.cache_get::<u64>(&key).await {
            return Ok(hit);
        }

        let total = self
            .raw
            .count_documents(scoped.clone())
            .await
            .map_err(|e| db_err("count", e))?;
        self.cache_put(&key, &total, self.ttl.count).await;
        Ok(total)
    }

    /// Dropdown option list: id as value, name-like field as label,
    /// cached under `{key}:options:{hash}`.
    pub async fn options(
        &self,
        query: Option<&Document>,
        tenant: Option<&TenantId>,
    ) -> AppResult<Vec<OptionItem>> {
        let scoped = filter::scoped(query, tenant);
        let key = filter::cache_key(&keys::options(E::CACHE_KEY), &scoped, None);
        if let Some(hit) = self.cache_get::<Vec<OptionItem>>(&key).await {
            return Ok(hit);
        }

        let (projection, label_field) = filter::option_projection(E::FIELDS).ok_or_else(|| {
            AppError::validation(format!(
                "{} has no name-like field to label options with",
                E::COLLECTION
            ))
        })?;

        let docs = self
            .query_documents(scoped, &SortField::asc(label_field), Some(projection))
            .await?;
        let items: Vec<OptionItem> = docs
            .iter()
            .filter_map(|doc| {
                let id = doc.get_object_id(ID_FIELD).ok()?;
                let label = filter::bson_path(doc, label_field)?.as_str()?;
                Some(OptionItem::new(id.to_hex(), label))
            })
            .collect();

        self.cache_put(&key, &items, self.ttl.list).await;
        Ok(items)
    }

    async fn query_entities(&self, scoped: Document, sort: &SortField) -> AppResult<Vec<E>> {
        let cursor = self
            .collection
            .find(scoped)
            .sort(filter::sort_document(sort))
            .await
            .map_err(|e| db_err("find", e))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| db_err("find stream", e))
    }

    async fn query_documents(
        &self,
        scoped: Document,
        sort: &SortField,
        projection: Option<Document>,
    ) -> AppResult<Vec<Document>> {
        let mut action = self.raw.find(scoped).sort(filter::sort_document(sort));
        if let Some(projection) = projection {
            action = action.projection(projection);
        }
        let cursor = action.await.map_err(|e| db_err("find", e))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| db_err("find stream", e))
    }

    // ── Pagination ─────────────────────────────────────────

    /// Fetch one page sorted by `(sort_field, _id)`. The page result
    /// and the tail cursor are mirrored into the cache; a missing
    /// cursor for the preceding page degrades to a skip/limit scan.
    pub async fn find_page(
        &self,
        page: &PageRequest,
        query: Option<&Document>,
        tenant: Option<&TenantId>,
        sort: &SortField,
    ) -> AppResult<PageResponse<E>> {
        let scoped = filter::scoped(query, tenant);
        let hash = filter::filter_hash(&scoped);
        let page_key =
            keys::page_result(E::CACHE_KEY, &hash, sort, None, page.page, page.page_size);
        if let Some(hit) = self.cache_get::<PageResponse<E>>(&page_key).await {
            return Ok(hit);
        }

        let prefix = keys::cursor_prefix(E::CACHE_KEY, &hash, sort, None);
        let (total, docs) = tokio::try_join!(
            self.count_with_hash(&scoped, &hash),
            self.run_page_query(&scoped, sort, None, &prefix, page),
        )?;
        self.store_tail_cursor(&prefix, page, docs.last(), sort).await;

        let items = docs
            .into_iter()
            .map(decode::<E>)
            .collect::<AppResult<Vec<E>>>()?;
        let response = PageResponse::new(items, page.page, page.page_size, total);
        self.cache_put(&page_key, &response, self.ttl.page).await;
        Ok(response)
    }

    /// Projected page variant. Identical mechanics; cursor fields are
    /// read from the raw projected document, which always carries the
    /// id and sort field.
    pub async fn find_page_projected<P>(
        &self,
        page: &PageRequest,
        query: Option<&Document>,
        tenant: Option<&TenantId>,
        sort: &SortField,
    ) -> AppResult<PageResponse<P>>
    where
        P: Projection + From<E>,
    {
        let scoped = filter::scoped(query, tenant);
        let hash = filter::filter_hash(&scoped);
        let shape = Some(P::SHAPE);
        let page_key =
            keys::page_result(E::CACHE_KEY, &hash, sort, shape, page.page, page.page_size);
        if let Some(hit) = self.cache_get::<PageResponse<P>>(&page_key).await {
            return Ok(hit);
        }

        let projection = filter::field_projection(P::FIELDS, E::FIELDS, &sort.field);
        let prefix = keys::cursor_prefix(E::CACHE_KEY, &hash, sort, shape);
        let (total, docs) = tokio::try_join!(
            self.count_with_hash(&scoped, &hash),
            self.run_page_query(&scoped, sort, projection.clone(), &prefix, page),
        )?;
        self.store_tail_cursor(&prefix, page, docs.last(), sort).await;

        let items = if projection.is_some() {
            docs.into_iter()
                .map(decode::<P>)
                .collect::<AppResult<Vec<P>>>()?
        } else {
            docs.into_iter()
                .map(decode::<E>)
                .collect::<AppResult<Vec<E>>>()?
                .into_iter()
                .map(P::from)
                .collect()
        };
        let response = PageResponse::new(items, page.page, page.page_size, total);
        self.cache_put(&page_key, &response, self.ttl.page).await;
        Ok(response)
    }

    async fn run_page_query(
        &self,
        scoped: &Document,
        sort: &SortField,
        projection: Option<Document>,
        cursor_prefix: &str,
        page: &PageRequest,
    ) -> AppResult<Vec<Document>> {
        let strategy = self.cursors.strategy_for(cursor_prefix, page).await;
        debug!(
            collection = E::COLLECTION,
            page = page.page,
            ?strategy,
            "Executing page query"
        );

        let query = match &strategy {
            PageStrategy::Seek(cursor) => {
                doc! { "$and": [ scoped.clone(), cursor.seek_filter(sort) ] }
            }
            _ => scoped.clone(),
        };

        let mut action = self
            .raw
            .find(query)
            .sort(filter::sort_document(sort))
            .limit(page.limit() as i64);
        if let PageStrategy::Skip(offset) = &strategy {
            action = action.skip(*offset);
        }
        if let Some(projection) = projection {
            action = action.projection(projection);
        }

        let cursor = action.await.map_err(|e| db_err("page query", e))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| db_err("page stream", e))
    }

    async fn store_tail_cursor(
        &self,
        prefix: &str,
        page: &PageRequest,
        last: Option<&Document>,
        sort: &SortField,
    ) {
        let Some(doc) = last else { return };
        match SeekCursor::from_document(doc, sort, page.page, page.page_size) {
            Some(cursor) => self.cursors.put(prefix, &cursor).await,
            None => warn!(
                collection = E::COLLECTION,
                "Page item carries no id; tail cursor not stored"
            ),
        }
    }

    // ── Writes ─────────────────────────────────────────────

    /// Insert one entity: assign an id when absent, write, invalidate
    /// the derived cache namespaces, and warm the single-entity cache.
    pub async fn insert(&self, mut entity: E) -> AppResult<E> {
        if entity.id().is_none() {
            entity.set_id(ObjectId::new());
        }

        self.collection
            .insert_one(&entity)
            .await
            .map_err(|e| write_err("insert", e))?;

        self.invalidate_query_caches().await;
        if let Some(id) = entity.id() {
            self.cache_put(&keys::entity(E::CACHE_KEY, &id), &entity, self.ttl.entity)
                .await;
        }
        Ok(entity)
    }

    /// Insert many entities and invalidate the derived cache
    /// namespaces broadly — the affected rows of list/page/option
    /// caches are not individually known after a bulk write.
    pub async fn insert_many(&self, mut entities: Vec<E>) -> AppResult<usize> {
        if entities.is_empty() {
            return Ok(0);
        }
        for entity in &mut entities {
            if entity.id().is_none() {
                entity.set_id(ObjectId::new());
            }
        }

        let result = self
            .collection
            .insert_many(&entities)
            .await
            .map_err(|e| write_err("insert many", e))?;

        self.invalidate_query_caches().await;
        Ok(result.inserted_ids.len())
    }

    /// Apply a partial update (`$set` of the patch plus a forced
    /// `update_time`) to one document. Returns the matched count.
    async fn apply_patch(&self, id: ObjectId, mut patch: Document) -> AppResult<u64> {
        patch.insert("stamp.update_time", bson::DateTime::now());
        let result = self
            .collection
            .update_one(doc! { ID_FIELD: id }, doc! { "$set": patch })
            .await
            .map_err(|e| write_err("update", e))?;
        Ok(result.matched_count)
    }

    /// Partial-field update of one entity by its own id. Only
    /// non-default fields from the patch mask are written; the single-
    /// entity cache is refreshed and derived namespaces invalidated.
    /// Returns `false` when no document matched.
    pub async fn update(&self, entity: &E) -> AppResult<bool> {
        let id = entity
            .id()
            .ok_or_else(|| AppError::validation("Cannot update an entity without an id"))?;

        let matched = self.apply_patch(id, entity.patch_document()).await?;
        if matched == 0 {
            return Ok(false);
        }

        self.refresh_entity_cache(id).await;
        self.invalidate_query_caches().await;
        Ok(true)
    }

    /// Partial-field update addressed by id, returning the stored
    /// document after the write.
    pub async fn update_by_id(&self, id: ObjectId, entity: &E) -> AppResult<E> {
        let matched = self.apply_patch(id, entity.patch_document()).await?;
        if matched == 0 {
            return Err(AppError::not_found(format!(
                "{} {} not found",
                E::COLLECTION,
                id.to_hex()
            )));
        }

        let fresh = self.fetch_by_id_uncached(id).await?.ok_or_else(|| {
            AppError::not_found(format!("{} {} not found", E::COLLECTION, id.to_hex()))
        })?;
        self.cache_put(&keys::entity(E::CACHE_KEY, &id), &fresh, self.ttl.entity)
            .await;
        self.invalidate_query_caches().await;
        Ok(fresh)
    }

    /// Partial-field update of many entities. Mutated ids are dropped
    /// from the single-entity cache rather than refreshed one by one.
    /// Returns the number of matched documents.
    pub async fn update_many(&self, entities: &[E]) -> AppResult<u64> {
        let mut matched_total = 0u64;
        for entity in entities {
            let id = entity
                .id()
                .ok_or_else(|| AppError::validation("Cannot update an entity without an id"))?;
            matched_total += self.apply_patch(id, entity.patch_document()).await?;
            self.cache_delete(&keys::entity(E::CACHE_KEY, &id)).await;
        }

        if matched_total > 0 {
            self.invalidate_query_caches().await;
        }
        Ok(matched_total)
    }

    /// Logical delete: set the deleted/disabled flags through the
    /// normal update path. The document is never physically removed,
    /// and repeating the call is harmless.
    pub async fn soft_delete(&self, id: ObjectId) -> AppResult<bool> {
        let patch = doc! { "stamp.is_deleted": true, "stamp.is_enabled": false };
        let matched = self.apply_patch(id, patch).await?;
        if matched == 0 {
            return Ok(false);
        }

        self.refresh_entity_cache(id).await;
        self.invalidate_query_caches().await;
        Ok(true)
    }

    /// Explicitly clear stored fields. The partial-update mask cannot
    /// express "set to empty" (cleared fields are skipped), so this is
    /// the sanctioned way to null out a value.
    pub async fn unset_fields(&self, id: ObjectId, fields: &[&str]) -> AppResult<bool> {
        if fields.is_empty() {
            return Ok(false);
        }

        let mut unset = Document::new();
        for field in fields {
            unset.insert(*field, "");
        }
        let update = doc! {
            "$unset": unset,
            "$set": { "stamp.update_time": bson::DateTime::now() },
        };
        let result = self
            .collection
            .update_one(doc! { ID_FIELD: id }, update)
            .await
            .map_err(|e| write_err("unset", e))?;
        if result.matched_count == 0 {
            return Ok(false);
        }

        self.refresh_entity_cache(id).await;
        self.invalidate_query_caches().await;
        Ok(true)
    }
}

/// Drop a cached entity that must not be visible to the caller:
/// logically deleted, or owned by a different tenant when a tenant is
/// in force.
fn visible<E: DocumentEntity>(entity: E, tenant: Option<&TenantId>) -> Option<E> {
    if entity.stamp().is_deleted {
        return None;
    }
    if let Some(t) = tenant {
        if entity.stamp().tenant_id.as_ref() != Some(t) {
            return None;
        }
    }
    Some(entity)
}

fn decode<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    bson::from_document(doc).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Failed to decode document: {e}"),
            e,
        )
    })
}

fn db_err(op: &str, e: mongodb::error::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("Database {op} failed: {e}"), e)
}

/// Write errors keep the original message; unique-index violations
/// surface as conflicts so the service layer can report the duplicate
/// to the caller.
fn write_err(op: &str, e: mongodb::error::Error) -> AppError {
    if is_duplicate_key(&e) {
        return AppError::conflict(format!("Duplicate key on {op}: {e}"));
    }
    db_err(op, e)
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we)) =
        &*e.kind
    {
        if we.code == 11000 {
            return true;
        }
    }
    e.to_string().contains("E11000")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_hides_deleted_and_foreign_tenants() {
        use kanri_core::types::stamp::EntityStamp;
        use kanri_entity::AdminUser;

        let tenant = TenantId::new();
        let other = TenantId::new();

        let mut user = AdminUser::new("alice", "hash");
        user.stamp = EntityStamp::new(Some(tenant));

        assert!(visible(user.clone(), None).is_some());
        assert!(visible(user.clone(), Some(&tenant)).is_some());
        assert!(visible(user.clone(), Some(&other)).is_none());

        user.stamp.mark_deleted();
        assert!(visible(user, None).is_none());
    }
}
