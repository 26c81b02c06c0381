//! Generic CRUD service wrapping the document repository.
//!
//! One `CrudService<E>` backs each concrete entity service. It adds
//! what the repository deliberately does not know about: the acting
//! operator (audit stamping), the resolved tenant, and DTO mapping.
//! Cache invalidation after writes happens inside the repository's
//! write operations; [`CrudService::invalidate_caches`] re-exposes it
//! for callers that mutate the collection out-of-band.

use std::sync::Arc;

use bson::Document;
use bson::oid::ObjectId;
use tracing::info;

use kanri_core::error::AppError;
use kanri_core::result::AppResult;
use kanri_core::traits::entity::{DocumentEntity, Projection};
use kanri_core::types::options::OptionItem;
use kanri_core::types::pagination::{PageRequest, PageResponse};
use kanri_core::types::sorting::SortField;
use kanri_database::DocumentRepository;

use crate::context::RequestContext;

/// Generic create/read/update/delete operations for one entity type.
#[derive(Debug, Clone)]
pub struct CrudService<E: DocumentEntity> {
    /// The entity's repository.
    repo: Arc<DocumentRepository<E>>,
}

impl<E: DocumentEntity> CrudService<E> {
    /// Creates a new CRUD service over a repository.
    pub fn new(repo: Arc<DocumentRepository<E>>) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repository(&self) -> &DocumentRepository<E> {
        &self.repo
    }

    /// Create one entity: resolve the tenant, stamp creation audit
    /// fields, and insert.
    pub async fn create(&self, ctx: &RequestContext, mut entity: E) -> AppResult<E> {
        let tenant = ctx.tenant_for::<E>()?;
        let stamp = entity.stamp_mut();
        stamp.tenant_id = tenant;
        stamp.stamp_created(&ctx.operator());

        let created = self.repo.insert(entity).await?;
        info!(
            collection = E::COLLECTION,
            id = ?created.id(),
            operator = %ctx.operator_name,
            "Entity created"
        );
        Ok(created)
    }

    /// Create many entities under the caller's tenant.
    pub async fn create_many(&self, ctx: &RequestContext, mut entities: Vec<E>) -> AppResult<usize> {
        let tenant = ctx.tenant_for::<E>()?;
        let operator = ctx.operator();
        for entity in &mut entities {
            let stamp = entity.stamp_mut();
            stamp.tenant_id = tenant;
            stamp.stamp_created(&operator);
        }

        let inserted = self.repo.insert_many(entities).await?;
        info!(
            collection = E::COLLECTION,
            count = inserted,
            operator = %ctx.operator_name,
            "Entities created"
        );
        Ok(inserted)
    }

    /// Get one entity by id under the caller's tenant.
    pub async fn get(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Option<E>> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.find_by_id(id, tenant.as_ref()).await
    }

    /// Get one entity by id, failing when absent.
    pub async fn get_required(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<E> {
        self.get(ctx, id).await?.ok_or_else(|| {
            AppError::not_found(format!("{} {} not found", E::COLLECTION, id.to_hex()))
        })
    }

    /// Get the first entity matching a filter.
    pub async fn get_one(&self, ctx: &RequestContext, query: Document) -> AppResult<Option<E>> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.find_one(query, tenant.as_ref()).await
    }

    /// List every entity of the caller's tenant.
    pub async fn list_all(&self, ctx: &RequestContext, sort: Option<SortField>) -> AppResult<Vec<E>> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.find_all(tenant.as_ref(), sort).await
    }

    /// List entities matching a filter.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: Document,
        sort: Option<SortField>,
    ) -> AppResult<Vec<E>> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.find(query, tenant.as_ref(), sort).await
    }

    /// List a projected shape for entities matching a filter.
    pub async fn list_as<P>(
        &self,
        ctx: &RequestContext,
        query: Document,
        sort: Option<SortField>,
    ) -> AppResult<Vec<P>>
    where
        P: Projection + From<E>,
    {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.find_projected(query, tenant.as_ref(), sort).await
    }

    /// Count entities matching a filter.
    pub async fn count(&self, ctx: &RequestContext, query: Option<&Document>) -> AppResult<u64> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.count(query, tenant.as_ref()).await
    }

    /// Fetch one page of entities.
    pub async fn page(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        query: Option<&Document>,
        sort: Option<SortField>,
    ) -> AppResult<PageResponse<E>> {
        let tenant = ctx.tenant_for::<E>()?;
        let sort = sort.unwrap_or_else(DocumentRepository::<E>::default_sort);
        self.repo
            .find_page(page, query, tenant.as_ref(), &sort)
            .await
    }

    /// Fetch one page in a projected shape.
    pub async fn page_as<P>(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        query: Option<&Document>,
        sort: Option<SortField>,
    ) -> AppResult<PageResponse<P>>
    where
        P: Projection + From<E>,
    {
        let tenant = ctx.tenant_for::<E>()?;
        let sort = sort.unwrap_or_else(DocumentRepository::<E>::default_sort);
        self.repo
            .find_page_projected(page, query, tenant.as_ref(), &sort)
            .await
    }

    /// Dropdown options for the caller's tenant.
    pub async fn options(
        &self,
        ctx: &RequestContext,
        query: Option<&Document>,
    ) -> AppResult<Vec<OptionItem>> {
        let tenant = ctx.tenant_for::<E>()?;
        self.repo.options(query, tenant.as_ref()).await
    }

    /// Update one entity: verify it is visible to the caller, stamp
    /// the update audit fields, and apply the partial-field patch.
    pub async fn update(&self, ctx: &RequestContext, mut entity: E) -> AppResult<E> {
        let id = entity
            .id()
            .ok_or_else(|| AppError::validation("Cannot update an entity without an id"))?;
        // Visibility check before the write: wrong-tenant or deleted
        // documents read as absent.
        self.get_required(ctx, id).await?;

        entity.stamp_mut().stamp_updated(&ctx.operator());
        let updated = self.repo.update_by_id(id, &entity).await?;
        info!(
            collection = E::COLLECTION,
            id = %id.to_hex(),
            operator = %ctx.operator_name,
            "Entity updated"
        );
        Ok(updated)
    }

    /// Toggle the enabled flag of one entity.
    pub async fn set_enabled(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        enabled: bool,
    ) -> AppResult<E> {
        let mut entity = self.get_required(ctx, id).await?;
        entity.stamp_mut().is_enabled = enabled;
        entity.stamp_mut().stamp_updated(&ctx.operator());
        self.repo.update_by_id(id, &entity).await
    }

    /// Logically delete one entity. Returns `false` when the entity
    /// is not visible to the caller.
    pub async fn delete(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<bool> {
        if self.get(ctx, id).await?.is_none() {
            return Ok(false);
        }

        let deleted = self.repo.soft_delete(id).await?;
        if deleted {
            info!(
                collection = E::COLLECTION,
                id = %id.to_hex(),
                operator = %ctx.operator_name,
                "Entity deleted"
            );
        }
        Ok(deleted)
    }

    /// Drop every derived cache namespace of this entity type.
    pub async fn invalidate_caches(&self) {
        self.repo.invalidate_query_caches().await;
    }
}
