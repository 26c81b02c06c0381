//! Role management — CRUD, menu assignment, option lists.

use std::sync::Arc;

use bson::doc;
use bson::oid::ObjectId;
use tracing::info;

use kanri_core::error::AppError;
use kanri_core::result::AppResult;
use kanri_core::types::options::OptionItem;
use kanri_core::types::pagination::{PageRequest, PageResponse};
use kanri_core::types::sorting::SortField;
use kanri_database::DocumentRepository;
use kanri_entity::Role;
use kanri_entity::role::RoleListItem;

use crate::context::RequestContext;
use crate::crud::CrudService;

/// Request to create a new role.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateRoleRequest {
    /// Display name.
    pub name: String,
    /// Stable machine-readable code (unique within the tenant).
    pub code: String,
    /// Ordering weight.
    pub sort: i32,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// Handles role management operations.
#[derive(Debug, Clone)]
pub struct RoleService {
    /// Generic CRUD operations over the role collection.
    crud: CrudService<Role>,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(repo: Arc<DocumentRepository<Role>>) -> Self {
        Self {
            crud: CrudService::new(repo),
        }
    }

    /// Creates a new role after validating code uniqueness within the
    /// tenant.
    pub async fn create_role(&self, ctx: &RequestContext, req: CreateRoleRequest) -> AppResult<Role> {
        let code = req.code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Role code must not be empty"));
        }
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Role name must not be empty"));
        }

        if self
            .crud
            .get_one(ctx, doc! { "code": code })
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Role code '{code}' already exists"
            )));
        }

        let mut role = Role::new(req.name.trim(), code);
        role.sort = req.sort;
        role.remark = req.remark.unwrap_or_default();

        self.crud.create(ctx, role).await
    }

    /// Gets a single role by id.
    pub async fn get_role(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Role> {
        self.crud.get_required(ctx, id).await
    }

    /// Lists one page of roles ordered by their sort weight.
    pub async fn page_roles(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<RoleListItem>> {
        self.crud
            .page_as::<RoleListItem>(ctx, page, None, Some(SortField::asc("sort")))
            .await
    }

    /// Dropdown options over enabled roles.
    pub async fn role_options(&self, ctx: &RequestContext) -> AppResult<Vec<OptionItem>> {
        self.crud
            .options(ctx, Some(&doc! { "stamp.is_enabled": true }))
            .await
    }

    /// Replaces a role's granted menu ids.
    pub async fn assign_menus(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        menu_ids: Vec<ObjectId>,
    ) -> AppResult<Role> {
        let mut role = self.crud.get_required(ctx, id).await?;
        role.menu_ids = menu_ids;

        let updated = self.crud.update(ctx, role).await?;
        info!(role_id = %id.to_hex(), count = updated.menu_ids.len(), "Role menus assigned");
        Ok(updated)
    }

    /// Enables or disables a role.
    pub async fn set_enabled(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        enabled: bool,
    ) -> AppResult<Role> {
        self.crud.set_enabled(ctx, id, enabled).await
    }

    /// Logically deletes a role.
    pub async fn delete_role(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<bool> {
        self.crud.delete(ctx, id).await
    }
}
