//! Admin user management — CRUD, listing, option lists.

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
use kanri_entity::AdminUser;
use kanri_entity::user::{UserListItem, UserProfile};

use crate::context::RequestContext;
use crate::crud::CrudService;

/// Request to create a new admin user. The password arrives
/// pre-hashed; credential handling lives outside this core.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Username (unique within the tenant).
    pub username: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Initial role assignment.
    pub role_ids: Vec<ObjectId>,
    /// Free-form remark.
    pub remark: Option<String>,
}

/// Request to update an existing user's profile fields. Absent fields
/// keep their stored value.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New role assignment.
    pub role_ids: Option<Vec<ObjectId>>,
    /// New remark.
    pub remark: Option<String>,
}

/// Handles admin user management operations.
#[derive(Debug, Clone)]
pub struct UserService {
    /// Generic CRUD operations over the user collection.
    crud: CrudService<AdminUser>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(repo: Arc<DocumentRepository<AdminUser>>) -> Self {
        Self {
            crud: CrudService::new(repo),
        }
    }

    /// Creates a new user after validating the input and username
    /// uniqueness within the tenant.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> AppResult<AdminUser> {
        let username = req.username.trim();
        if username.len() < 3 {
            return Err(AppError::validation(
                "Username must be at least 3 characters",
            ));
        }
        if req.password_hash.is_empty() {
            return Err(AppError::validation("Password hash must not be empty"));
        }
        if let Some(email) = req.email.as_deref() {
            validate_email(email)?;
        }

        if self
            .crud
            .get_one(ctx, doc! { "username": username })
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Username '{username}' already exists"
            )));
        }

        let mut user = AdminUser::new(username, req.password_hash);
        user.display_name = req.display_name.unwrap_or_default();
        user.email = req.email.unwrap_or_default();
        user.phone = req.phone.unwrap_or_default();
        user.role_ids = req.role_ids;
        user.remark = req.remark.unwrap_or_default();

        self.crud.create(ctx, user).await
    }

    /// Gets a single user by id.
    pub async fn get_user(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<AdminUser> {
        self.crud.get_required(ctx, id).await
    }

    /// Gets a user's profile shape (no password hash).
    pub async fn get_profile(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<UserProfile> {
        self.crud.get_required(ctx, id).await.map(UserProfile::from)
    }

    /// Finds a user by username within the tenant.
    pub async fn find_by_username(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> AppResult<Option<AdminUser>> {
        self.crud.get_one(ctx, doc! { "username": username }).await
    }

    /// Lists one page of users for the management screen, optionally
    /// filtered by a keyword over username and display name.
    pub async fn page_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
        keyword: Option<&str>,
    ) -> AppResult<PageResponse<UserListItem>> {
        let query = keyword.filter(|k| !k.is_empty()).map(|k| {
            doc! {
                "$or": [
                    { "username": { "$regex": k, "$options": "i" } },
                    { "display_name": { "$regex": k, "$options": "i" } },
                ]
            }
        });

        self.crud
            .page_as::<UserListItem>(
                ctx,
                page,
                query.as_ref(),
                Some(SortField::desc("stamp.create_time")),
            )
            .await
    }

    /// Dropdown options over enabled users.
    pub async fn user_options(&self, ctx: &RequestContext) -> AppResult<Vec<OptionItem>> {
        self.crud
            .options(ctx, Some(&doc! { "stamp.is_enabled": true }))
            .await
    }

    /// Updates a user's profile fields.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        req: UpdateUserRequest,
    ) -> AppResult<AdminUser> {
        let mut user = self.crud.get_required(ctx, id).await?;

        if let Some(display_name) = req.display_name {
            user.display_name = display_name;
        }
        if let Some(email) = req.email {
            validate_email(&email)?;
            user.email = email;
        }
        if let Some(phone) = req.phone {
            user.phone = phone;
        }
        if let Some(avatar) = req.avatar {
            user.avatar = avatar;
        }
        if let Some(role_ids) = req.role_ids {
            user.role_ids = role_ids;
        }
        if let Some(remark) = req.remark {
            user.remark = remark;
        }

        self.crud.update(ctx, user).await
    }

    /// Enables or disables a user account.
    pub async fn set_enabled(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        enabled: bool,
    ) -> AppResult<AdminUser> {
        let user = self.crud.set_enabled(ctx, id, enabled).await?;
        info!(user_id = %id.to_hex(), enabled, "User enabled flag changed");
        Ok(user)
    }

    /// Logically deletes a user.
    pub async fn delete_user(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<bool> {
        self.crud.delete(ctx, id).await
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    if !email.contains('@') || !email.contains('.') {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@host").is_err());
    }
}
