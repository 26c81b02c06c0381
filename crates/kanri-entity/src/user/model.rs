//! Admin user document model.

use bson::oid::ObjectId;
use bson::{Document, doc};
use serde::{Deserialize, Serialize};

use kanri_core::patch;
use kanri_core::traits::entity::{DocumentEntity, IndexSpec};
use kanri_core::types::stamp::EntityStamp;

/// A back-office user account stored in the `admin_users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    /// Document id, absent before the first insert.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Lifecycle and audit fields.
    #[serde(default)]
    pub stamp: EntityStamp,
    /// Unique login name within a tenant.
    pub username: String,
    /// Human-readable display name.
    #[serde(default)]
    pub display_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Password hash. Issued and verified outside this core; stored
    /// opaque and never serialized into responses.
    #[serde(default)]
    pub password_hash: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    /// Assigned role ids.
    #[serde(default)]
    pub role_ids: Vec<ObjectId>,
    /// Free-form remark.
    #[serde(default)]
    pub remark: String,
}

impl AdminUser {
    /// Create a new user with the required fields; everything else
    /// starts empty and is filled through the update path.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: None,
            stamp: EntityStamp::default(),
            username: username.into(),
            display_name: String::new(),
            email: String::new(),
            phone: String::new(),
            password_hash: password_hash.into(),
            avatar: String::new(),
            role_ids: Vec::new(),
            remark: String::new(),
        }
    }

    /// Whether the account can currently sign in.
    pub fn is_active(&self) -> bool {
        self.stamp.is_enabled && !self.stamp.is_deleted
    }
}

impl DocumentEntity for AdminUser {
    const COLLECTION: &'static str = "admin_users";
    const CACHE_KEY: &'static str = "user";
    const FIELDS: &'static [&'static str] = &[
        "username",
        "display_name",
        "email",
        "phone",
        "password_hash",
        "avatar",
        "role_ids",
        "remark",
        "stamp.tenant_id",
        "stamp.is_deleted",
        "stamp.is_enabled",
        "stamp.created_by_name",
        "stamp.updated_by_name",
        "stamp.create_time",
        "stamp.update_time",
    ];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn stamp(&self) -> &EntityStamp {
        &self.stamp
    }

    fn stamp_mut(&mut self) -> &mut EntityStamp {
        &mut self.stamp
    }

    fn patch_document(&self) -> Document {
        let mut doc = Document::new();
        patch::set_string(&mut doc, "username", &self.username);
        patch::set_string(&mut doc, "display_name", &self.display_name);
        patch::set_string(&mut doc, "email", &self.email);
        patch::set_string(&mut doc, "phone", &self.phone);
        patch::set_string(&mut doc, "password_hash", &self.password_hash);
        patch::set_string(&mut doc, "avatar", &self.avatar);
        patch::set_array(&mut doc, "role_ids", &self.role_ids);
        patch::set_string(&mut doc, "remark", &self.remark);
        self.stamp.patch_into(&mut doc);
        doc
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![
            IndexSpec::unique(
                "username_tenant_unique",
                doc! { "username": 1, "stamp.tenant_id": 1 },
            ),
            IndexSpec::plain("create_time_idx", doc! { "stamp.create_time": 1, "_id": 1 }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_stored_value_for_cleared_fields() {
        // name="C", description(remark)="" — the empty field must not
        // enter the update set.
        let mut user = AdminUser::new("alice", "hash");
        user.display_name = "C".to_string();
        user.remark = String::new();

        let patch = user.patch_document();
        assert_eq!(patch.get_str("display_name").unwrap(), "C");
        assert!(!patch.contains_key("remark"));
    }

    #[test]
    fn test_patch_never_contains_identity_or_creation_audit() {
        let mut user = AdminUser::new("alice", "hash");
        user.id = Some(ObjectId::new());
        let patch = user.patch_document();
        assert!(!patch.contains_key("_id"));
        assert!(!patch.contains_key("stamp.created_by_id"));
        assert!(!patch.contains_key("stamp.create_time"));
    }

    #[test]
    fn test_empty_role_ids_still_patched() {
        let user = AdminUser::new("alice", "hash");
        let patch = user.patch_document();
        assert!(patch.get_array("role_ids").unwrap().is_empty());
    }

    #[test]
    fn test_bson_roundtrip() {
        let mut user = AdminUser::new("alice", "hash");
        user.id = Some(ObjectId::new());
        user.role_ids = vec![ObjectId::new()];

        let doc = bson::to_document(&user).unwrap();
        assert!(doc.contains_key("_id"));
        let back: AdminUser = bson::from_document(doc).unwrap();
        assert_eq!(back.username, "alice");
        assert_eq!(back.role_ids, user.role_ids);
    }
}
