//! Role document model.

use bson::oid::ObjectId;
use bson::{Document, doc};
use serde::{Deserialize, Serialize};

use kanri_core::patch;
use kanri_core::traits::entity::{DocumentEntity, IndexSpec};
use kanri_core::types::stamp::EntityStamp;

/// An assignable role stored in the `roles` collection.
///
/// Menu/permission evaluation happens outside this core; the role only
/// carries the granted menu ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Document id, absent before the first insert.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Lifecycle and audit fields.
    #[serde(default)]
    pub stamp: EntityStamp,
    /// Display name.
    pub name: String,
    /// Stable machine-readable code, unique within a tenant.
    pub code: String,
    /// Granted menu ids.
    #[serde(default)]
    pub menu_ids: Vec<ObjectId>,
    /// Ordering weight in role lists.
    #[serde(default)]
    pub sort: i32,
    /// Free-form remark.
    #[serde(default)]
    pub remark: String,
}

impl Role {
    /// Create a new role with a name and code.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: None,
            stamp: EntityStamp::default(),
            name: name.into(),
            code: code.into(),
            menu_ids: Vec::new(),
            sort: 0,
            remark: String::new(),
        }
    }
}

impl DocumentEntity for Role {
    const COLLECTION: &'static str = "roles";
    const CACHE_KEY: &'static str = "role";
    const FIELDS: &'static [&'static str] = &[
        "name",
        "code",
        "menu_ids",
        "sort",
        "remark",
        "stamp.tenant_id",
        "stamp.is_deleted",
        "stamp.is_enabled",
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
        patch::set_string(&mut doc, "name", &self.name);
        patch::set_string(&mut doc, "code", &self.code);
        patch::set_array(&mut doc, "menu_ids", &self.menu_ids);
        patch::set_i32(&mut doc, "sort", self.sort);
        patch::set_string(&mut doc, "remark", &self.remark);
        self.stamp.patch_into(&mut doc);
        doc
    }

    fn indexes() -> Vec<IndexSpec> {
        vec![IndexSpec::unique(
            "code_tenant_unique",
            doc! { "code": 1, "stamp.tenant_id": 1 },
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sort_is_not_patched() {
        let role = Role::new("Admin", "admin");
        let patch = role.patch_document();
        assert!(!patch.contains_key("sort"));
        assert_eq!(patch.get_str("name").unwrap(), "Admin");
    }

    #[test]
    fn test_menu_ids_always_patched() {
        let role = Role::new("Admin", "admin");
        assert!(
            role.patch_document()
                .get_array("menu_ids")
                .unwrap()
                .is_empty()
        );
    }
}
