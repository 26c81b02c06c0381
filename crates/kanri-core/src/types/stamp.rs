//! Shared lifecycle and audit fields embedded in every stored document.

use bson::Document;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::patch;
use crate::types::id::TenantId;

/// The acting identity of the current call, stamped into audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Identifier of the acting user.
    pub id: ObjectId,
    /// Display name of the acting user.
    pub name: String,
}

impl Operator {
    /// Create a new operator identity.
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Lifecycle and audit fields shared by all document entities, stored
/// as the `stamp` subdocument.
///
/// `created_by_*` fields are write-once: [`EntityStamp::stamp_created`]
/// only fills them while they are empty. Deletion is logical —
/// [`EntityStamp::mark_deleted`] flips the flags and the document stays
/// in the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStamp {
    /// Owning tenant, `None` for global (tenant-less) documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Logical-delete flag. Every read path filters this to `false`.
    #[serde(default)]
    pub is_deleted: bool,
    /// Whether the document is active.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    /// Identifier of the creating user (write-once).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<ObjectId>,
    /// Display name of the creating user (write-once).
    #[serde(default)]
    pub created_by_name: String,
    /// Identifier of the last updating user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by_id: Option<ObjectId>,
    /// Display name of the last updating user.
    #[serde(default)]
    pub updated_by_name: String,
    /// When the document was created.
    #[serde(
        default,
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub create_time: DateTime<Utc>,
    /// When the document was last updated. Refreshed on every
    /// successful update.
    #[serde(
        default,
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub update_time: DateTime<Utc>,
}

impl Default for EntityStamp {
    fn default() -> Self {
        Self {
            tenant_id: None,
            is_deleted: false,
            is_enabled: true,
            created_by_id: None,
            created_by_name: String::new(),
            updated_by_id: None,
            updated_by_name: String::new(),
            create_time: DateTime::<Utc>::default(),
            update_time: DateTime::<Utc>::default(),
        }
    }
}

impl EntityStamp {
    /// Create a fresh stamp for a new document under the given tenant.
    pub fn new(tenant_id: Option<TenantId>) -> Self {
        let now = Utc::now();
        Self {
            tenant_id,
            create_time: now,
            update_time: now,
            ..Self::default()
        }
    }

    /// Stamp creation audit fields. Creation fields are only written
    /// while still empty, so a re-stamp never overwrites the original
    /// creator.
    pub fn stamp_created(&mut self, operator: &Operator) {
        let now = Utc::now();
        if self.created_by_id.is_none() {
            self.created_by_id = Some(operator.id);
        }
        if self.created_by_name.is_empty() {
            self.created_by_name = operator.name.clone();
        }
        if self.create_time == DateTime::<Utc>::default() {
            self.create_time = now;
        }
        self.update_time = now;
    }

    /// Stamp update audit fields and refresh the update time.
    pub fn stamp_updated(&mut self, operator: &Operator) {
        self.updated_by_id = Some(operator.id);
        self.updated_by_name = operator.name.clone();
        self.update_time = Utc::now();
    }

    /// Logically delete: flip the flags, keep the document.
    pub fn mark_deleted(&mut self) {
        self.is_deleted = true;
        self.is_enabled = false;
        self.update_time = Utc::now();
    }

    /// Write the patchable stamp fields into a partial-update document.
    ///
    /// Creation audit fields and the tenant id are deliberately absent:
    /// neither may change after insert.
    pub fn patch_into(&self, doc: &mut Document) {
        patch::set_bool(doc, "stamp.is_deleted", self.is_deleted);
        patch::set_bool(doc, "stamp.is_enabled", self.is_enabled);
        patch::set_opt_object_id(doc, "stamp.updated_by_id", self.updated_by_id);
        patch::set_string(doc, "stamp.updated_by_name", &self.updated_by_name);
    }
}

/// Reduced stamp view carried by list projections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampSummary {
    /// Whether the document is active.
    #[serde(default)]
    pub is_enabled: bool,
    /// When the document was created.
    #[serde(
        default,
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub create_time: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_fields_are_write_once() {
        let first = Operator::new(ObjectId::new(), "alice");
        let second = Operator::new(ObjectId::new(), "bob");

        let mut stamp = EntityStamp::new(None);
        stamp.stamp_created(&first);
        let created_by = stamp.created_by_id;
        let created_at = stamp.create_time;

        stamp.stamp_created(&second);
        assert_eq!(stamp.created_by_id, created_by);
        assert_eq!(stamp.created_by_name, "alice");
        assert_eq!(stamp.create_time, created_at);
    }

    #[test]
    fn test_stamp_updated_refreshes_update_time() {
        let op = Operator::new(ObjectId::new(), "alice");
        let mut stamp = EntityStamp::new(None);
        let before = stamp.update_time;

        stamp.stamp_updated(&op);
        assert!(stamp.update_time >= before);
        assert_eq!(stamp.updated_by_name, "alice");
    }

    #[test]
    fn test_mark_deleted_is_logical() {
        let mut stamp = EntityStamp::new(None);
        stamp.mark_deleted();
        assert!(stamp.is_deleted);
        assert!(!stamp.is_enabled);

        // Idempotent: a second delete leaves the flags unchanged.
        stamp.mark_deleted();
        assert!(stamp.is_deleted);
        assert!(!stamp.is_enabled);
    }

    #[test]
    fn test_patch_skips_creation_audit() {
        let op = Operator::new(ObjectId::new(), "alice");
        let mut stamp = EntityStamp::new(None);
        stamp.stamp_created(&op);
        stamp.stamp_updated(&op);

        let mut doc = Document::new();
        stamp.patch_into(&mut doc);
        assert!(doc.contains_key("stamp.is_enabled"));
        assert!(doc.contains_key("stamp.updated_by_id"));
        assert!(!doc.contains_key("stamp.created_by_id"));
        assert!(!doc.contains_key("stamp.tenant_id"));
    }
}
