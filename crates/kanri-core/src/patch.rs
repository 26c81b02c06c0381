//! Helpers for building partial-update documents.
//!
//! Every entity declares its update mask explicitly in
//! [`DocumentEntity::patch_document`](crate::traits::entity::DocumentEntity::patch_document)
//! using these helpers. The shared rules live here so the skip logic
//! is identical across entity types:
//!
//! - strings: included only when non-empty
//! - optional ids and timestamps: included only when present
//! - booleans: always included
//! - arrays: always included, even when empty
//! - numeric scalars: included only when non-zero
//!
//! Consequence: a field cleared on the in-memory entity is *not*
//! written to the store through the update path. Callers that need a
//! true clear use a dedicated `$unset` operation.

use bson::oid::ObjectId;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};

/// Include a string field when non-empty.
pub fn set_string(doc: &mut Document, field: &str, value: &str) {
    if !value.is_empty() {
        doc.insert(field, value);
    }
}

/// Include an optional string field when present and non-empty.
pub fn set_opt_string(doc: &mut Document, field: &str, value: Option<&str>) {
    if let Some(v) = value {
        set_string(doc, field, v);
    }
}

/// Include an optional id field when present.
pub fn set_opt_object_id(doc: &mut Document, field: &str, value: Option<ObjectId>) {
    if let Some(id) = value {
        doc.insert(field, id);
    }
}

/// Include a boolean field unconditionally. `false` is a legitimate
/// value, never a "not set" marker.
pub fn set_bool(doc: &mut Document, field: &str, value: bool) {
    doc.insert(field, value);
}

/// Include an optional timestamp when present.
pub fn set_opt_time(doc: &mut Document, field: &str, value: Option<DateTime<Utc>>) {
    if let Some(t) = value {
        doc.insert(field, bson::DateTime::from_chrono(t));
    }
}

/// Include an array field unconditionally. An empty collection still
/// counts as "has a value" once the field exists on the entity.
pub fn set_array<T>(doc: &mut Document, field: &str, values: &[T])
where
    T: Clone + Into<Bson>,
{
    let items: Vec<Bson> = values.iter().cloned().map(Into::into).collect();
    doc.insert(field, items);
}

/// Include a signed integer field when non-zero.
pub fn set_i32(doc: &mut Document, field: &str, value: i32) {
    if value != 0 {
        doc.insert(field, value);
    }
}

/// Include a signed 64-bit integer field when non-zero.
pub fn set_i64(doc: &mut Document, field: &str, value: i64) {
    if value != 0 {
        doc.insert(field, value);
    }
}

/// Include a floating-point field when non-zero.
pub fn set_f64(doc: &mut Document, field: &str, value: f64) {
    if value != 0.0 {
        doc.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_skipped() {
        let mut doc = Document::new();
        set_string(&mut doc, "name", "C");
        set_string(&mut doc, "description", "");
        assert_eq!(doc.get_str("name").unwrap(), "C");
        assert!(!doc.contains_key("description"));
    }

    #[test]
    fn test_bool_false_is_written() {
        let mut doc = Document::new();
        set_bool(&mut doc, "is_enabled", false);
        assert!(!doc.get_bool("is_enabled").unwrap());
    }

    #[test]
    fn test_empty_array_is_written() {
        let mut doc = Document::new();
        let ids: Vec<ObjectId> = Vec::new();
        set_array(&mut doc, "role_ids", &ids);
        assert!(doc.get_array("role_ids").unwrap().is_empty());
    }

    #[test]
    fn test_zero_scalar_is_skipped() {
        let mut doc = Document::new();
        set_i32(&mut doc, "sort", 0);
        set_i32(&mut doc, "level", 3);
        assert!(!doc.contains_key("sort"));
        assert_eq!(doc.get_i32("level").unwrap(), 3);
    }

    #[test]
    fn test_absent_optionals_are_skipped() {
        let mut doc = Document::new();
        set_opt_object_id(&mut doc, "parent_id", None);
        set_opt_time(&mut doc, "expires_at", None);
        set_opt_string(&mut doc, "remark", None);
        assert!(doc.is_empty());
    }
}
