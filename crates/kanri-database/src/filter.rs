//! Store-native filter scoping, filter hashing, and projection
//! building.
//!
//! Every read path funnels through [`scoped`]: the logical-delete and
//! tenant predicates are ANDed into the caller's filter and cannot be
//! bypassed. [`filter_hash`] turns the scoped filter into a stable
//! cache-key segment.

use bson::{Bson, Document, doc};
use chrono::Utc;
use tracing::warn;
use xxhash_rust::xxh3::xxh3_128;

use kanri_core::types::id::TenantId;
use kanri_core::types::sorting::SortField;

/// The store's native identity field.
pub const ID_FIELD: &str = "_id";

/// Candidate label fields for option projections, in preference order.
const NAME_FIELDS: &[&str] = &["name", "label", "title", "username", "display_name"];

/// Build the mandatory scoped filter: caller predicate AND
/// not-deleted AND (when present) tenant equality.
///
/// The clause order is fixed so that logically identical queries hash
/// to the same cache key.
pub fn scoped(filter: Option<&Document>, tenant: Option<&TenantId>) -> Document {
    let mut clauses = vec![doc! { "stamp.is_deleted": false }];
    if let Some(t) = tenant {
        clauses.push(doc! { "stamp.tenant_id": t });
    }
    if let Some(f) = filter {
        if !f.is_empty() {
            clauses.push(f.clone());
        }
    }
    doc! { "$and": clauses }
}

/// Hash a filter into a fixed-length hex string, stable across
/// process restarts for the same logical filter.
///
/// When the filter cannot be rendered, a timestamp-based value is
/// returned instead so the resulting cache key never hits: incorrect
/// results must not be cached.
pub fn filter_hash(filter: &Document) -> String {
    match bson::to_vec(filter) {
        Ok(bytes) => format!("{:032x}", xxh3_128(&bytes)),
        Err(e) => {
            warn!(error = %e, "Failed to render filter for hashing; bypassing cache");
            format!(
                "nohash-{}",
                Utc::now().timestamp_nanos_opt().unwrap_or_default()
            )
        }
    }
}

/// Assemble a cache key as `"{prefix}:{filter_hash}[:{suffix}]"`.
pub fn cache_key(prefix: &str, filter: &Document, suffix: Option<&str>) -> String {
    let hash = filter_hash(filter);
    match suffix {
        Some(s) => format!("{prefix}:{hash}:{s}"),
        None => format!("{prefix}:{hash}"),
    }
}

/// Build the composite `(sort_field, _id)` sort document. The id
/// tie-break makes the order total, so pages never skip or repeat
/// rows that share a sort value.
pub fn sort_document(sort: &SortField) -> Document {
    let order = sort.direction.order();
    let mut doc = Document::new();
    doc.insert(sort.field.clone(), order);
    if sort.field != ID_FIELD {
        doc.insert(ID_FIELD, order);
    }
    doc
}

/// Compute the server-side projection for a DTO shape: the
/// intersection of the shape's fields with the entity's fields, with
/// the identity field and the active sort field force-included.
///
/// Returns `None` when the intersection is empty — the caller falls
/// back to fetching full entities and mapping in-process.
pub fn field_projection(
    dto_fields: &[&str],
    entity_fields: &[&str],
    sort_field: &str,
) -> Option<Document> {
    let selected: Vec<&str> = dto_fields
        .iter()
        .copied()
        .filter(|f| *f != "id" && *f != ID_FIELD)
        .filter(|f| entity_fields.contains(f))
        .collect();
    if selected.is_empty() {
        return None;
    }

    let mut projection = Document::new();
    projection.insert(ID_FIELD, 1);
    for field in selected {
        projection.insert(field, 1);
    }
    // The sort field rides along so seek cursors can be derived from
    // projected documents.
    if !projection.contains_key(sort_field) {
        projection.insert(sort_field, 1);
    }
    Some(projection)
}

/// Build the 2-field projection backing dropdown option lists:
/// identity plus the first name-like field the entity carries.
/// Returns the projection and the chosen label field, or `None` when
/// the entity has nothing usable as a label.
pub fn option_projection(entity_fields: &[&str]) -> Option<(Document, &'static str)> {
    let label = NAME_FIELDS
        .iter()
        .copied()
        .find(|n| entity_fields.contains(n))?;

    let mut projection = Document::new();
    projection.insert(ID_FIELD, 1);
    projection.insert(label, 1);
    Some((projection, label))
}

/// Resolve a (possibly dotted) field path inside a document.
pub fn bson_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = doc;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            return current.get(part);
        }
        current = current.get_document(part).ok()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_always_filters_deleted() {
        let scoped = scoped(None, None);
        let clauses = scoped.get_array("$and").unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(
            clauses[0].as_document().unwrap(),
            &doc! { "stamp.is_deleted": false }
        );
    }

    #[test]
    fn test_scoped_adds_tenant_predicate() {
        let tenant = TenantId::new();
        let scoped = scoped(Some(&doc! { "username": "alice" }), Some(&tenant));
        let clauses = scoped.get_array("$and").unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(
            clauses[1].as_document().unwrap(),
            &doc! { "stamp.tenant_id": &tenant }
        );
    }

    #[test]
    fn test_filter_hash_is_deterministic() {
        let a = doc! { "username": "alice", "stamp.is_enabled": true };
        let b = doc! { "username": "alice", "stamp.is_enabled": true };
        assert_eq!(filter_hash(&a), filter_hash(&b));
        assert_eq!(filter_hash(&a).len(), 32);
    }

    #[test]
    fn test_filter_hash_differs_for_different_filters() {
        let a = doc! { "username": "alice" };
        let b = doc! { "username": "bob" };
        assert_ne!(filter_hash(&a), filter_hash(&b));
    }

    #[test]
    fn test_cache_key_format() {
        let filter = doc! { "code": "admin" };
        let hash = filter_hash(&filter);
        assert_eq!(cache_key("role:one", &filter, None), format!("role:one:{hash}"));
        assert_eq!(
            cache_key("role:list", &filter, Some("name:asc")),
            format!("role:list:{hash}:name:asc")
        );
    }

    #[test]
    fn test_sort_document_appends_id_tiebreak() {
        let sort = SortField::desc("stamp.create_time");
        let doc = sort_document(&sort);
        let mut iter = doc.iter();
        assert_eq!(
            iter.next().unwrap(),
            (&"stamp.create_time".to_string(), &Bson::Int32(-1))
        );
        assert_eq!(iter.next().unwrap(), (&"_id".to_string(), &Bson::Int32(-1)));
    }

    #[test]
    fn test_field_projection_forces_id_and_sort() {
        let projection = field_projection(
            &["username", "email", "nonexistent"],
            &["username", "email", "phone", "stamp.create_time"],
            "stamp.create_time",
        )
        .unwrap();
        assert!(projection.contains_key("_id"));
        assert!(projection.contains_key("username"));
        assert!(projection.contains_key("stamp.create_time"));
        assert!(!projection.contains_key("nonexistent"));
        assert!(!projection.contains_key("phone"));
    }

    #[test]
    fn test_field_projection_empty_intersection_is_none() {
        assert!(field_projection(&["foo", "bar"], &["username"], "username").is_none());
    }

    #[test]
    fn test_option_projection_picks_first_name_like_field() {
        let (projection, label) =
            option_projection(&["code", "name", "username", "stamp.create_time"]).unwrap();
        assert_eq!(label, "name");
        assert!(projection.contains_key("_id"));
        assert!(projection.contains_key("name"));

        assert!(option_projection(&["code", "sort"]).is_none());
    }

    #[test]
    fn test_bson_path_resolves_nested_fields() {
        let doc = doc! { "stamp": { "is_enabled": true }, "username": "alice" };
        assert_eq!(bson_path(&doc, "username"), Some(&Bson::String("alice".into())));
        assert_eq!(
            bson_path(&doc, "stamp.is_enabled"),
            Some(&Bson::Boolean(true))
        );
        assert_eq!(bson_path(&doc, "stamp.missing"), None);
        assert_eq!(bson_path(&doc, "username.nested"), None);
    }
}
