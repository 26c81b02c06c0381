//! Cache key builders for all Kanri cache namespaces.
//!
//! Centralising key construction prevents typos and makes it easy to
//! find every key the application uses. Keys are namespaced per entity
//! type: `"{entity}:{artifact}[:...]"`. Invalidation after a write is
//! prefix deletion over these namespaces.

use bson::oid::ObjectId;

use kanri_core::types::id::TenantId;
use kanri_core::types::sorting::SortField;

// ── Single-entity keys ─────────────────────────────────────

/// Cache key for a single entity by id.
pub fn entity(key: &str, id: &ObjectId) -> String {
    format!("{key}:{}", id.to_hex())
}

/// Prefix for single-result filter lookups; the filter hash is
/// appended by the caller.
pub fn one(key: &str) -> String {
    format!("{key}:one")
}

// ── Collection keys ────────────────────────────────────────

/// Cache key for the full collection of a tenant.
pub fn all(key: &str, tenant: Option<&TenantId>) -> String {
    match tenant {
        Some(t) => format!("{key}:all:{t}"),
        None => format!("{key}:all"),
    }
}

/// Prefix for filtered entity lists.
pub fn list(key: &str) -> String {
    format!("{key}:list")
}

/// Prefix for DTO-shaped query results. The shape tag keeps entity-
/// and DTO-form caches of the same query from colliding.
pub fn query(key: &str, shape: &str) -> String {
    format!("{key}:query:{shape}")
}

/// Prefix for dropdown option lists.
pub fn options(key: &str) -> String {
    format!("{key}:options")
}

/// Prefix for scalar counts.
pub fn count(key: &str) -> String {
    format!("{key}:count")
}

// ── Pagination keys ────────────────────────────────────────

/// Sort suffix shared by list and page keys.
pub fn sort_suffix(sort: &SortField) -> String {
    format!("{}:{}", sort.field, sort.direction.as_str())
}

/// Key prefix under which the seek cursors of one query live, one
/// cursor per page index.
pub fn cursor_prefix(key: &str, hash: &str, sort: &SortField, shape: Option<&str>) -> String {
    match shape {
        Some(s) => format!("{key}:cursor:{}:{hash}:{s}", sort_suffix(sort)),
        None => format!("{key}:cursor:{}:{hash}", sort_suffix(sort)),
    }
}

/// Cache key for the seek cursor of one page.
pub fn cursor(prefix: &str, page: u64) -> String {
    format!("{prefix}:{page}")
}

/// Cache key for a materialized page result.
pub fn page_result(
    key: &str,
    hash: &str,
    sort: &SortField,
    shape: Option<&str>,
    page: u64,
    page_size: u64,
) -> String {
    match shape {
        Some(s) => format!(
            "{key}:page:{}:{hash}:{s}:{page}:{page_size}",
            sort_suffix(sort)
        ),
        None => format!("{key}:page:{}:{hash}:{page}:{page_size}", sort_suffix(sort)),
    }
}

// ── Invalidation ───────────────────────────────────────────

/// Patterns deleted after every write to an entity type.
///
/// The single-entity namespace (`"{key}:{id}"`) is deliberately not
/// listed: ids are immutable, inserts warm their own entry, and
/// updates refresh the mutated id directly.
pub fn write_invalidation_patterns(key: &str) -> Vec<String> {
    vec![
        format!("{key}:one:*"),
        format!("{key}:all*"),
        format!("{key}:list:*"),
        format!("{key}:query:*"),
        format!("{key}:page:*"),
        format!("{key}:count:*"),
        format!("{key}:options:*"),
        format!("{key}:cursor:*"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(entity("user", &id), "user:507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_all_key_with_tenant() {
        let tenant = TenantId::new();
        assert_eq!(all("user", None), "user:all");
        assert_eq!(all("user", Some(&tenant)), format!("user:all:{tenant}"));
    }

    #[test]
    fn test_cursor_and_page_keys_are_distinct_namespaces() {
        let sort = SortField::asc("stamp.create_time");
        let prefix = cursor_prefix("user", "abc123", &sort, None);
        assert_eq!(prefix, "user:cursor:stamp.create_time:asc:abc123");
        assert_eq!(
            cursor(&prefix, 2),
            "user:cursor:stamp.create_time:asc:abc123:2"
        );
        assert_eq!(
            page_result("user", "abc123", &sort, None, 2, 10),
            "user:page:stamp.create_time:asc:abc123:2:10"
        );
    }

    #[test]
    fn test_shape_segment_separates_dto_caches() {
        let sort = SortField::desc("name");
        let plain = page_result("user", "h", &sort, None, 1, 25);
        let shaped = page_result("user", "h", &sort, Some("user-list"), 1, 25);
        assert_ne!(plain, shaped);
        assert!(shaped.contains(":user-list:"));
    }

    #[test]
    fn test_invalidation_patterns_spare_entity_namespace() {
        let patterns = write_invalidation_patterns("user");
        assert!(patterns.iter().all(|p| !p.starts_with("user:*")));
        assert!(patterns.contains(&"user:page:*".to_string()));
        assert!(patterns.contains(&"user:cursor:*".to_string()));
    }
}
