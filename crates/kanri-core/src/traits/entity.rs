//! Document entity traits implemented by every stored aggregate.

use bson::Document;
use bson::oid::ObjectId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::stamp::EntityStamp;

/// Declarative index definition, converted to a driver index model by
/// the repository at construction time.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Index name.
    pub name: &'static str,
    /// Key document (`{ field: 1 }` / `{ field: -1 }`).
    pub keys: Document,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl IndexSpec {
    /// A plain (non-unique) index.
    pub fn plain(name: &'static str, keys: Document) -> Self {
        Self {
            name,
            keys,
            unique: false,
        }
    }

    /// A unique index.
    pub fn unique(name: &'static str, keys: Document) -> Self {
        Self {
            name,
            keys,
            unique: true,
        }
    }
}

/// Trait implemented by every document stored through the generic
/// repository.
///
/// The associated constants drive collection selection, cache-key
/// namespacing, tenant scoping, and projection building; the methods
/// expose identity and the shared [`EntityStamp`].
pub trait DocumentEntity:
    Serialize + DeserializeOwned + Unpin + Clone + Send + Sync + 'static
{
    /// MongoDB collection name.
    const COLLECTION: &'static str;

    /// Cache namespace for this entity type. Every cache key for this
    /// entity starts with `"{CACHE_KEY}:"`.
    const CACHE_KEY: &'static str;

    /// Whether reads and writes of this entity are partitioned by tenant.
    ///
    /// When `true`, a call without a resolvable tenant is rejected
    /// rather than silently widened to all tenants.
    const TENANT_SCOPED: bool = true;

    /// Store field paths of this entity, used to intersect against DTO
    /// projections. Dotted paths address fields inside the stamp
    /// subdocument (e.g. `"stamp.create_time"`).
    const FIELDS: &'static [&'static str];

    /// Sort field applied when the caller does not specify one.
    const DEFAULT_SORT_FIELD: &'static str = "stamp.create_time";

    /// Document id, `None` before the first insert.
    fn id(&self) -> Option<ObjectId>;

    /// Assign the document id.
    fn set_id(&mut self, id: ObjectId);

    /// Shared lifecycle/audit fields.
    fn stamp(&self) -> &EntityStamp;

    /// Mutable access to the shared lifecycle/audit fields.
    fn stamp_mut(&mut self) -> &mut EntityStamp;

    /// Build the partial-update document for this entity.
    ///
    /// Only fields holding a non-default value are included (see the
    /// helpers in [`crate::patch`]); identity and creation-audit
    /// fields never appear. A cleared string therefore cannot null out
    /// a stored value through the update path.
    fn patch_document(&self) -> Document;

    /// Indexes to ensure on the collection. The repository applies
    /// these once at construction.
    fn indexes() -> Vec<IndexSpec> {
        Vec::new()
    }
}

/// A projected (partial) read model of a document entity.
///
/// Each projection declares the exact store fields it needs — the
/// compile-time equivalent of intersecting DTO property names against
/// the entity shape. The repository uses `FIELDS` to build a
/// server-side projection and `SHAPE` as a cache-key segment so the
/// same query cached as entities and as DTOs never collides.
pub trait Projection: Serialize + DeserializeOwned + Unpin + Send + Sync + 'static {
    /// Store field paths required to populate this shape (identity is
    /// always force-included by the projection builder).
    const FIELDS: &'static [&'static str];

    /// Short shape tag used as a cache-key segment.
    const SHAPE: &'static str;
}
