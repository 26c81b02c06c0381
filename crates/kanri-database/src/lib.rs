//! # kanri-database
//!
//! MongoDB connection management and the generic, cache-coherent
//! [`DocumentRepository`] used for every Kanri entity type. The
//! repository owns tenant-scoped filtering, index creation, cache
//! read-through for entities, lists, counts and pages, partial-field
//! updates, and seek (cursor) pagination with a skip/limit fallback.

pub mod connection;
pub mod cursor;
pub mod filter;
pub mod repository;

pub use connection::MongoDatabase;
pub use cursor::{CursorStore, PageStrategy, SeekCursor};
pub use repository::DocumentRepository;
