//! Core type definitions used across the Kanri workspace.

pub mod id;
pub mod options;
pub mod pagination;
pub mod sorting;
pub mod stamp;

pub use id::TenantId;
pub use options::OptionItem;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};
pub use stamp::{EntityStamp, Operator, StampSummary};
