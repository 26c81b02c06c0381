//! Role domain entities.

pub mod dto;
pub mod model;

pub use dto::RoleListItem;
pub use model::Role;
