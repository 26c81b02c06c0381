//! Admin user domain entities.

pub mod dto;
pub mod model;

pub use dto::{UserListItem, UserProfile};
pub use model::AdminUser;
