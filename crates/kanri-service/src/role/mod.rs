//! Role management services.

pub mod service;

pub use service::{CreateRoleRequest, RoleService};
