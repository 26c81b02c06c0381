//! User management services.

pub mod service;

pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
