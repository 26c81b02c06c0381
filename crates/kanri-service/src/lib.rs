//! # kanri-service
//!
//! Business logic service layer for Kanri. Each service orchestrates
//! the generic document repository and the request context to
//! implement application-level use cases: tenant resolution, audit
//! stamping, DTO mapping, and validation.
//!
//! Services follow constructor injection — all dependencies are
//! provided at construction time via `Arc` references.

pub mod context;
pub mod crud;
pub mod role;
pub mod user;

pub use context::RequestContext;
pub use crud::CrudService;
pub use role::RoleService;
pub use user::UserService;
