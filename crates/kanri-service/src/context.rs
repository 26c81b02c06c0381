//! Request context carrying the acting operator and resolved tenant.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kanri_core::error::AppError;
use kanri_core::result::AppResult;
use kanri_core::traits::entity::DocumentEntity;
use kanri_core::types::id::TenantId;
use kanri_core::types::stamp::Operator;

/// Context for the current authenticated request.
///
/// Extracted by the calling layer and passed into service methods so
/// that every operation knows *who* is acting and under *which*
/// tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's id.
    pub operator_id: ObjectId,
    /// The acting user's display name (stamped into audit fields).
    pub operator_name: String,
    /// The resolved tenant, `None` for platform-level (global) calls.
    pub tenant_id: Option<TenantId>,
    /// Whether the operator has platform-admin privileges.
    pub is_admin: bool,
    /// Correlation id of the request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        operator_id: ObjectId,
        operator_name: impl Into<String>,
        tenant_id: Option<TenantId>,
        is_admin: bool,
    ) -> Self {
        Self {
            operator_id,
            operator_name: operator_name.into(),
            tenant_id,
            is_admin,
            request_id: Uuid::new_v4(),
            request_time: Utc::now(),
        }
    }

    /// Return the operator identity for audit stamping.
    pub fn operator(&self) -> Operator {
        Operator::new(self.operator_id, self.operator_name.clone())
    }

    /// Return the tenant or fail. Used on tenant-scoped paths where
    /// silently widening to all tenants would leak data across
    /// partitions.
    pub fn require_tenant(&self) -> AppResult<TenantId> {
        self.tenant_id
            .ok_or_else(|| AppError::tenant("No tenant resolved for the current call"))
    }

    /// Resolve the tenant to apply for an entity type: the caller's
    /// tenant when the entity is tenant-scoped (failing when absent),
    /// `None` otherwise.
    pub fn tenant_for<E: DocumentEntity>(&self) -> AppResult<Option<TenantId>> {
        if E::TENANT_SCOPED {
            self.require_tenant().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use kanri_entity::AdminUser;

    use super::*;

    #[test]
    fn test_require_tenant_fails_without_tenant() {
        let ctx = RequestContext::new(ObjectId::new(), "alice", None, true);
        let err = ctx.require_tenant().unwrap_err();
        assert!(err.is_kind(kanri_core::error::ErrorKind::Tenant));
    }

    #[test]
    fn test_tenant_for_scoped_entity() {
        let tenant = TenantId::new();
        let ctx = RequestContext::new(ObjectId::new(), "alice", Some(tenant), false);
        assert_eq!(ctx.tenant_for::<AdminUser>().unwrap(), Some(tenant));

        let global = RequestContext::new(ObjectId::new(), "alice", None, false);
        assert!(global.tenant_for::<AdminUser>().is_err());
    }
}
