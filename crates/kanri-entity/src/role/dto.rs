//! Projected read models for roles.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use kanri_core::traits::entity::Projection;
use kanri_core::types::stamp::StampSummary;

use super::model::Role;

/// Row shape for the role management list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleListItem {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Machine-readable code.
    #[serde(default)]
    pub code: String,
    /// Ordering weight.
    #[serde(default)]
    pub sort: i32,
    /// Reduced stamp view.
    #[serde(default)]
    pub stamp: StampSummary,
}

impl Projection for RoleListItem {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "code",
        "sort",
        "stamp.is_enabled",
        "stamp.create_time",
    ];
    const SHAPE: &'static str = "role-list";
}

impl From<Role> for RoleListItem {
    fn from(role: Role) -> Self {
        Self {
            id: role.id.unwrap_or_default(),
            name: role.name,
            code: role.code,
            sort: role.sort,
            stamp: StampSummary {
                is_enabled: role.stamp.is_enabled,
                create_time: role.stamp.create_time,
            },
        }
    }
}
