//! Projected read models for admin users.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use kanri_core::traits::entity::Projection;
use kanri_core::types::stamp::StampSummary;

use super::model::AdminUser;

/// Row shape for the user management list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListItem {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Reduced stamp view (enabled flag + creation time).
    #[serde(default)]
    pub stamp: StampSummary,
}

impl Projection for UserListItem {
    const FIELDS: &'static [&'static str] = &[
        "username",
        "display_name",
        "email",
        "stamp.is_enabled",
        "stamp.create_time",
    ];
    const SHAPE: &'static str = "user-list";
}

impl From<AdminUser> for UserListItem {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            stamp: StampSummary {
                is_enabled: user.stamp.is_enabled,
                create_time: user.stamp.create_time,
            },
        }
    }
}

/// Full profile shape returned for a single user, without the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Document id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    /// Assigned role ids.
    #[serde(default)]
    pub role_ids: Vec<ObjectId>,
    /// Free-form remark.
    #[serde(default)]
    pub remark: String,
}

impl Projection for UserProfile {
    const FIELDS: &'static [&'static str] = &[
        "username",
        "display_name",
        "email",
        "phone",
        "avatar",
        "role_ids",
        "remark",
    ];
    const SHAPE: &'static str = "user-profile";
}

impl From<AdminUser> for UserProfile {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            role_ids: user.role_ids,
            remark: user.remark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_from_entity() {
        let mut user = AdminUser::new("alice", "hash");
        user.id = Some(ObjectId::new());
        user.display_name = "Alice".to_string();

        let item = UserListItem::from(user.clone());
        assert_eq!(item.id, user.id.unwrap());
        assert_eq!(item.display_name, "Alice");
        assert!(item.stamp.is_enabled);
    }

    #[test]
    fn test_profile_fields_exclude_password_hash() {
        assert!(!UserProfile::FIELDS.contains(&"password_hash"));
    }
}
