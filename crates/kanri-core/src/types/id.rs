//! Newtype wrappers around [`bson::oid::ObjectId`] for partition-level
//! identifiers.
//!
//! Using distinct types prevents accidentally passing a tenant id where
//! a document id is expected. Document ids themselves stay raw
//! `ObjectId`s — the generic repository works on the store's native
//! identity type.

use std::fmt;
use std::str::FromStr;

use bson::Bson;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `ObjectId`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub ObjectId);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Create an identifier from an existing ObjectId.
            pub fn from_object_id(id: ObjectId) -> Self {
                Self(id)
            }

            /// Return the inner ObjectId value.
            pub fn into_object_id(self) -> ObjectId {
                self.0
            }

            /// Return a reference to the inner ObjectId.
            pub fn as_object_id(&self) -> &ObjectId {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = bson::oid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s).map(Self)
            }
        }

        impl From<ObjectId> for $name {
            fn from(id: ObjectId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> ObjectId {
                id.0
            }
        }

        impl From<$name> for Bson {
            fn from(id: $name) -> Bson {
                Bson::ObjectId(id.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a tenant (the partition key of
    /// tenant-scoped entities).
    TenantId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_str() {
        let id = TenantId::new();
        let parsed: TenantId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_into_bson() {
        let id = TenantId::new();
        assert_eq!(Bson::from(&id), Bson::ObjectId(id.into_object_id()));
    }
}
