//! Value/label pairs for dropdown and select lists.

use serde::{Deserialize, Serialize};

/// A single dropdown option: the entity id as `value` and its
/// name-like field as `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Entity id in hex form.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

impl OptionItem {
    /// Create a new option item.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
