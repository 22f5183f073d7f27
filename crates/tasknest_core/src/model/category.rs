//! Category domain model.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable category identifier.
pub type CategoryId = Uuid;

/// User-owned label that todos can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub owner_id: UserId,
    pub name: String,
    /// Display color token, stored as given (e.g. `hsl(200, 90%, 65%)`).
    pub color: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Category {
    /// Creates a category with a generated id.
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        color: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            color: color.into(),
            created_at,
        }
    }
}
