//! Product families (collections such as rings, necklaces, earrings).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Family {
    pub id: i32,
    #[schema(example = "AN")]
    pub code: String,
    #[schema(example = "Rings")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Family row as listed in the admin, with how many products use it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FamilyWithCount {
    #[serde(flatten)]
    pub family: Family,
    pub product_count: u64,
}

/// Create / update payload shared by the admin form and the JSON API.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FamilyInput {
    #[validate(length(min = 1, max = 20, message = "Code must be between 1 and 20 characters"))]
    #[schema(example = "AN")]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Rings")]
    pub name: String,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
}

impl FamilyInput {
    /// Trim whitespace, upper-case the code and drop an empty description.
    pub fn normalized(self) -> Self {
        Self {
            code: self.code.trim().to_uppercase(),
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}

/// Message shown when a family still has products attached.
pub fn family_in_use_message(family: &Family, product_count: u64) -> String {
    format!(
        "Cannot delete family '{}' (ID {}) because it is being used by {} product{}",
        family.name,
        family.id,
        product_count,
        if product_count == 1 { "" } else { "s" }
    )
}
