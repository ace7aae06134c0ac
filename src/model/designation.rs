use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A job designation. Every designation belongs to exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Designation {
    pub id: u64,
    pub name: String,
    pub department_id: u64,
}

/// Minimal `{id, name}` pair served to the designation dropdown script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DesignationOption {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = "Software Engineer")]
    pub name: String,
}

impl From<Designation> for DesignationOption {
    fn from(designation: Designation) -> Self {
        Self {
            id: designation.id,
            name: designation.name,
        }
    }
}
