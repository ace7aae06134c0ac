use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeType {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Permanent")]
    pub name: String,
}
