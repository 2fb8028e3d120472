//! Category domain type.

use serde::Serialize;

use bazaar_core::CategoryId;

/// A product category. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "categoryName")]
    pub name: String,
}
