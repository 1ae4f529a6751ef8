//! Sort criteria shared by the repository port and its callers.

use serde::{Deserialize, Serialize};

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Payment fields exposed for sorting.
///
/// The allow-list of the ordering DSL; anything else in an `orderBy`
/// expression is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Purpose,
    Amount,
    OrderId,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Purpose,
        SortField::Amount,
        SortField::OrderId,
        SortField::CreatedAt,
    ];

    /// The field name as it appears in API requests.
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Purpose => "purpose",
            SortField::Amount => "amount",
            SortField::OrderId => "orderId",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// The backing column name.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Purpose => "purpose",
            SortField::Amount => "amount",
            SortField::OrderId => "order_id",
            SortField::CreatedAt => "created_at",
        }
    }
}
