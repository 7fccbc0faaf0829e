use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sortable table columns, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Name,
    CloudProvider,
    Region,
    Owner,
    Status,
    CreatedAt,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Name,
        SortColumn::CloudProvider,
        SortColumn::Region,
        SortColumn::Owner,
        SortColumn::Status,
        SortColumn::CreatedAt,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            SortColumn::Name => 0,
            SortColumn::CloudProvider => 1,
            SortColumn::Region => 2,
            SortColumn::Owner => 3,
            SortColumn::Status => 4,
            SortColumn::CreatedAt => 5,
        }
    }

    /// Backend field name used in `orderBy`.
    pub fn field(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::CloudProvider => "cloud_provider",
            SortColumn::Region => "region",
            SortColumn::Owner => "owner",
            SortColumn::Status => "status",
            SortColumn::CreatedAt => "created_at",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.field() == field.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOrderByError {
    #[error("order must look like '<field> <asc|desc>', got '{0}'")]
    Malformed(String),

    #[error("'{0}' is not a sortable column")]
    UnknownField(String),

    #[error("'{0}' is not a sort direction")]
    UnknownDirection(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self {
            column: SortColumn::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl OrderBy {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Order produced by clicking the header at `index`.
    ///
    /// The first sort on the created-at column is forced to descending, so the
    /// newest instances come first whatever the table asked for.
    pub fn on_sort(
        current: Option<OrderBy>,
        index: usize,
        requested: SortDirection,
    ) -> Option<OrderBy> {
        let column = SortColumn::from_index(index)?;

        let already_sorted = current.map(|order| order.column) == Some(column);
        let direction = if column == SortColumn::CreatedAt && !already_sorted {
            SortDirection::Desc
        } else {
            requested
        };

        Some(OrderBy::new(column, direction))
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column.field(), self.direction.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = ParseOrderByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(field), Some(direction), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseOrderByError::Malformed(s.to_string()));
        };

        let column = SortColumn::from_field(field)
            .ok_or_else(|| ParseOrderByError::UnknownField(field.to_string()))?;
        let direction = match direction.to_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(ParseOrderByError::UnknownDirection(other.to_string())),
        };

        Ok(OrderBy::new(column, direction))
    }
}
