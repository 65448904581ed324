//! Product categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid category: {0} (expected bed, sofa, cupboard, door or dining)")]
pub struct CategoryError(pub String);

/// Furniture category. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bed,
    Sofa,
    Cupboard,
    Door,
    Dining,
}

impl Category {
    /// The wire/database spelling of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bed => "bed",
            Self::Sofa => "sofa",
            Self::Cupboard => "cupboard",
            Self::Door => "door",
            Self::Dining => "dining",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bed" => Ok(Self::Bed),
            "sofa" => Ok(Self::Sofa),
            "cupboard" => Ok(Self::Cupboard),
            "door" => Ok(Self::Door),
            "dining" => Ok(Self::Dining),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for category in [
            Category::Bed,
            Category::Sofa,
            Category::Cupboard,
            Category::Door,
            Category::Dining,
        ] {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert_eq!(
            "table".parse::<Category>(),
            Err(CategoryError("table".to_owned()))
        );
    }
}
