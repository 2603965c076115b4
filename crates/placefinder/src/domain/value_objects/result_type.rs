//! ResultType - kinds of places a provider is asked for

use serde::{Deserialize, Serialize};

/// Kind of place result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    PointOfInterest,
    Address,
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultType::PointOfInterest => write!(f, "point_of_interest"),
            ResultType::Address => write!(f, "address"),
        }
    }
}

impl std::str::FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "point_of_interest" | "poi" => Ok(ResultType::PointOfInterest),
            "address" => Ok(ResultType::Address),
            _ => Err(format!("Unknown result type: {}", s)),
        }
    }
}

/// Set of result types a request is restricted to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResultTypeFilter {
    pub point_of_interest: bool,
    pub address: bool,
}

impl ResultTypeFilter {
    pub const fn points_of_interest() -> Self {
        Self {
            point_of_interest: true,
            address: false,
        }
    }

    pub const fn addresses() -> Self {
        Self {
            point_of_interest: false,
            address: true,
        }
    }

    pub const fn all() -> Self {
        Self {
            point_of_interest: true,
            address: true,
        }
    }

    pub fn contains(&self, result_type: ResultType) -> bool {
        match result_type {
            ResultType::PointOfInterest => self.point_of_interest,
            ResultType::Address => self.address,
        }
    }

    /// Enabled types in a stable order
    pub fn types(&self) -> Vec<ResultType> {
        [ResultType::PointOfInterest, ResultType::Address]
            .into_iter()
            .filter(|t| self.contains(*t))
            .collect()
    }
}

impl Default for ResultTypeFilter {
    fn default() -> Self {
        Self::points_of_interest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_points_of_interest_only() {
        let filter = ResultTypeFilter::default();
        assert!(filter.contains(ResultType::PointOfInterest));
        assert!(!filter.contains(ResultType::Address));
        assert_eq!(filter.types(), vec![ResultType::PointOfInterest]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("POI".parse::<ResultType>(), Ok(ResultType::PointOfInterest));
        assert_eq!("address".parse::<ResultType>(), Ok(ResultType::Address));
        assert!("street".parse::<ResultType>().is_err());
    }
}
