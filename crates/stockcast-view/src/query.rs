use crate::error::QueryError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_START: &str = "2024-01-01";

/// A single user request: which ticker, and from which date.
///
/// ```rust
/// use stockcast_view::Query;
///
/// let query = Query::new("aapl", "2024-01-01").unwrap();
/// assert_eq!(query.symbol(), "AAPL");
/// assert_eq!(query.start_param(), "2024-01-01");
/// ```
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Query {
    symbol: String,
    start: NaiveDate,
}

impl Query {
    pub fn new(symbol: &str, start: &str) -> Result<Self, QueryError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(QueryError::EmptySymbol);
        }

        let start = start.trim();
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
            .map_err(|_| QueryError::InvalidDate(start.to_string()))?;

        Ok(Self {
            symbol: symbol.to_uppercase(),
            start,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The `start` query parameter, as the endpoint expects it.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }
}

impl Default for Query {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] from {}", self.symbol, self.start_param())
    }
}
