pub mod chart;
pub mod display;
pub mod error;
pub mod normalize;
pub mod query;
pub mod response;
pub mod state;

pub use crate::chart::{map_chart, ChartSpec, Series};
pub use crate::error::{NormalizeError, QueryError};
pub use crate::normalize::{normalize, CanonicalChart, CanonicalResult};
pub use crate::query::Query;
pub use crate::response::{Direction, Prediction, RawResponse};
pub use crate::state::ViewState;
