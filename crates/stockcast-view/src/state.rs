use crate::normalize::CanonicalResult;
use crate::query::Query;
use tracing::warn;

/// What the client is currently showing.
///
/// Transitions: `Idle -> Loading -> Success | Failure`, and from any settled state back to
/// `Loading`. While loading, the previous result (if any) stays on screen until it is replaced or
/// cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        query: Query,
        previous: Option<CanonicalResult>,
    },
    Success(CanonicalResult),
    Failure(String),
}

impl ViewState {
    /// Start a request. Clears any error; keeps the last result visible.
    pub fn begin(self, query: Query) -> Self {
        let previous = match self {
            ViewState::Success(result) => Some(result),
            ViewState::Loading { previous, .. } => previous,
            ViewState::Idle | ViewState::Failure(_) => None,
        };
        ViewState::Loading { query, previous }
    }

    pub fn succeed(self, result: CanonicalResult) -> Self {
        match self {
            ViewState::Loading { .. } => ViewState::Success(result),
            settled => {
                warn!("Result for [{}] arrived with no request in flight; ignored", result.symbol);
                settled
            }
        }
    }

    /// Settle on an error. Any previous result is discarded, not kept alongside the error.
    pub fn fail(self, message: impl Into<String>) -> Self {
        match self {
            ViewState::Loading { .. } => ViewState::Failure(message.into()),
            settled => {
                warn!("Error arrived with no request in flight; ignored");
                settled
            }
        }
    }

    /// Whether the trigger should be disabled.
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    /// The result currently on screen.
    pub fn result(&self) -> Option<&CanonicalResult> {
        match self {
            ViewState::Success(result) => Some(result),
            ViewState::Loading { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failure(message) => Some(message),
            _ => None,
        }
    }
}
