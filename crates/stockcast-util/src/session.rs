use crate::client_ext::predict::ClientPredictExt;
use crate::error::{FetchError, NETWORK_FAILURE};
use reqwest::Client;
use stockcast_view::{CanonicalResult, Query, ViewState};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Overlapping requests: latest wins.
//
// Every predict action takes a ticket. Only the completion holding the newest ticket may settle the
// view; anything older is dropped on arrival. `Predictor` additionally aborts the previous request
// task as soon as a new one starts.
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct PredictSession {
    latest: u64,
    state: ViewState,
}

impl PredictSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Move to `Loading` for `query`; any ticket handed out before this one is now stale.
    pub fn begin(&mut self, query: Query) -> Ticket {
        self.latest += 1;
        self.state = std::mem::take(&mut self.state).begin(query);
        Ticket(self.latest)
    }

    /// Settle the view with the outcome of the request behind `ticket`. Returns `false` (and
    /// leaves the view untouched) when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<CanonicalResult, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            warn!("Discarding stale response #{} (latest is #{})", ticket.0, self.latest);
            return false;
        }

        let state = std::mem::take(&mut self.state);
        self.state = match outcome {
            Ok(result) => state.succeed(result),
            Err(e) => {
                debug!("Request #{} failed: {e}", ticket.0);
                state.fail(e.user_message())
            }
        };
        true
    }

    /// Settle the request behind `ticket` with a plain message.
    pub fn abandon(&mut self, ticket: Ticket, message: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = std::mem::take(&mut self.state).fail(message);
        true
    }
}

// -------------------------------------------------------------------------------------------------

type Completion = (Ticket, Result<CanonicalResult, FetchError>);

/// Runs predict requests on the tokio runtime, one at a time from the caller's point of view:
/// submitting a new query cancels whatever was in flight.
pub struct Predictor {
    client: Client,
    api_base: String,
    session: PredictSession,
    in_flight: Option<(Ticket, JoinHandle<Completion>)>,
}

impl Predictor {
    pub fn new(client: Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            session: PredictSession::new(),
            in_flight: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.session.state()
    }

    pub fn is_loading(&self) -> bool {
        self.session.state().is_loading()
    }

    /// Start a request for `query`, aborting the previous one if it has not finished.
    pub fn submit(&mut self, query: Query) -> Ticket {
        if let Some((ticket, handle)) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Cancelling request #{} in favour of {query}", ticket.0);
            }
            handle.abort();
        }

        let ticket = self.session.begin(query.clone());
        let client = self.client.clone();
        let api_base = self.api_base.clone();
        let handle = tokio::spawn(async move {
            let outcome = client.fetch_prediction(&api_base, &query).await;
            (ticket, outcome)
        });

        self.in_flight = Some((ticket, handle));
        ticket
    }

    /// Wait for the current request (if any) to finish and return the resulting view.
    ///
    /// Cancel-safe: dropping this future leaves the request running, and a later call picks it
    /// back up.
    pub async fn settled(&mut self) -> ViewState {
        if let Some((ticket, handle)) = self.in_flight.as_mut() {
            let ticket = *ticket;
            let joined = handle.await;
            self.in_flight = None;

            match joined {
                Ok((ticket, outcome)) => {
                    self.session.complete(ticket, outcome);
                }
                Err(e) => {
                    error!("Request #{} did not complete: {e}", ticket.0);
                    self.session.abandon(ticket, NETWORK_FAILURE);
                }
            }
        }
        self.session.state().clone()
    }
}
