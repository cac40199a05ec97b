use crate::config::{health_url, predict_url};
use crate::error::FetchError;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use stockcast_view::{normalize, CanonicalResult, NormalizeError, Query};
use tracing::{debug, error, trace};

/// `GET /api/health`
#[derive(Deserialize, Debug)]
struct Health {
    #[serde(default)]
    ok: bool,
}

pub trait ClientPredictExt {
    /// Issue one `GET {api_base}/api/predict` for `query` and normalize whatever comes back.
    fn fetch_prediction(
        &self,
        api_base: &str,
        query: &Query,
    ) -> impl Future<Output = Result<CanonicalResult, FetchError>> + Send;

    /// Ask the service whether it is up.
    fn health(&self, api_base: &str) -> impl Future<Output = Result<bool, FetchError>> + Send;
}

/// Add-on methods for [`reqwest::Client`].
///
/// [`reqwest::Client`]: https://docs.rs/reqwest/latest/reqwest/struct.Client.html
impl ClientPredictExt for Client {
    async fn fetch_prediction(
        &self,
        api_base: &str,
        query: &Query,
    ) -> Result<CanonicalResult, FetchError> {
        let time = std::time::Instant::now();
        let url = predict_url(api_base, query)?;

        trace!("Fetching prediction for {query}");
        let response = self.get(url.clone()).send().await.map_err(|e| {
            error!("{query} prediction fetching error: {e}\nURL: {url}");
            e
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("{query} byte transformation error: {e}\nURL: {url}");
            e
        })?;
        trace!("{query} answered {status} with {} bytes", body.len());

        // the body is read even on a non-2xx status, so the server's own message surfaces
        let outcome = match normalize(&body, query) {
            Ok(result) if status.is_success() => Ok(result),
            Ok(_) => Err(FetchError::Server(format!("Server returned HTTP {status}"))),
            Err(NormalizeError::MalformedResponse(e)) => {
                error!("{query} deserialization error: {e}\nURL: {url}");
                Err(FetchError::MalformedResponse(e))
            }
            Err(e) => Err(e.into()),
        };

        debug!(
            "{query} prediction settled. Elapsed time: {} ms",
            time.elapsed().as_millis()
        );
        outcome
    }

    async fn health(&self, api_base: &str) -> Result<bool, FetchError> {
        let url = health_url(api_base)?;

        trace!("Checking service health at {url}");
        let response = self.get(url.clone()).send().await.map_err(|e| {
            error!("health check error: {e}\nURL: {url}");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server(format!("Server returned HTTP {status}")));
        }

        let body = response.bytes().await?;
        let health: Health = serde_json::from_slice(&body).map_err(FetchError::MalformedResponse)?;
        Ok(health.ok)
    }
}
