pub mod client_ext;
pub mod config;
pub mod error;
pub mod session;

pub use crate::client_ext::predict::ClientPredictExt as Predict;
pub use crate::config::{health_url, predict_url, resolve_api_base, DEFAULT_API_BASE};
pub use crate::error::FetchError;
pub use crate::session::{PredictSession, Predictor, Ticket};

pub mod prelude {
    pub use crate::client_ext::predict::ClientPredictExt as Predict;
    pub use crate::client_ext::Client;

    /// Build the HTTP client, with the `USER_AGENT` the caller supplies (if any).
    pub fn build_client(user_agent: Option<&str>) -> reqwest::Result<Client> {
        let builder = reqwest::ClientBuilder::new();
        let builder = match user_agent {
            Some(agent) => builder.user_agent(agent),
            None => builder.user_agent(concat!("stockcast/", env!("CARGO_PKG_VERSION"))),
        };
        builder.build()
    }
}
