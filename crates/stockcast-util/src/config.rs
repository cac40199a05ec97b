use crate::error::FetchError;
use stockcast_view::Query;
use url::Url;

/// Where the prediction service lives when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://stock-market-predictor-46tn.onrender.com";

/// Environment variables consulted for the base URL, in order.
pub const API_BASE_VARS: [&str; 2] = ["STOCKCAST_API_BASE", "API_BASE"];

/// Resolve the API base URL: the `--api-base` flag first, then the environment, then
/// [`DEFAULT_API_BASE`]. Trailing slashes are stripped.
pub fn resolve_api_base(flag: Option<&str>) -> String {
    resolve_with(flag, |key| std::env::var(key).ok())
}

fn resolve_with<F>(flag: Option<&str>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    // an empty value means "same origin", which has no meaning outside a browser
    flag.map(str::to_string)
        .into_iter()
        .chain(API_BASE_VARS.iter().filter_map(|key| lookup(*key)))
        .map(|base| base.trim().trim_end_matches('/').to_string())
        .find(|base| !base.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

fn endpoint(api_base: &str, path: &str) -> Result<Url, FetchError> {
    Url::parse(&format!("{api_base}{path}")).map_err(|source| FetchError::InvalidBaseUrl {
        base: api_base.to_string(),
        source,
    })
}

/// `{api_base}/api/predict?symbol=<TICKER>&start=<YYYY-MM-DD>`, percent-encoded.
pub fn predict_url(api_base: &str, query: &Query) -> Result<Url, FetchError> {
    let mut url = endpoint(api_base, "/api/predict")?;
    url.query_pairs_mut()
        .append_pair("symbol", query.symbol())
        .append_pair("start", &query.start_param());
    Ok(url)
}

/// `{api_base}/api/health`
pub fn health_url(api_base: &str) -> Result<Url, FetchError> {
    endpoint(api_base, "/api/health")
}
