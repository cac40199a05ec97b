use crate::error::{NormalizeError, DEFAULT_SERVER_ERROR};
use crate::query::Query;
use crate::response::{Common, FlatSeries, Prediction, RawChart, RawResponse, Values};
use serde::Serialize;
use tracing::trace;

/// The one shape every server response is normalized into before rendering.
///
/// ```json
/// {
///     "symbol": "AAPL",
///     "last_close": 150.25,
///     "prediction": { "next_close": 151.0, "direction": "up", "mse": 0.01 },
///     "chart": {
///         "dates": ["2024-01-01"],
///         "close": [150.25],
///         "sma20": [],
///         "upperB": [],
///         "lowerB": []
///     }
/// }
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CanonicalResult {
    pub symbol: String,
    pub last_close: Option<f64>,
    pub prediction: Option<Prediction>,
    pub chart: CanonicalChart,
}

/// Chart columns, index-aligned to `dates`. A column the server left out of an enveloped
/// response stays `None`; the flat shape always fills in empty columns. Dates are passed
/// through as the server wrote them.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct CanonicalChart {
    pub dates: Option<Vec<String>>,
    pub close: Option<Values>,
    pub sma20: Option<Values>,
    #[serde(rename = "upperB")]
    pub upper_b: Option<Values>,
    #[serde(rename = "lowerB")]
    pub lower_b: Option<Values>,
}

impl CanonicalChart {
    /// True when there is no date axis to draw against.
    pub fn is_empty(&self) -> bool {
        self.dates.as_ref().map_or(true, |dates| dates.is_empty())
    }
}

impl From<RawChart> for CanonicalChart {
    fn from(chart: RawChart) -> Self {
        Self {
            dates: chart.dates,
            close: chart.close,
            sma20: chart.sma20,
            upper_b: chart.upper_b,
            lower_b: chart.lower_b,
        }
    }
}

impl From<FlatSeries> for CanonicalChart {
    fn from(series: FlatSeries) -> Self {
        Self {
            dates: Some(series.dates.unwrap_or_default()),
            close: Some(series.prices.unwrap_or_default()),
            sma20: Some(series.sma20.unwrap_or_default()),
            upper_b: Some(series.upper_b.unwrap_or_default()),
            lower_b: Some(series.lower_b.unwrap_or_default()),
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Parse and normalize a response body for `query`.
pub fn normalize(body: &[u8], query: &Query) -> Result<CanonicalResult, NormalizeError> {
    trace!("Deserializing prediction response for {query}");
    let raw = RawResponse::from_slice(body)?;
    resolve(raw, query)
}

/// Normalize an already-parsed response.
pub fn resolve(raw: RawResponse, query: &Query) -> Result<CanonicalResult, NormalizeError> {
    let (common, chart) = match raw {
        RawResponse::Failure { error } => {
            let message = error.unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
            return Err(NormalizeError::Server(message));
        }
        RawResponse::Enveloped { common, chart } => {
            trace!("Enveloped response for {query}");
            (common, CanonicalChart::from(chart))
        }
        RawResponse::Flat { common, series } => {
            trace!("Flat response for {query}");
            (common, CanonicalChart::from(series))
        }
    };

    let Common {
        symbol,
        last_close,
        prediction,
    } = common;

    let symbol = symbol
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| query.symbol().to_string())
        .to_uppercase();

    Ok(CanonicalResult {
        symbol,
        last_close,
        prediction,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Direction;

    fn query() -> Query {
        Query::new("aapl", "2024-01-01").unwrap()
    }

    #[test]
    fn enveloped_chart_is_copied_verbatim() {
        let body = br#"{
            "ok": true,
            "symbol": "AAPL",
            "last_close": 150.25,
            "chart": {
                "dates": ["2024-01-01", "2024-01-02"],
                "close": [150.25, 151.5],
                "sma20": [null, 150.9],
                "upperB": [null, 155.0],
                "lowerB": [null, 146.8]
            },
            "prediction": {"next_close": 151.0, "direction": "up", "mse": 0.01}
        }"#;

        let result = normalize(body, &query()).unwrap();
        assert_eq!(result.symbol, "AAPL");
        assert_eq!(result.last_close, Some(150.25));
        assert_eq!(
            result.chart.dates,
            Some(vec!["2024-01-01".to_string(), "2024-01-02".to_string()])
        );
        assert_eq!(result.chart.close, Some(vec![Some(150.25), Some(151.5)]));
        assert_eq!(result.chart.sma20, Some(vec![None, Some(150.9)]));
        assert_eq!(result.chart.upper_b, Some(vec![None, Some(155.0)]));
        assert_eq!(result.chart.lower_b, Some(vec![None, Some(146.8)]));

        let prediction = result.prediction.unwrap();
        assert_eq!(prediction.next_close, Some(151.0));
        assert_eq!(prediction.direction, Direction::Up);
        assert_eq!(prediction.mse, Some(0.01));
    }

    #[test]
    fn datetime_dates_are_kept_as_sent() {
        let body = br#"{"ok": true, "chart": {"dates": ["2024-01-01T00:00:00"], "close": [1.0]}}"#;
        let chart = normalize(body, &query()).unwrap().chart;
        assert_eq!(chart.dates, Some(vec!["2024-01-01T00:00:00".to_string()]));
        assert_eq!(chart.close, Some(vec![Some(1.0)]));
    }

    #[test]
    fn prediction_without_mse_keeps_the_chart() {
        let body = br#"{
            "ok": true,
            "chart": {"dates": ["2024-01-01"], "close": [1.0]},
            "prediction": {"next_close": 2.0, "direction": "up"}
        }"#;
        let result = normalize(body, &query()).unwrap();
        assert!(!result.chart.is_empty());
        let prediction = result.prediction.unwrap();
        assert_eq!(prediction.next_close, Some(2.0));
        assert_eq!(prediction.direction, Direction::Up);
        assert_eq!(prediction.mse, None);
    }

    #[test]
    fn non_boolean_ok_still_normalizes() {
        let body = br#"{"ok": 1, "symbol": "AAPL", "chart": {"dates": ["2024-01-01"], "close": [1.0]}}"#;
        let result = normalize(body, &query()).unwrap();
        assert_eq!(result.symbol, "AAPL");
        assert_eq!(result.chart.close, Some(vec![Some(1.0)]));
    }

    #[test]
    fn enveloped_missing_columns_stay_absent() {
        let body = br#"{"ok": true, "chart": {"dates": ["2024-01-01"], "close": [1.0]}}"#;
        let chart = normalize(body, &query()).unwrap().chart;
        assert_eq!(chart.close, Some(vec![Some(1.0)]));
        assert_eq!(chart.sma20, None);
        assert_eq!(chart.upper_b, None);
        assert_eq!(chart.lower_b, None);
    }

    #[test]
    fn flat_maps_prices_to_close_and_defaults_bands() {
        let body = br#"{"dates": ["2024-01-01"], "prices": [10.0], "predictions": [11.0]}"#;
        let result = normalize(body, &query()).unwrap();
        assert_eq!(result.chart.close, Some(vec![Some(10.0)]));
        assert_eq!(result.chart.sma20, Some(vec![]));
        assert_eq!(result.chart.upper_b, Some(vec![]));
        assert_eq!(result.chart.lower_b, Some(vec![]));
        assert_eq!(result.prediction, None);
        assert_eq!(result.last_close, None);
    }

    #[test]
    fn flat_keeps_bands_when_present() {
        let body = br#"{"dates": ["2024-01-01"], "prices": [10.0], "sma20": [9.0], "upperB": [12.0], "lowerB": [6.0]}"#;
        let chart = normalize(body, &query()).unwrap().chart;
        assert_eq!(chart.sma20, Some(vec![Some(9.0)]));
        assert_eq!(chart.upper_b, Some(vec![Some(12.0)]));
        assert_eq!(chart.lower_b, Some(vec![Some(6.0)]));
    }

    #[test]
    fn empty_object_is_an_empty_flat_chart() {
        let result = normalize(b"{}", &query()).unwrap();
        assert!(result.chart.is_empty());
        assert_eq!(result.chart.dates, Some(vec![]));
        assert_eq!(result.chart.close, Some(vec![]));
    }

    #[test]
    fn server_failure_carries_message() {
        let err = normalize(br#"{"ok": false, "error": "symbol not found"}"#, &query()).unwrap_err();
        match err {
            NormalizeError::Server(message) => assert_eq!(message, "symbol not found"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn server_failure_without_message_uses_default() {
        let err = normalize(br#"{"ok": false}"#, &query()).unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_SERVER_ERROR);
    }

    #[test]
    fn html_is_malformed() {
        let err = normalize(b"<html><body>502 Bad Gateway</body></html>", &query()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedResponse(_)));
    }

    #[test]
    fn symbol_falls_back_to_query_and_is_uppercased() {
        let echoed = normalize(br#"{"ok": true, "symbol": "msft", "chart": {}}"#, &query()).unwrap();
        assert_eq!(echoed.symbol, "MSFT");

        let missing = normalize(br#"{"ok": true, "chart": {}}"#, &query()).unwrap();
        assert_eq!(missing.symbol, "AAPL");

        let blank = normalize(br#"{"symbol": ""}"#, &query()).unwrap();
        assert_eq!(blank.symbol, "AAPL");
    }

    #[test]
    fn serializes_with_wire_column_names() {
        let result = normalize(br#"{"dates": [], "prices": []}"#, &query()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["chart"]["upperB"].is_array());
        assert!(json["chart"]["lowerB"].is_array());
    }
}
