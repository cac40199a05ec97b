use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Raw payloads from `GET /api/predict`
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// A column of chart values; `null` marks a gap (e.g. the warm-up window of a rolling average).
pub type Values = Vec<Option<f64>>;

/// The two shapes the prediction endpoint is known to answer with, plus the explicit failure
/// envelope. Resolved once from the wire payload; nothing downstream looks at field presence.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// `{"ok": false, "error": "..."}`
    Failure { error: Option<String> },

    /// `{"ok": true, "symbol": .., "last_close": .., "prediction": {..}, "chart": {..}}`
    Enveloped { common: Common, chart: RawChart },

    /// `{"dates": [..], "prices": [..], "sma20"?: [..], "upperB"?: [..], "lowerB"?: [..]}`
    Flat { common: Common, series: FlatSeries },
}

/// Fields carried by either shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Common {
    pub symbol: Option<String>,
    pub last_close: Option<f64>,
    pub prediction: Option<Prediction>,
}

/// Dates are kept as the server wrote them.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RawChart {
    #[serde(default, deserialize_with = "lenient")]
    pub dates: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_values")]
    pub close: Option<Values>,
    #[serde(default, deserialize_with = "lenient_values")]
    pub sma20: Option<Values>,
    #[serde(rename = "upperB", default, deserialize_with = "lenient_values")]
    pub upper_b: Option<Values>,
    #[serde(rename = "lowerB", default, deserialize_with = "lenient_values")]
    pub lower_b: Option<Values>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSeries {
    pub dates: Option<Vec<String>>,
    pub prices: Option<Values>,
    pub sma20: Option<Values>,
    pub upper_b: Option<Values>,
    pub lower_b: Option<Values>,
}

/// Next-day forecast. Any field may be missing; a missing `direction` reads as down.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    #[serde(default, deserialize_with = "lenient")]
    pub next_close: Option<f64>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, deserialize_with = "lenient")]
    pub mse: Option<f64>,
}

/// Anything other than `"up"` reads as a predicted fall.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(from = "Value", rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
}

impl From<Value> for Direction {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("up") => Direction::Up,
            _ => Direction::Down,
        }
    }
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "⬆️",
            Direction::Down => "⬇️",
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A known field holding the wrong JSON type is treated as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(T::deserialize(value)
        .map_err(|e| debug!("ignoring mistyped field: {e}"))
        .ok())
}

/// Like [`lenient`], but one non-numeric entry only becomes a gap instead of dropping the column.
fn lenient_values<'de, D>(deserializer: D) -> Result<Option<Values>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Option<Vec<Value>> = lenient(deserializer)?;
    Ok(values.map(|values| values.iter().map(Value::as_f64).collect()))
}

/// Wire schema: every known field of both shapes, all optional.
#[derive(Deserialize, Debug, Default)]
struct Payload {
    #[serde(default, deserialize_with = "lenient")]
    ok: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    last_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    prediction: Option<Prediction>,
    #[serde(default, deserialize_with = "lenient")]
    chart: Option<RawChart>,

    // flat/legacy
    #[serde(default, deserialize_with = "lenient")]
    dates: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_values")]
    prices: Option<Values>,
    #[serde(default, deserialize_with = "lenient_values")]
    sma20: Option<Values>,
    #[serde(rename = "upperB", default, deserialize_with = "lenient_values")]
    upper_b: Option<Values>,
    #[serde(rename = "lowerB", default, deserialize_with = "lenient_values")]
    lower_b: Option<Values>,
}

impl RawResponse {
    /// Parse a response body. Fails only when the body is not JSON at all, such as an HTML
    /// error page from a proxy; a JSON value that is not an object reads as an empty payload.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload = match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => Payload::deserialize(value)?,
            other => {
                debug!("response body is JSON but not an object: {other}");
                Payload::default()
            }
        };
        Ok(payload.into())
    }
}

impl From<Payload> for RawResponse {
    fn from(p: Payload) -> Self {
        if p.ok == Some(false) {
            return RawResponse::Failure { error: p.error };
        }

        let common = Common {
            symbol: p.symbol,
            last_close: p.last_close,
            prediction: p.prediction,
        };

        match p.chart {
            Some(chart) => RawResponse::Enveloped { common, chart },
            None => RawResponse::Flat {
                common,
                series: FlatSeries {
                    dates: p.dates,
                    prices: p.prices,
                    sma20: p.sma20,
                    upper_b: p.upper_b,
                    lower_b: p.lower_b,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_false_wins_over_everything_else() {
        let body = br#"{"ok": false, "error": "boom", "chart": {"dates": []}}"#;
        assert_eq!(
            RawResponse::from_slice(body).unwrap(),
            RawResponse::Failure {
                error: Some("boom".to_string())
            }
        );
    }

    #[test]
    fn chart_field_selects_enveloped() {
        let body = br#"{"ok": true, "symbol": "aapl", "chart": {"dates": ["2024-01-02"], "close": [1.5]}}"#;
        match RawResponse::from_slice(body).unwrap() {
            RawResponse::Enveloped { common, chart } => {
                assert_eq!(common.symbol.as_deref(), Some("aapl"));
                assert_eq!(chart.close, Some(vec![Some(1.5)]));
                assert_eq!(chart.sma20, None);
            }
            other => panic!("expected enveloped, got {other:?}"),
        }
    }

    #[test]
    fn null_chart_falls_back_to_flat() {
        let body = br#"{"chart": null, "dates": ["2024-01-02"], "prices": [3.0], "predictions": [[1, 2]]}"#;
        match RawResponse::from_slice(body).unwrap() {
            RawResponse::Flat { series, .. } => {
                assert_eq!(series.prices, Some(vec![Some(3.0)]));
                assert_eq!(series.sma20, None);
            }
            other => panic!("expected flat, got {other:?}"),
        }
    }

    #[test]
    fn html_body_is_rejected() {
        assert!(RawResponse::from_slice(b"<!DOCTYPE html><html>Not Found</html>").is_err());
    }

    #[test]
    fn direction_is_lenient() {
        let up: Prediction =
            serde_json::from_str(r#"{"next_close": 1.0, "direction": "up", "mse": 0.1}"#).unwrap();
        let other: Prediction =
            serde_json::from_str(r#"{"next_close": 1.0, "direction": "flat", "mse": 0.1}"#)
                .unwrap();
        assert_eq!(up.direction, Direction::Up);
        assert_eq!(other.direction, Direction::Down);
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), r#""up""#);
    }

    #[test]
    fn partial_prediction_is_kept() {
        let body = br#"{"ok": true, "chart": {}, "prediction": {"next_close": 151.0}}"#;
        match RawResponse::from_slice(body).unwrap() {
            RawResponse::Enveloped { common, .. } => {
                let prediction = common.prediction.unwrap();
                assert_eq!(prediction.next_close, Some(151.0));
                assert_eq!(prediction.direction, Direction::Down);
                assert_eq!(prediction.mse, None);
            }
            other => panic!("expected enveloped, got {other:?}"),
        }
    }

    #[test]
    fn ok_that_is_not_false_is_not_a_failure() {
        let body = br#"{"ok": 1, "chart": {"dates": ["2024-01-02"], "close": [1.5]}}"#;
        assert!(matches!(
            RawResponse::from_slice(body).unwrap(),
            RawResponse::Enveloped { .. }
        ));
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let body = br#"{
            "ok": "yes",
            "symbol": 42,
            "last_close": "150.25",
            "chart": {"dates": "2024-01-02", "close": [1.5, "n/a", null], "sma20": {}}
        }"#;
        match RawResponse::from_slice(body).unwrap() {
            RawResponse::Enveloped { common, chart } => {
                assert_eq!(common.symbol, None);
                assert_eq!(common.last_close, None);
                assert_eq!(chart.dates, None);
                assert_eq!(chart.close, Some(vec![Some(1.5), None, None]));
                assert_eq!(chart.sma20, None);
            }
            other => panic!("expected enveloped, got {other:?}"),
        }
    }

    #[test]
    fn json_that_is_not_an_object_is_an_empty_flat_payload() {
        assert_eq!(
            RawResponse::from_slice(b"[1, 2, 3]").unwrap(),
            RawResponse::Flat {
                common: Common::default(),
                series: FlatSeries::default(),
            }
        );
    }
}
