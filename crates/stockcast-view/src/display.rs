use crate::chart::ChartSpec;
use crate::normalize::CanonicalResult;
use crate::response::Prediction;

pub const NO_CHART_DATA: &str = "No chart data returned.";

/// `"AAPL — Last Close: $150.25"`, when the server sent a last close.
pub fn last_close_line(result: &CanonicalResult) -> Option<String> {
    result
        .last_close
        .map(|close| format!("{} — Last Close: ${close:.2}", result.symbol))
}

/// `"$151.00 ⬆️"`, when the server sent a predicted close.
pub fn predicted_price(prediction: &Prediction) -> Option<String> {
    prediction
        .next_close
        .map(|close| format!("${close:.2} {}", prediction.direction.arrow()))
}

/// `"Next Day Predicted Close: $151.00 ⬆️"`
pub fn prediction_headline(prediction: &Prediction) -> Option<String> {
    predicted_price(prediction).map(|price| format!("Next Day Predicted Close: {price}"))
}

/// `"Model MSE: 0.0100"`
pub fn mse_line(prediction: &Prediction) -> Option<String> {
    prediction.mse.map(|mse| format!("Model MSE: {mse:.4}"))
}

/// One line per series: label, number of points, and the latest value.
pub fn chart_summary(spec: &ChartSpec) -> Vec<String> {
    spec.series
        .iter()
        .map(|series| match series.latest() {
            Some((date, value)) => format!(
                "{:<11} {:>4} pts  latest {value:.2} ({date})",
                series.label,
                series.data.len()
            ),
            None => format!("{:<11} {:>4} pts", series.label, series.data.len()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::map_chart;
    use crate::normalize::normalize;
    use crate::query::Query;

    const EXAMPLE: &[u8] = br#"{
        "ok": true,
        "symbol": "AAPL",
        "last_close": 150.25,
        "chart": {"dates": ["2024-01-01"], "close": [150.25], "sma20": [], "upperB": [], "lowerB": []},
        "prediction": {"next_close": 151.0, "direction": "up", "mse": 0.01}
    }"#;

    fn example() -> CanonicalResult {
        normalize(EXAMPLE, &Query::new("aapl", "2024-01-01").unwrap()).unwrap()
    }

    #[test]
    fn renders_last_close() {
        assert_eq!(
            last_close_line(&example()).as_deref(),
            Some("AAPL — Last Close: $150.25")
        );
    }

    #[test]
    fn renders_prediction_panel() {
        let prediction = example().prediction.unwrap();
        assert_eq!(predicted_price(&prediction).as_deref(), Some("$151.00 ⬆️"));
        assert_eq!(
            prediction_headline(&prediction).as_deref(),
            Some("Next Day Predicted Close: $151.00 ⬆️")
        );
        assert_eq!(mse_line(&prediction).as_deref(), Some("Model MSE: 0.0100"));
    }

    #[test]
    fn partial_prediction_renders_what_is_there() {
        let prediction = Prediction {
            mse: Some(0.5),
            ..Default::default()
        };
        assert_eq!(prediction_headline(&prediction), None);
        assert_eq!(mse_line(&prediction).as_deref(), Some("Model MSE: 0.5000"));

        let prediction = Prediction {
            next_close: Some(9.5),
            ..Default::default()
        };
        assert_eq!(predicted_price(&prediction).as_deref(), Some("$9.50 ⬇️"));
        assert_eq!(mse_line(&prediction), None);
    }

    #[test]
    fn no_last_close_line_without_value() {
        let mut result = example();
        result.last_close = None;
        assert_eq!(last_close_line(&result), None);
    }

    #[test]
    fn summary_lists_every_series() {
        let lines = chart_summary(&map_chart(&example().chart));
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Close"));
        assert!(lines[0].contains("latest 150.25 (2024-01-01)"));
        assert!(lines[1].starts_with("SMA 20"));
        assert!(!lines[1].contains("latest"));
    }
}
