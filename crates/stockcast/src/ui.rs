use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use stockcast_view::display::{self, NO_CHART_DATA};
use stockcast_view::{map_chart, CanonicalChart, Direction, Query, ViewState};
use tracing::{debug, error};

/// Stands in for the disabled "PREDICT" button while a request is in flight.
pub fn spinner(query: &Query) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Loading... {query}"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print whatever the view currently shows.
pub fn render(state: &ViewState) {
    if let Some(message) = state.error() {
        println!("{}", message.red());
        return;
    }

    let Some(result) = state.result() else {
        return;
    };

    if let Some(line) = display::last_close_line(result) {
        println!("{}", line.bold());
    }

    if result.chart.is_empty() {
        println!("{}", NO_CHART_DATA.dimmed());
    } else {
        for line in display::chart_summary(&map_chart(&result.chart)) {
            println!("  {line}");
        }
    }

    if let Some(prediction) = &result.prediction {
        if let Some(headline) = display::prediction_headline(prediction) {
            let headline = match prediction.direction {
                Direction::Up => headline.green().bold(),
                Direction::Down => headline.red().bold(),
            };
            println!("{headline}");
        }
        if let Some(line) = display::mse_line(prediction) {
            println!("{line}");
        }
    }
}

pub fn render_json(state: &ViewState) -> Result<()> {
    match (state.result(), state.error()) {
        (Some(result), _) => println!("{}", serde_json::to_string_pretty(result)?),
        (None, Some(message)) => eprintln!("{}", message.red()),
        (None, None) => {}
    }
    Ok(())
}

/// Write the chart configuration for `chart` as pretty JSON.
pub async fn write_chart(path: &Path, chart: &CanonicalChart) -> Result<()> {
    let spec = map_chart(chart);
    tokio::fs::write(path, serde_json::to_vec_pretty(&spec)?).await?;
    Ok(())
}

/// Keep the chart file in step with the view: the result's chart after a success, an empty
/// chart after a failure. Nothing is written when no file was asked for.
pub async fn settle_chart(state: &ViewState, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let cleared = CanonicalChart::default();
    let chart = match state {
        ViewState::Success(result) => &result.chart,
        ViewState::Failure(_) => &cleared,
        ViewState::Idle | ViewState::Loading { .. } => return Ok(()),
    };

    write_chart(path, chart).await.map_err(|e| {
        error!("failed writing chart to {}: {e}", path.display());
        e
    })?;
    debug!("chart written to {}", path.display());
    Ok(())
}
