use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stockcast_view::query::{DEFAULT_START, DEFAULT_SYMBOL};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, default_value = "WARN", ignore_case = true)]
    pub trace: TraceLevel,

    /// Base URL of the prediction service (overrides STOCKCAST_API_BASE and API_BASE)
    #[arg(long)]
    pub api_base: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the price history and next-day prediction for one ticker.
    Predict {
        /// Ticker symbol (case-insensitive).
        #[arg(default_value = DEFAULT_SYMBOL)]
        symbol: String,

        /// First date of the price history, YYYY-MM-DD.
        #[arg(short, long, default_value = DEFAULT_START)]
        start: String,

        /// Write the line-chart configuration (JSON) to this file.
        #[arg(long)]
        chart_out: Option<PathBuf>,

        /// Print the normalized result as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Read "<SYMBOL> [START]" lines from stdin; a new line cancels the request in flight.
    Interactive {
        /// Write the line-chart configuration (JSON) of each result to this file.
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },

    /// Check that the prediction service is up.
    Health,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

/// What a line typed in interactive mode asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Blank,
    Quit,
    Predict { symbol: &'a str, start: &'a str },
}

/// `"aapl"`, `"aapl 2023-01-01"`, `"quit"`; a missing start date means the default.
pub fn parse_line(line: &str) -> Input<'_> {
    let mut words = line.split_whitespace();
    match words.next() {
        None => Input::Blank,
        Some(word) if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("exit") => {
            Input::Quit
        }
        Some(symbol) => Input::Predict {
            symbol,
            start: words.next().unwrap_or(DEFAULT_START),
        },
    }
}
