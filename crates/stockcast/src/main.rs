use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, Input, TraceLevel};
use colored::Colorize;
use dotenv::{dotenv, var};
use std::path::Path;
use std::process::ExitCode;
use stockcast_util::prelude::{build_client, Predict as _};
use stockcast_util::{resolve_api_base, Predictor};
use stockcast_view::Query;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod ui;

fn preprocess(trace_level: Level) {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber).expect("Set subscriber");
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level);
    trace!("Command line input recorded: {cli:#?}");

    let api_base = resolve_api_base(cli.api_base.as_deref());
    info!("Using prediction service at {api_base}");
    let http_client = build_client(var("USER_AGENT").ok().as_deref())?;

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> stockcast <COMMAND>"
    match &cli.command {
        // "> stockcast predict [SYMBOL] [--start YYYY-MM-DD] [--chart-out FILE] [--json]"
        // one request, rendered once
        Predict {
            symbol,
            start,
            chart_out,
            json,
        } => {
            let query = match Query::new(symbol, start) {
                Ok(query) => query,
                Err(e) => {
                    println!("{}", e.to_string().red());
                    return Ok(ExitCode::FAILURE);
                }
            };

            let mut predictor = Predictor::new(http_client, api_base);
            let pb = ui::spinner(&query);
            predictor.submit(query);
            let state = predictor.settled().await;
            pb.finish_and_clear();

            if *json {
                ui::render_json(&state)?;
            } else {
                ui::render(&state);
            }
            ui::settle_chart(&state, chart_out.as_deref()).await?;

            if state.error().is_some() {
                return Ok(ExitCode::FAILURE);
            }
        }

        // ---------------------------------------------------------------------------
        // "> stockcast interactive [--chart-out FILE]"
        // one request per line of stdin; the latest line wins
        Interactive { chart_out } => {
            interactive(Predictor::new(http_client, api_base), chart_out.as_deref()).await?;
        }

        // ---------------------------------------------------------------------------
        // "> stockcast health"
        Health => match http_client.health(&api_base).await {
            Ok(true) => println!("{}", format!("{api_base} is up").green()),
            Ok(false) => {
                println!("{}", format!("{api_base} answered but reported not ok").red());
                return Ok(ExitCode::FAILURE);
            }
            Err(e) => {
                error!("Health check failed: {e}");
                println!("{}", e.user_message().red());
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

async fn interactive(mut predictor: Predictor, chart_out: Option<&Path>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pb: Option<indicatif::ProgressBar> = None;

    println!("Enter \"<SYMBOL> [YYYY-MM-DD]\" (or \"quit\").");
    loop {
        tokio::select! {
            state = predictor.settled(), if predictor.is_loading() => {
                if let Some(pb) = pb.take() {
                    pb.finish_and_clear();
                }
                ui::render(&state);
                ui::settle_chart(&state, chart_out).await?;
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };

                match cli::parse_line(&line) {
                    Input::Blank => continue,
                    Input::Quit => break,
                    Input::Predict { symbol, start } => match Query::new(symbol, start) {
                        Ok(query) => {
                            if let Some(pb) = pb.take() {
                                pb.finish_and_clear();
                            }
                            pb = Some(ui::spinner(&query));
                            predictor.submit(query);
                        }
                        Err(e) => println!("{}", e.to_string().red()),
                    },
                }
            }
        }
    }

    // let the last request land before leaving
    if predictor.is_loading() {
        let state = predictor.settled().await;
        if let Some(pb) = pb.take() {
            pb.finish_and_clear();
        }
        ui::render(&state);
        ui::settle_chart(&state, chart_out).await?;
    }

    Ok(())
}
