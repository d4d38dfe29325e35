// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use clap::{ArgMatches, Command, arg};
use greenberth_model::{
    config::{EngineConfig, PlanningRequest},
    err::InputError,
    loading::load_vessels_from_path,
};
use greenberth_solver::{error::PlanningError, planner::Planner};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("greenberth")
        .about("Plans berth schedules that minimise waiting and emission costs")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("plan")
                .about("Computes a berth schedule for a vessel snapshot")
                .arg(
                    arg!(--vessels <PATH> "Path to the vessel feed (JSON array)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--request [PATH] "Path to a planning request (JSON object)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--config [PATH] "Path to an engine configuration (JSON object)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--berths [N] "Number of berths, overrides the request")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--budget [SECONDS] "Time budget in seconds, overrides the request")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--workers [N] "Number of search threads, overrides the configuration")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(arg!(--json "Print the result as JSON")),
        )
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    enable_tracing();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("plan", sub_m)) => {
            let json = sub_m.get_flag("json");
            match run_plan(sub_m) {
                Ok(output) => {
                    println!("{}", output);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    if json {
                        println!(
                            "{}",
                            serde_json::json!({ "code": e.code(), "message": e.to_string() })
                        );
                    } else {
                        eprintln!("{}", e);
                    }
                    ExitCode::FAILURE
                }
            }
        }
        _ => ExitCode::FAILURE,
    }
}

fn run_plan(matches: &ArgMatches) -> Result<String, PlanningError> {
    let Some(vessels_path) = matches.get_one::<PathBuf>("vessels") else {
        return Err(InputError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no vessel feed given",
        ))
        .into());
    };
    let vessels = load_vessels_from_path(vessels_path)?;

    let mut request = match matches.get_one::<PathBuf>("request") {
        Some(path) => PlanningRequest::from_path(path)?,
        None => {
            let berths = matches
                .get_one::<usize>("berths")
                .copied()
                .ok_or(InputError::NonPositiveBerthCount)?;
            PlanningRequest::new(berths)
        }
    };
    if let Some(&berths) = matches.get_one::<usize>("berths") {
        request.num_berths = berths;
    }
    if let Some(&budget) = matches.get_one::<f64>("budget") {
        request.time_budget_seconds = budget;
    }

    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    if let Some(&workers) = matches.get_one::<usize>("workers") {
        config.num_workers = Some(workers);
    }

    tracing::debug!("{:?}", request);
    tracing::debug!("{:?}", config);

    let result = Planner::new(config).plan(&vessels, &request)?;
    if matches.get_flag("json") {
        result
            .to_json_pretty()
            .map_err(|e| PlanningError::internal(e.to_string()))
    } else {
        Ok(result.to_string())
    }
}
