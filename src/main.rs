// Copyright 2021-2022 Parity Technologies (UK) Ltd.
// This file is part of Polkadot.

// Polkadot is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Polkadot is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Polkadot.  If not, see <http://www.gnu.org/licenses/>.

//! # Seat Projector.
//!
//! Batch tool that scores opinion polls, folds them into a weighted moving average of seats and
//! derives the per-seat and per-state tables from it. See `help` for more information.
//!
//! # Implementation Notes:
//!
//! Every command validates all of its input tables before computing anything; any invalid
//! table aborts the run with the offending table, column and line.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use seat_projector::{
	commands::{self, types::*},
	error::Error,
	prelude::LOG_TARGET,
	prometheus,
};

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
#[clap(author, version, about)]
pub struct Opt {
	#[clap(subcommand)]
	pub command: Command,

	/// Sets a custom logging filter. Syntax is `<target>=<level>`, e.g.
	/// -lseat-projector=debug.
	///
	/// Log levels (least to most verbose) are error, warn, info, debug, and trace.
	/// By default, all targets log `info`. The global log level can be set with `-l<level>`.
	#[clap(long, short, default_value = "info", global = true)]
	pub log: String,

	/// Write the metrics of the run to this file in the Prometheus text format.
	#[clap(long, env = "METRICS_FILE", global = true)]
	pub metrics_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
#[cfg_attr(test, derive(PartialEq))]
pub enum Command {
	/// Score the national polls and compute the moving-average seat projection.
	Project(ProjectConfig),
	/// Compute the leading party of every state.
	States(StatesConfig),
	/// Expand the final row of a projection into one row per seat.
	Seats(SeatsConfig),
	/// Run every stage on a data directory.
	Run(RunConfig),
}

fn main() -> Result<(), Error> {
	let Opt { command, log, metrics_file } = Opt::parse();
	let filter = EnvFilter::from_default_env().add_directive(log.parse()?);
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let res = match command {
		Command::Project(cfg) => commands::project_cmd(cfg),
		Command::States(cfg) => commands::states_cmd(cfg),
		Command::Seats(cfg) => commands::seats_cmd(cfg),
		Command::Run(cfg) => commands::run_cmd(cfg),
	};

	log::debug!(target: LOG_TARGET, "round of execution finished. outcome = {res:?}");

	if let Some(path) = metrics_file {
		if let Err(e) = prometheus::write_metrics(&path) {
			log::warn!(target: LOG_TARGET, "Failed to write metrics: {e}");
		}
	}

	res
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use seat_projector::{
		opt::{QualityWeights, RoundingRule},
		prelude::*,
	};

	fn default_params() -> ProjectionParams {
		ProjectionParams {
			election_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
			total_seats: 543,
			rounding: RoundingRule::HalfEven,
			quality_weights: QualityWeights::default(),
		}
	}

	#[test]
	fn cli_project_works() {
		let opt = Opt::try_parse_from([
			env!("CARGO_PKG_NAME"),
			"--log",
			"debug",
			"project",
			"--polls",
			"polls.csv",
			"--election-date",
			"2024-04-19",
			"--rounding",
			"largest-remainder",
			"--quality-weights",
			"recency=0.5,agency=0.15",
			"--summary",
			"summary.json",
		])
		.unwrap();

		assert_eq!(
			opt,
			Opt {
				log: "debug".to_string(),
				metrics_file: None,
				command: Command::Project(ProjectConfig {
					polls: "polls.csv".into(),
					rankings: RANKINGS_FILE.into(), // Default
					skew: SKEW_FILE.into(),         // Default
					initial: INITIAL_FILE.into(),   // Default
					params: ProjectionParams {
						election_date: NaiveDate::from_ymd_opt(2024, 4, 19).unwrap(),
						total_seats: 543, // Default
						rounding: RoundingRule::LargestRemainder,
						quality_weights: QualityWeights {
							recency: 0.5,
							agency: 0.15,
							sample_size: 0.3,
							margin_of_error: 0.05,
						},
					},
					output: PROJECTION_FILE.into(), // Default
					summary: Some("summary.json".into()),
				}),
			}
		);
	}

	#[test]
	fn cli_project_default_works() {
		let opt = Opt::try_parse_from([env!("CARGO_PKG_NAME"), "project"]).unwrap();

		assert_eq!(opt.log, "info");
		match opt.command {
			Command::Project(cfg) => {
				assert_eq!(cfg.polls, PathBuf::from(POLLS_FILE));
				assert_eq!(cfg.summary, None);
				assert_eq!(cfg.params.total_seats, default_params().total_seats);
				assert_eq!(cfg.params.rounding, default_params().rounding);
				assert_eq!(cfg.params.quality_weights, default_params().quality_weights);
			},
			other => panic!("unexpected command {other:?}"),
		}
	}

	#[test]
	fn cli_run_works() {
		let opt = Opt::try_parse_from([
			env!("CARGO_PKG_NAME"),
			"run",
			"--data-dir",
			"data",
			"--output-dir",
			"out",
			"--total-seats",
			"100",
			"--skip-states",
			"--metrics-file",
			"metrics.prom",
		])
		.unwrap();

		assert_eq!(opt.metrics_file, Some(PathBuf::from("metrics.prom")));
		assert_eq!(
			opt.command,
			Command::Run(RunConfig {
				data_dir: "data".into(),
				output_dir: "out".into(),
				params: ProjectionParams { total_seats: 100, ..default_params() },
				skip_states: true,
			})
		);
	}

	#[test]
	fn cli_states_and_seats_work() {
		let opt =
			Opt::try_parse_from([env!("CARGO_PKG_NAME"), "states", "--state-polls", "s.csv", "-o", "o.csv"])
				.unwrap();
		assert_eq!(
			opt.command,
			Command::States(StatesConfig { state_polls: "s.csv".into(), output: "o.csv".into() })
		);

		let opt = Opt::try_parse_from([env!("CARGO_PKG_NAME"), "seats"]).unwrap();
		assert_eq!(
			opt.command,
			Command::Seats(SeatsConfig {
				projection: PROJECTION_FILE.into(),
				output: SEATS_FILE.into(),
			})
		);
	}

	#[test]
	fn cli_rejects_bad_weights() {
		let res = Opt::try_parse_from([
			env!("CARGO_PKG_NAME"),
			"project",
			"--quality-weights",
			"recency=0.9",
		]);
		assert!(res.is_err());
	}
}
