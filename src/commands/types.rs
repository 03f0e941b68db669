use chrono::NaiveDate;
use std::path::PathBuf;

use crate::{
	opt::{DEFAULT_QUALITY_WEIGHTS, QualityWeights, RoundingRule},
	prelude::*,
};

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct ProjectConfig {
	/// The national poll batch.
	#[clap(long, default_value = POLLS_FILE)]
	pub polls: PathBuf,

	/// The `Polling agency → Ranking` table.
	#[clap(long, default_value = RANKINGS_FILE)]
	pub rankings: PathBuf,

	/// The `Party → Adjusted Seat Skew` table.
	#[clap(long, default_value = SKEW_FILE)]
	pub skew: PathBuf,

	/// The `Party → Seat Projection` table seeding the moving average.
	#[clap(long, default_value = INITIAL_FILE)]
	pub initial: PathBuf,

	#[clap(flatten)]
	pub params: ProjectionParams,

	/// Where to write the projection table.
	#[clap(long, short, default_value = PROJECTION_FILE)]
	pub output: PathBuf,

	/// Also write a JSON summary of the final projection.
	#[clap(long)]
	pub summary: Option<PathBuf>,
}

/// Knobs of the projection shared by `project` and `run`.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct ProjectionParams {
	/// Polls are weighted by how close to this date they were published.
	#[clap(long, default_value = DEFAULT_ELECTION_DATE, env = "ELECTION_DATE")]
	pub election_date: NaiveDate,

	/// The number of seats every projection row is rescaled to.
	#[clap(long, default_value_t = DEFAULT_TOTAL_SEATS)]
	pub total_seats: u32,

	/// How rescaled seat numbers are rounded.
	///
	/// `half-even` rounds each party on its own and can miss the total by a seat or two,
	/// `largest-remainder` always hits it.
	#[clap(long, value_enum, default_value_t = RoundingRule::HalfEven)]
	pub rounding: RoundingRule,

	/// Weights of the poll quality blend, e.g. `recency=0.4,agency=0.25`. Weights that are not
	/// named keep their default; all four must add up to 1.
	#[clap(long, default_value = DEFAULT_QUALITY_WEIGHTS)]
	pub quality_weights: QualityWeights,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct StatesConfig {
	/// The combined state poll batch.
	#[clap(long, default_value = STATE_POLLS_FILE)]
	pub state_polls: PathBuf,

	/// Where to write the leading party of every state.
	#[clap(long, short, default_value = STATES_FILE)]
	pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct SeatsConfig {
	/// A projection table written by `project`; only its last row is used.
	#[clap(long, default_value = PROJECTION_FILE)]
	pub projection: PathBuf,

	/// Where to write one row per seat.
	#[clap(long, short, default_value = SEATS_FILE)]
	pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct RunConfig {
	/// Directory holding the input tables under their conventional names.
	#[clap(long, default_value = ".", env = "DATA_DIR")]
	pub data_dir: PathBuf,

	/// Directory the output tables are written to.
	#[clap(long, default_value = ".", env = "OUTPUT_DIR")]
	pub output_dir: PathBuf,

	#[clap(flatten)]
	pub params: ProjectionParams,

	/// Skip the state stage, e.g. when no state poll batch is available.
	#[clap(long)]
	pub skip_states: bool,
}
