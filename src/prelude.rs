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

//! Constants and types that are assumed to be fixed all over the place.

use std::collections::BTreeMap;

use crate::opt::Party;

/// Per-party numbers, iterated in the canonical party order.
pub type PartyValues = BTreeMap<Party, f64>;

/// Per-party rounded seat counts.
pub type PartySeats = BTreeMap<Party, i64>;

/// The logging target.
pub const LOG_TARGET: &str = "seat-projector";

/// Number of seats every projection row is rescaled to.
pub const DEFAULT_TOTAL_SEATS: u32 = 543;

/// The election every poll is measured against.
pub const DEFAULT_ELECTION_DATE: &str = "2024-06-01";

/// Ranking assumed for an agency that is absent from the ranking table.
pub const DEFAULT_AGENCY_RANKING: f64 = 0.95;

/// Separator of a pooled release naming several agencies.
pub const AGENCY_SEPARATOR: char = '-';

/// Day of the month assumed when a poll date only names a month.
pub const MONTH_ONLY_DAY: u32 = 15;

// Poll batch columns.
pub const COL_AGENCY: &str = "Polling agency";
pub const COL_DATE: &str = "Date published";
pub const COL_SAMPLE_SIZE: &str = "Sample size";
pub const COL_MARGIN_OF_ERROR: &str = "Margin of Error";
pub const COL_STATES: &str = "States";
pub const COL_LEAD: &str = "Lead";

// Reference table columns.
pub const COL_RANKING: &str = "Ranking";
pub const COL_PARTY: &str = "Party";
pub const COL_SKEW: &str = "Adjusted Seat Skew";
pub const COL_SEAT_PROJECTION: &str = "Seat Projection";

// Derived columns.
pub const COL_DAYS_TO_ELECTION: &str = "Days to Election";
pub const COL_AGENCY_SCORE: &str = "Polling Agency Quality Score";
pub const COL_SAMPLE_SIZE_SCORE: &str = "Sample Size Score";
pub const COL_MARGIN_OF_ERROR_SCORE: &str = "Margin of Error Score";
pub const COL_RECENCY_SCORE: &str = "Recency Score";
pub const COL_OVERALL_QUALITY: &str = "Overall Poll Quality";
pub const COL_LEADING_PARTY: &str = "Leading Party";
pub const COL_SEAT_NUMBER: &str = "Seat #";

/// Columns of a state poll batch that never hold party numbers.
pub const STATE_METADATA_COLUMNS: [&str; 6] =
	[COL_STATES, COL_AGENCY, COL_DATE, COL_SAMPLE_SIZE, COL_MARGIN_OF_ERROR, COL_LEAD];

// Conventional file names used by the `run` command.
pub const POLLS_FILE: &str = "Seat Projections.csv";
pub const RANKINGS_FILE: &str = "Final_Pollster_Rankings.csv";
pub const SKEW_FILE: &str = "Predicted_Skew_Numbers_2023.csv";
pub const INITIAL_FILE: &str = "Initial_Data.csv";
pub const STATE_POLLS_FILE: &str = "combined_states_data.csv";
pub const PROJECTION_FILE: &str = "polls_moving_averages.csv";
pub const SEATS_FILE: &str = "converted_polls_moving_averages.csv";
pub const STATES_FILE: &str = "leading_party_by_state.csv";
pub const SUMMARY_FILE: &str = "projection_summary.json";
