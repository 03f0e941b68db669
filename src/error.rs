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

use crate::opt::Party;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Failed to parse log directive: `{0}´")]
	LogParse(#[from] tracing_subscriber::filter::ParseError),
	#[error("I/O error: `{0}`")]
	Io(#[from] std::io::Error),
	#[error("CSV error: `{0}`")]
	Csv(#[from] csv::Error),
	#[error("JSON error: `{0}`")]
	Json(#[from] serde_json::Error),
	#[error("Prometheus error: `{0}`")]
	Prometheus(#[from] prometheus::Error),
	#[error("Missing required column `{column}` in {table}")]
	MissingColumn { table: String, column: String },
	#[error("Missing value for `{column}` at line {line} of {table}")]
	MissingValue { table: String, column: String, line: usize },
	#[error("Invalid value `{value}` for `{column}` at line {line} of {table}: {reason}")]
	InvalidValue { table: String, column: String, line: usize, value: String, reason: String },
	#[error("{0} contains no rows")]
	EmptyTable(String),
	#[error("No initial seat projection for `{0}`")]
	MissingInitialEstimate(Party),
	#[error("Projected seats sum to zero or overflow at position {0}, cannot rescale")]
	ZeroSeatTotal(usize),
	#[error("Invalid party: `{0}`, supported parties are NDA, I.N.D.I.A. and Others")]
	InvalidParty(String),
	#[error("Invalid quality weights: {0}")]
	InvalidWeights(String),
	#[error("Other error: `{0}`")]
	Other(String),
}
