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

use crate::error::Error;

use serde::Serialize;
use std::{fmt, str::FromStr};

/// The recognized blend of sub-scores into the overall poll quality.
pub const DEFAULT_QUALITY_WEIGHTS: &str =
	"recency=0.4,agency=0.25,sample-size=0.3,margin-of-error=0.05";

/// The tracked blocs of the national projection.
///
/// The declaration order is the canonical order used for ties and for output columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Party {
	#[serde(rename = "NDA")]
	Nda,
	#[serde(rename = "I.N.D.I.A.")]
	India,
	#[serde(rename = "Others")]
	Others,
}

impl Party {
	pub const ALL: [Party; 3] = [Party::Nda, Party::India, Party::Others];

	/// Name of the column holding this party's numbers in a poll batch.
	pub fn column(&self) -> &'static str {
		match self {
			Self::Nda => "NDA",
			Self::India => "I.N.D.I.A.",
			Self::Others => "Others",
		}
	}

	/// Name of the projection column holding this party's rounded moving average.
	pub fn moving_average_column(&self) -> &'static str {
		match self {
			Self::Nda => "NDA_Moving_Average",
			Self::India => "INDIA_Moving_Average",
			Self::Others => "Others_Moving_Average",
		}
	}
}

impl fmt::Display for Party {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.column())
	}
}

impl FromStr for Party {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		match s.trim() {
			"NDA" => Ok(Self::Nda),
			// The scraped tables are not consistent about the trailing dot.
			"I.N.D.I.A." | "I.N.D.I.A" | "INDIA" => Ok(Self::India),
			"Others" | "OTHERS" => Ok(Self::Others),
			party => Err(Error::InvalidParty(party.to_string())),
		}
	}
}

/// How the rescaled running average is turned into whole seats.
#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingRule {
	/// Round every party on its own, ties to even. The row total may drift from the seat
	/// total by up to one seat less than the number of parties.
	#[default]
	HalfEven,
	/// Floor every party and hand the remaining seats to the largest fractional parts.
	/// The row total always equals the seat total.
	LargestRemainder,
}

/// Coefficients of the overall poll quality blend.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct QualityWeights {
	pub recency: f64,
	pub agency: f64,
	pub sample_size: f64,
	pub margin_of_error: f64,
}

impl Default for QualityWeights {
	fn default() -> Self {
		Self { recency: 0.4, agency: 0.25, sample_size: 0.3, margin_of_error: 0.05 }
	}
}

impl QualityWeights {
	pub fn sum(&self) -> f64 {
		self.recency + self.agency + self.sample_size + self.margin_of_error
	}

	/// Every weight finite and non-negative, all of them summing to one.
	pub fn validate(&self) -> Result<(), Error> {
		let weights = [self.recency, self.agency, self.sample_size, self.margin_of_error];
		if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
			return Err(Error::InvalidWeights(format!("`{self}` has a negative or undefined weight")));
		}
		if (self.sum() - 1.0).abs() > 1e-9 {
			return Err(Error::InvalidWeights(format!("weights must sum to 1.0, got {}", self.sum())));
		}
		Ok(())
	}
}

impl FromStr for QualityWeights {
	type Err = String;

	/// Parses `key=value` pairs separated by commas. Keys that are not named keep their
	/// default value; the resulting weights must sum to one.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut weights = Self::default();

		for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
			let (key, value) =
				pair.split_once('=').ok_or_else(|| format!("expected `key=value`, got `{pair}`"))?;
			let value: f64 = value
				.trim()
				.parse()
				.map_err(|e| format!("weight `{}` is not a number: {e}", value.trim()))?;
			if !value.is_finite() || value < 0.0 {
				return Err(format!("weight `{key}` must be a non-negative number"));
			}

			match key.trim() {
				"recency" => weights.recency = value,
				"agency" => weights.agency = value,
				"sample-size" => weights.sample_size = value,
				"margin-of-error" => weights.margin_of_error = value,
				other => return Err(format!("unknown weight `{other}`")),
			}
		}

		weights.validate().map_err(|e| e.to_string())?;
		Ok(weights)
	}
}

impl fmt::Display for QualityWeights {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"recency={},agency={},sample-size={},margin-of-error={}",
			self.recency, self.agency, self.sample_size, self.margin_of_error
		)
	}
}
