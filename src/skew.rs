//! Static, party-keyed correction of raw poll numbers.

use std::collections::BTreeMap;

use crate::{opt::Party, prelude::LOG_TARGET, types::Poll};

/// Signed offsets added to a party's raw number in every poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkewTable(BTreeMap<Party, f64>);

impl SkewTable {
	/// Returns `false` and keeps the existing offset if `party` already has one.
	pub fn insert(&mut self, party: Party, offset: f64) -> bool {
		if self.0.contains_key(&party) {
			return false;
		}
		self.0.insert(party, offset);
		true
	}

	pub fn offset(&self, party: Party) -> Option<f64> {
		self.0.get(&party).copied()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Add each offset to the matching party of every poll. Parties missing from either side
	/// are left alone.
	pub fn apply(&self, polls: &mut [Poll]) {
		for (party, offset) in &self.0 {
			let mut adjusted = 0usize;
			for value in polls.iter_mut().filter_map(|p| p.values.get_mut(party)) {
				*value += offset;
				adjusted += 1;
			}
			log::debug!(target: LOG_TARGET, "Skewed {party} by {offset} in {adjusted} polls");
		}
	}
}

impl FromIterator<(Party, f64)> for SkewTable {
	fn from_iter<I: IntoIterator<Item = (Party, f64)>>(iter: I) -> Self {
		let mut table = Self::default();
		for (party, offset) in iter {
			table.insert(party, offset);
		}
		table
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::prelude::PartyValues;
	use chrono::NaiveDate;

	fn poll(values: &[(Party, f64)]) -> Poll {
		Poll {
			agency: "CVoter".into(),
			agencies: vec!["CVoter".into()],
			published: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
			sample_size: 1000,
			margin_of_error: 3.0,
			values: values.iter().copied().collect::<PartyValues>(),
		}
	}

	#[test]
	fn skew_is_added_to_matching_parties_only() {
		let skew: SkewTable = [(Party::Nda, -10.0), (Party::Others, 2.5)].into_iter().collect();
		let mut polls = vec![
			poll(&[(Party::Nda, 300.0), (Party::India, 200.0), (Party::Others, 43.0)]),
			poll(&[(Party::India, 210.0)]),
		];

		skew.apply(&mut polls);

		assert_eq!(polls[0].values[&Party::Nda], 290.0);
		assert_eq!(polls[0].values[&Party::India], 200.0);
		assert_eq!(polls[0].values[&Party::Others], 45.5);
		assert_eq!(polls[1].values.len(), 1);
		assert_eq!(polls[1].values[&Party::India], 210.0);
	}

	#[test]
	fn first_offset_wins() {
		let mut skew = SkewTable::default();
		assert!(skew.insert(Party::Nda, 1.0));
		assert!(!skew.insert(Party::Nda, 5.0));
		assert_eq!(skew.offset(Party::Nda), Some(1.0));
	}

	#[test]
	fn empty_table_is_a_no_op() {
		let mut polls = vec![poll(&[(Party::Nda, 300.0)])];
		let before = polls.clone();
		SkewTable::default().apply(&mut polls);
		assert_eq!(polls, before);
	}
}
