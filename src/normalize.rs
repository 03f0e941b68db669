//! Normalization of scraped cell text into numbers and dates.
//!
//! Every function returns a human readable reason on failure; the caller attaches the table,
//! column and line before surfacing it as [`crate::error::Error::InvalidValue`].

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::prelude::MONTH_ONLY_DAY;

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex; qed"));
static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex; qed"));
static INT_RANGE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^(\d+)\s*[-–]\s*(\d+)$").expect("valid regex; qed"));

/// Removes citation markers such as `[12]` and surrounding whitespace.
pub fn strip_citations(cell: &str) -> String {
	CITATION.replace_all(cell, "").trim().to_string()
}

/// Sample sizes may carry thousands separators; zero is not a sample.
pub fn parse_sample_size(cell: &str) -> Result<u64, String> {
	let cleaned: String =
		strip_citations(cell).chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
	let size: u64 = cleaned.parse().map_err(|_| "not a whole number".to_string())?;
	if size == 0 {
		return Err("sample size must be at least 1".into());
	}
	Ok(size)
}

/// Takes the first decimal number of the cell, so `±3%` is 3 and `2.5` is 2.5.
pub fn parse_margin_of_error(cell: &str) -> Result<f64, String> {
	let cleaned = strip_citations(cell);
	let number = DECIMAL.find(&cleaned).ok_or_else(|| "contains no number".to_string())?;
	number.as_str().parse().map_err(|e| format!("{e}"))
}

/// Party numbers are plain numbers, possibly comma grouped. A published range `a-b` is
/// replaced by the mean of its bounds, rounded up.
pub fn parse_party_value(cell: &str) -> Result<f64, String> {
	let cleaned: String = strip_citations(cell).chars().filter(|c| *c != ',').collect();

	if let Some(caps) = INT_RANGE.captures(&cleaned) {
		let low: u64 = caps[1].parse().map_err(|_| "range bound too large".to_string())?;
		let high: u64 = caps[2].parse().map_err(|_| "range bound too large".to_string())?;
		let sum = low.checked_add(high).ok_or_else(|| "range bound too large".to_string())?;
		return Ok(sum.div_ceil(2) as f64);
	}

	let value: f64 = cleaned.trim().parse().map_err(|_| "not a number".to_string())?;
	if !value.is_finite() {
		return Err("not a finite number".into());
	}
	Ok(value)
}

/// Reference tables hold plain numbers.
pub fn parse_number(cell: &str) -> Result<f64, String> {
	let value: f64 = strip_citations(cell).parse().map_err(|_| "not a number".to_string())?;
	if !value.is_finite() {
		return Err("not a finite number".into());
	}
	Ok(value)
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y"];
const MONTH_FORMATS: [&str; 2] = ["%d %B %Y", "%d %b %Y"];

/// Accepts ISO dates, day-month-year dates and bare `Month YYYY` (the middle of that month).
pub fn parse_date(cell: &str) -> Result<NaiveDate, String> {
	let cleaned = strip_citations(cell);

	DATE_FORMATS
		.iter()
		.find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
		.or_else(|| {
			let with_day = format!("{MONTH_ONLY_DAY} {cleaned}");
			MONTH_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(&with_day, fmt).ok())
		})
		.ok_or_else(|| "not a recognized date".to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn strip_citations_works() {
		assert_eq!(strip_citations("December 2023[14]"), "December 2023");
		assert_eq!(strip_citations(" 295[a][3] "), "295");
		assert_eq!(strip_citations("CVoter"), "CVoter");
	}

	#[test]
	fn sample_size_drops_separators() {
		assert_eq!(parse_sample_size("1,35,000"), Ok(135000));
		assert_eq!(parse_sample_size("7,500[2]"), Ok(7500));
		assert!(parse_sample_size("0").is_err());
		assert!(parse_sample_size("about 2000").is_err());
	}

	#[test]
	fn margin_of_error_takes_first_number() {
		assert_eq!(parse_margin_of_error("±3%"), Ok(3.0));
		assert_eq!(parse_margin_of_error("± 2.5%"), Ok(2.5));
		assert_eq!(parse_margin_of_error("3-5%"), Ok(3.0));
		assert!(parse_margin_of_error("n/a").is_err());
	}

	#[test]
	fn party_value_ranges_use_rounded_up_mean() {
		assert_eq!(parse_party_value("295-335"), Ok(315.0));
		assert_eq!(parse_party_value("10-15"), Ok(13.0));
		assert_eq!(parse_party_value("1,023"), Ok(1023.0));
		assert_eq!(parse_party_value("42.5[7]"), Ok(42.5));
		assert_eq!(parse_party_value("-3"), Ok(-3.0));
		assert!(parse_party_value("NaN").is_err());
		assert!(parse_party_value("lots").is_err());
	}

	#[test]
	fn oversized_ranges_are_rejected() {
		let max = u64::MAX;
		assert_eq!(parse_party_value(&format!("{max}-{max}")), Err("range bound too large".to_string()));
		assert_eq!(parse_party_value(&format!("1-{max}")), Err("range bound too large".to_string()));
		assert_eq!(parse_party_value("99999999999999999999-1"), Err("range bound too large".to_string()));
		assert_eq!(parse_party_value(&format!("0-{max}")), Ok(max.div_ceil(2) as f64));
	}

	#[test]
	fn dates_in_every_published_shape_parse() {
		assert_eq!(parse_date("2024-03-15"), Ok(date(2024, 3, 15)));
		assert_eq!(parse_date("4 March 2024"), Ok(date(2024, 3, 4)));
		assert_eq!(parse_date("4 Mar 2024"), Ok(date(2024, 3, 4)));
		assert_eq!(parse_date("March 4, 2024"), Ok(date(2024, 3, 4)));
		assert_eq!(parse_date("December 2023[3]"), Ok(date(2023, 12, 15)));
		assert_eq!(parse_date("Feb 2024"), Ok(date(2024, 2, 15)));
		assert!(parse_date("sometime soon").is_err());
	}
}
