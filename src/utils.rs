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

use crate::{error::Error, prelude::LOG_TARGET};
use csv::StringRecord;
use serde::Serialize;
use std::{
	collections::HashMap,
	fs::{self, File},
	io::{BufWriter, Read, Write},
	path::Path,
};

/// An input table held in memory, with columns looked up by header name.
#[derive(Debug, Clone)]
pub struct Table {
	name: String,
	columns: Vec<String>,
	header_map: HashMap<String, usize>,
	records: Vec<StringRecord>,
}

impl Table {
	/// Read the CSV file at `path`. The file is closed before this returns.
	pub fn from_path(path: &Path) -> Result<Self, Error> {
		log::debug!(target: LOG_TARGET, "Reading table from {}", path.display());
		let file = File::open(path)
			.map_err(|e| Error::Other(format!("Failed to open {}: {e}", path.display())))?;
		Self::from_reader(path.display().to_string(), file)
	}

	pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, Error> {
		let mut reader = csv::ReaderBuilder::new()
			.flexible(true)
			.trim(csv::Trim::All)
			.from_reader(reader);

		let columns: Vec<String> =
			reader.headers()?.iter().map(normalize_header_name).collect();
		let header_map = columns.iter().enumerate().map(|(idx, c)| (c.clone(), idx)).collect();
		let records = reader.records().collect::<Result<Vec<_>, _>>()?;

		Ok(Self { name: name.into(), columns, header_map, records })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Header names in file order.
	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn has_column(&self, column: &str) -> bool {
		self.header_map.contains_key(column)
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Fails on the first of `columns` that the table lacks.
	pub fn require_columns(&self, columns: &[&str]) -> Result<(), Error> {
		match columns.iter().find(|c| !self.has_column(c)) {
			Some(column) =>
				Err(Error::MissingColumn { table: self.name.clone(), column: column.to_string() }),
			None => Ok(()),
		}
	}

	/// Fails on the first empty cell of `columns`, scanning row by row.
	pub fn require_values(&self, columns: &[&str]) -> Result<(), Error> {
		for row in self.rows() {
			for column in columns {
				row.required(column)?;
			}
		}
		Ok(())
	}

	pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
		// +2: records start after the header and lines are 1-based.
		self.records.iter().enumerate().map(|(idx, record)| Row { table: self, record, line: idx + 2 })
	}
}

/// A borrowed row of a [`Table`].
#[derive(Debug, Copy, Clone)]
pub struct Row<'a> {
	table: &'a Table,
	record: &'a StringRecord,
	line: usize,
}

impl<'a> Row<'a> {
	pub fn line(&self) -> usize {
		self.line
	}

	/// The cell of `column`, `None` if the column is absent or the cell is empty.
	pub fn get(&self, column: &str) -> Option<&'a str> {
		let idx = *self.table.header_map.get(column)?;
		self.record.get(idx).filter(|cell| !cell.is_empty())
	}

	pub fn required(&self, column: &str) -> Result<&'a str, Error> {
		self.get(column).ok_or_else(|| Error::MissingValue {
			table: self.table.name.clone(),
			column: column.to_string(),
			line: self.line,
		})
	}

	/// Reads a required cell through `parse`, reporting failures with their location.
	pub fn parse_with<T>(
		&self,
		column: &str,
		parse: impl FnOnce(&str) -> Result<T, String>,
	) -> Result<T, Error> {
		let cell = self.required(column)?;
		parse(cell).map_err(|reason| self.invalid(column, cell, reason))
	}

	pub fn invalid(&self, column: &str, value: &str, reason: impl Into<String>) -> Error {
		Error::InvalidValue {
			table: self.table.name.clone(),
			column: column.to_string(),
			line: self.line,
			value: value.to_string(),
			reason: reason.into(),
		}
	}
}

fn normalize_header_name(name: &str) -> String {
	// Spreadsheet exports sometimes prefix the first header with a BOM.
	name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Create the missing parent directories of `path`.
pub fn create_parent_dir(path: &Path) -> Result<(), Error> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent).map_err(|e| {
				Error::Other(format!("Failed to create directory {}: {e}", parent.display()))
			})?;
		}
	}
	Ok(())
}

/// Write a CSV file, creating missing parent directories.
pub fn write_csv_file<H, R>(path: &Path, headers: &[H], rows: R) -> Result<(), Error>
where
	H: AsRef<str>,
	R: IntoIterator<Item = Vec<String>>,
{
	create_parent_dir(path)?;

	let mut writer = csv::Writer::from_path(path)?;
	writer.write_record(headers.iter().map(|h| -> &str { h.as_ref() }))?;
	let mut count = 0usize;
	for row in rows {
		writer.write_record(&row)?;
		count += 1;
	}
	writer.flush()?;

	log::info!(target: LOG_TARGET, "Wrote {count} rows to {}", path.display());
	Ok(())
}

/// Write data to a JSON file
pub fn write_data_to_json_file<T>(data: &T, path: &Path) -> Result<(), Error>
where
	T: Serialize,
{
	create_parent_dir(path)?;

	let file = File::create(path)
		.map_err(|e| Error::Other(format!("Failed to create {}: {e}", path.display())))?;
	let mut writer = BufWriter::new(file);
	let json = serde_json::to_string_pretty(data)?;
	writer.write_all(json.as_bytes())?;
	writer.flush()?;

	log::info!(target: LOG_TARGET, "Wrote JSON data to {}", path.display());
	Ok(())
}

/// Formats a score the way it is written to output tables.
pub fn format_score(value: f64) -> String {
	format!("{value:.6}")
}
