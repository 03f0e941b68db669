#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin;
use seat_projector::prelude::*;
use std::{
	fs,
	path::{Path, PathBuf},
};

pub const POLLS: &str = "\
Polling agency,Date published,Sample size,Margin of Error,NDA,I.N.D.I.A.,Others,Lead
ABP News-CVoter,December 2023[4],\"1,35,000\",±3%,290-330,180-190,35-61,125
India Today-Axis,2024-02-08,\"35,801\",± 2.5%,335,166,42,169
Times Now-ETG,15 March 2024,\"1,61,000\",±3%,358,152,33[a],206
NDTV-CSDS,2024-04-10,\"10,019\",±5%,300,200,43,100
";

pub const RANKINGS: &str = "\
Polling agency,Ranking
CVoter,0.8
Axis,0.9
ETG,0.7
";

pub const SKEW: &str = "\
Party,Adjusted Seat Skew
NDA,-5
I.N.D.I.A.,5
BSP,1
";

pub const INITIAL: &str = "\
Party,Seat Projection
NDA,272
I.N.D.I.A.,200
Others,71
";

pub const STATE_POLLS: &str = "\
States,Polling agency,Date published,Sample size,Margin of Error,NDA,I.N.D.I.A.,Others,Lead
Kerala,Axis,2024-03-01,\"1,000\",±3%,1,10,9,
Bihar,CVoter,2024-03-01,\"2,000\",±3%,10,4,1,6
Kerala,Axis,2024-03-03,1000,±3%,1,10,9,
Bihar,CVoter,2024-03-06,\"2,000\",±3%,20,30,0,10
Goa,ETG,2024-03-01,500,3,,,,
";

pub fn init_logger() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.try_init();
}

pub fn seat_projector() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::new(cargo_bin(env!("CARGO_PKG_NAME")));
	for var in ["ELECTION_DATE", "DATA_DIR", "OUTPUT_DIR", "METRICS_FILE"] {
		cmd.env_remove(var);
	}
	cmd
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, contents).unwrap();
	path
}

/// Populate `dir` with every input table under its conventional name.
pub fn write_data_dir(dir: &Path) {
	write_file(dir, POLLS_FILE, POLLS);
	write_file(dir, RANKINGS_FILE, RANKINGS);
	write_file(dir, SKEW_FILE, SKEW);
	write_file(dir, INITIAL_FILE, INITIAL);
	write_file(dir, STATE_POLLS_FILE, STATE_POLLS);
}

/// Header and records of a written CSV file.
pub fn read_csv(path: &Path) -> anyhow::Result<(Vec<String>, Vec<Vec<String>>)> {
	let mut reader = csv::Reader::from_path(path)?;
	let headers = reader.headers()?.iter().map(ToOwned::to_owned).collect();
	let mut rows = Vec::new();
	for record in reader.records() {
		rows.push(record?.iter().map(ToOwned::to_owned).collect());
	}
	Ok((headers, rows))
}

pub fn column(headers: &[String], name: &str) -> usize {
	headers
		.iter()
		.position(|h| h == name)
		.unwrap_or_else(|| panic!("column `{name}` expected in {headers:?}"))
}
