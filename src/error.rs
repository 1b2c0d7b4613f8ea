use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrawError {
	#[error("no eligible participants to draw")]
	EmptyRoster,

	#[error("failed to encode draw: {0}")]
	Encode(String),

	#[error("malformed draw payload: {0}")]
	Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read {}: {source}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {}: {source}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("config file '{filename}' not found. Searched: {searched}")]
	NotFound { filename: String, searched: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RebuyError {
	#[error("{player} already has the maximum of {max} rebuys")]
	LimitReached { player: String, max: u32 },
}
