use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::draw::SeatingRule;
use crate::error::ConfigError;
use crate::logging;
use crate::rebuys::{MAX_REBUYS, RebuyLedger};
use crate::roster::{Member, Roster, collect_roster, confirmed_members};

pub const CONFIG_FILE: &str = "apt-poker.toml";

fn config_paths(filename: &str) -> Vec<PathBuf> {
	let mut paths = Vec::new();

	if let Some(config_dir) = dirs::config_dir() {
		paths.push(config_dir.join("apt-poker").join(filename));
	}

	paths.push(PathBuf::from("config").join(filename));

	paths
}

fn find_config(filename: &str) -> Option<PathBuf> {
	config_paths(filename).into_iter().find(|p| p.exists())
}

pub fn resolve_config(filename: &str) -> Result<PathBuf, ConfigError> {
	find_config(filename).ok_or_else(|| {
		let searched: Vec<_> = config_paths(filename)
			.iter()
			.map(|p| p.display().to_string())
			.collect();
		ConfigError::NotFound {
			filename: filename.to_string(),
			searched: searched.join(", "),
		}
	})
}

fn read_toml<T, P>(path: P, kind: &str) -> Result<T, ConfigError>
where
	T: for<'de> Deserialize<'de>,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
		path: path.to_path_buf(),
		source,
	})?;

	let parsed = toml::from_str(&content).map_err(|source| ConfigError::Parse {
		path: path.to_path_buf(),
		source,
	})?;

	logging::config::loaded(kind, &path.display().to_string());
	Ok(parsed)
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawConfig {
	#[serde(default)]
	pub seating: SeatingRule,
	#[serde(default)]
	pub seed: Option<u64>,
	#[serde(default = "default_max_rebuys")]
	pub max_rebuys: u32,
	#[serde(default)]
	pub log_dir: Option<PathBuf>,
	#[serde(default = "default_log_enabled")]
	pub log_enabled: bool,
}

fn default_max_rebuys() -> u32 {
	MAX_REBUYS
}

fn default_log_enabled() -> bool {
	true
}

impl Default for DrawConfig {
	fn default() -> Self {
		Self {
			seating: SeatingRule::default(),
			seed: None,
			max_rebuys: default_max_rebuys(),
			log_dir: None,
			log_enabled: default_log_enabled(),
		}
	}
}

impl DrawConfig {
	pub fn rebuy_ledger(&self) -> RebuyLedger {
		RebuyLedger::new(self.max_rebuys)
	}

	/// Points the log file at `log_dir` and switches it on or off.
	pub fn apply_logging(&self) {
		if let Some(dir) = &self.log_dir {
			logging::set_log_dir(dir);
		}
		logging::set_enabled(self.log_enabled);
	}
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DrawConfig, ConfigError> {
	read_toml(path, "config")
}

/// Falls back to defaults when no config file exists anywhere on the search path.
pub fn load_config_auto() -> Result<DrawConfig, ConfigError> {
	match resolve_config(CONFIG_FILE) {
		Ok(path) => load_config(&path),
		Err(ConfigError::NotFound { .. }) => Ok(DrawConfig::default()),
		Err(e) => Err(e),
	}
}

/// Members and guest names for one stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterFile {
	#[serde(default)]
	pub members: Vec<Member>,
	#[serde(default)]
	pub guests: Vec<String>,
}

impl RosterFile {
	pub fn roster(&self) -> Roster {
		collect_roster(&confirmed_members(&self.members), &self.guests)
	}
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<RosterFile, ConfigError> {
	read_toml(path, "roster")
}
