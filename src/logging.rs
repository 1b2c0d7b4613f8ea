use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;

struct LogState {
	file: Option<std::fs::File>,
	current_date: String,
	dir: Option<PathBuf>,
	stage_id: String,
	enabled: bool,
}

static LOG_STATE: Mutex<LogState> = Mutex::new(LogState {
	file: None,
	current_date: String::new(),
	dir: None,
	stage_id: String::new(),
	enabled: true,
});

fn ensure_log_file(state: &mut LogState) {
	let date = Local::now().format("%Y-%m-%d").to_string();
	if state.current_date != date || state.file.is_none() {
		let dir = state.dir.clone().unwrap_or_else(|| PathBuf::from("logs"));
		let _ = fs::create_dir_all(&dir);
		let path = dir.join(format!("apt-poker-{}.log", date));
		if let Ok(file) = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&path)
		{
			state.file = Some(file);
			state.current_date = date;
		}
	}
}

pub fn set_log_dir(dir: impl Into<PathBuf>) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.dir = Some(dir.into());
		state.file = None;
	}
}

pub fn set_enabled(enabled: bool) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.enabled = enabled;
	}
}

/// Tags following lines with the league stage being configured.
pub fn set_stage_id(stage_id: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		state.stage_id = stage_id.to_string();
	}
}

pub fn log(module: &str, log_type: &str, message: &str) {
	if let Ok(mut state) = LOG_STATE.lock() {
		if !state.enabled {
			return;
		}
		ensure_log_file(&mut state);

		let stage_id = if state.stage_id.is_empty() { "--------" } else { &state.stage_id };
		let line = format!(
			"[{}][{}][{}:{}] {}\n",
			Local::now().format("%H:%M:%S%.3f"),
			stage_id,
			module,
			log_type,
			message
		);

		if let Some(ref mut file) = state.file {
			let _ = file.write_all(line.as_bytes());
			let _ = file.flush();
		}
	}
}

pub mod draw {
	use super::log;
	use crate::draw::SeatingRule;

	pub fn roster_collected(members: usize, total: usize) {
		log("Draw", "ROSTER", &format!("members={} guests={} total={}", members, total.saturating_sub(members), total));
	}

	pub fn tables_drawn(players: usize, rule: SeatingRule, summary: &str) {
		log("Draw", "TABLES", &format!("players={} rule={} {}", players, rule, summary));
	}

	pub fn empty_roster() {
		log("Draw", "EMPTY", "no eligible participants, draw skipped");
	}
}

pub mod rebuys {
	use super::log;

	pub fn granted(player: &str, count: u32, max: u32) {
		log("Rebuys", "GRANTED", &format!("{}: {}/{}", player, count, max));
	}

	pub fn refused(player: &str, max: u32) {
		log("Rebuys", "REFUSED", &format!("{}: already at {}", player, max));
	}
}

pub mod config {
	use super::log;

	pub fn loaded(kind: &str, path: &str) {
		log("Config", "LOAD", &format!("{} from {}", kind, path));
	}
}
