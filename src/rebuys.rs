use std::collections::HashMap;

use crate::error::RebuyError;
use crate::logging;

pub const MAX_REBUYS: u32 = 2;

/// Rebuys taken per player during a stage, capped per player.
#[derive(Debug, Clone)]
pub struct RebuyLedger {
	counts: HashMap<String, u32>,
	max: u32,
}

impl Default for RebuyLedger {
	fn default() -> Self {
		Self::new(MAX_REBUYS)
	}
}

impl RebuyLedger {
	pub fn new(max: u32) -> Self {
		Self {
			counts: HashMap::new(),
			max,
		}
	}

	pub fn max(&self) -> u32 {
		self.max
	}

	pub fn count(&self, player: &str) -> u32 {
		self.counts.get(player).copied().unwrap_or(0)
	}

	pub fn has_max_rebuys(&self, player: &str) -> bool {
		self.count(player) >= self.max
	}

	pub fn add_rebuy(&mut self, player: &str) -> Result<u32, RebuyError> {
		if self.has_max_rebuys(player) {
			logging::rebuys::refused(player, self.max);
			return Err(RebuyError::LimitReached {
				player: player.to_string(),
				max: self.max,
			});
		}

		let count = self.counts.entry(player.to_string()).or_insert(0);
		*count += 1;
		logging::rebuys::granted(player, *count, self.max);
		Ok(*count)
	}

	pub fn total(&self) -> u32 {
		self.counts.values().sum()
	}
}
