use rand::Rng;
use serde::de::{Error as _, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DrawError;
use crate::logging;
use crate::roster::{Member, Participant, Roster, collect_roster};
use crate::shuffle::shuffled;

/// Rosters larger than this get a third table.
pub const THIRD_TABLE_THRESHOLD: usize = 18;

pub const MAX_TABLES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub u8);

impl TableId {
	pub fn key(&self) -> String {
		format!("mesa_{}", self.0)
	}

	pub fn label(&self) -> String {
		format!("Mesa {}", self.0)
	}

	pub fn from_key(key: &str) -> Option<Self> {
		let n: u8 = key.strip_prefix("mesa_")?.parse().ok()?;
		(1..=MAX_TABLES).contains(&n).then_some(TableId(n))
	}
}

impl std::fmt::Display for TableId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.label())
	}
}

/// How the shuffled roster is cut once the table count is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatingRule {
	/// Always cut at `ceil(n / 2)`. With three tables the third one is left
	/// with whatever lies past `2 * ceil(n / 2)`, which is nothing.
	#[default]
	Halves,
	/// Cut at `ceil(n / 3)` when three tables are in play.
	Balanced,
}

impl std::fmt::Display for SeatingRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SeatingRule::Halves => write!(f, "halves"),
			SeatingRule::Balanced => write!(f, "balanced"),
		}
	}
}

impl std::str::FromStr for SeatingRule {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"halves" => Ok(SeatingRule::Halves),
			"balanced" => Ok(SeatingRule::Balanced),
			other => Err(format!("unknown seating rule '{}' (expected halves or balanced)", other)),
		}
	}
}

pub fn table_count(roster_len: usize) -> usize {
	if roster_len > THIRD_TABLE_THRESHOLD { 3 } else { 2 }
}

pub fn table_size(roster_len: usize, rule: SeatingRule) -> usize {
	match (rule, table_count(roster_len)) {
		(SeatingRule::Balanced, 3) => roster_len.div_ceil(3),
		_ => roster_len.div_ceil(2),
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAssignment {
	#[serde(rename = "pos")]
	pub position: usize,
	#[serde(rename = "jogador")]
	pub name: String,
	#[serde(skip)]
	pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
	pub id: TableId,
	pub seats: Vec<SeatAssignment>,
}

impl Table {
	fn seat(id: TableId, participants: &[Participant]) -> Self {
		let seats = participants
			.iter()
			.enumerate()
			.map(|(i, p)| SeatAssignment {
				position: i + 1,
				name: p.name.clone(),
				id: p.id.clone(),
			})
			.collect();
		Self { id, seats }
	}

	pub fn len(&self) -> usize {
		self.seats.len()
	}

	pub fn is_empty(&self) -> bool {
		self.seats.is_empty()
	}

	pub fn names(&self) -> Vec<&str> {
		self.seats.iter().map(|s| s.name.as_str()).collect()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrawResult {
	tables: Vec<Table>,
}

impl DrawResult {
	pub fn tables(&self) -> &[Table] {
		&self.tables
	}

	pub fn table(&self, id: TableId) -> Option<&Table> {
		self.tables.iter().find(|t| t.id == id)
	}

	pub fn seated(&self) -> usize {
		self.tables.iter().map(Table::len).sum()
	}

	pub fn summary(&self) -> String {
		self.tables
			.iter()
			.map(|t| format!("{}={}", t.id.key(), t.len()))
			.collect::<Vec<_>>()
			.join(" ")
	}

	pub fn to_json(&self) -> Result<String, DrawError> {
		serde_json::to_string_pretty(self).map_err(|e| DrawError::Encode(e.to_string()))
	}

	/// Strict decoder for the `{"mesa_1": [{"pos": 1, "jogador": ..}], ..}`
	/// payload. Any other nesting is rejected.
	pub fn from_json(json: &str) -> Result<Self, DrawError> {
		serde_json::from_str(json).map_err(|e| DrawError::Decode(e.to_string()))
	}
}

/// Cuts an already shuffled roster into tables. Pure; an empty input gives
/// two empty tables.
pub fn partition(order: &[Participant], rule: SeatingRule) -> DrawResult {
	let n = order.len();
	let size = table_size(n, rule);
	let count = table_count(n);

	let tables = (0..count)
		.map(|i| {
			let start = (i * size).min(n);
			// the third table takes everything left over
			let end = if i + 1 == count && count == 3 {
				n
			} else {
				((i + 1) * size).min(n)
			};
			Table::seat(TableId(i as u8 + 1), &order[start..end])
		})
		.collect();

	DrawResult { tables }
}

/// Shuffles a roster and seats it.
pub fn draw_roster<R: Rng>(roster: &Roster, rule: SeatingRule, rng: &mut R) -> Result<DrawResult, DrawError> {
	if roster.is_empty() {
		logging::draw::empty_roster();
		return Err(DrawError::EmptyRoster);
	}

	let order = shuffled(roster.participants(), rng);
	let result = partition(&order, rule);
	logging::draw::tables_drawn(roster.len(), rule, &result.summary());
	Ok(result)
}

/// Builds the roster from confirmed members and guest names, then draws.
pub fn draw<S: AsRef<str>, R: Rng>(
	members: &[Member],
	guests: &[S],
	rule: SeatingRule,
	rng: &mut R,
) -> Result<DrawResult, DrawError> {
	let roster = collect_roster(members, guests);
	logging::draw::roster_collected(members.len(), roster.len());
	draw_roster(&roster, rule, rng)
}

impl Serialize for DrawResult {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.tables.len()))?;
		for table in &self.tables {
			map.serialize_entry(&table.id.key(), &table.seats)?;
		}
		map.end()
	}
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireSeat {
	pos: usize,
	jogador: String,
}

struct DrawResultVisitor;

impl<'de> Visitor<'de> for DrawResultVisitor {
	type Value = DrawResult;

	fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "a map of mesa_N keys to seat lists")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DrawResult, A::Error> {
		let mut tables: Vec<Table> = Vec::new();

		while let Some(key) = access.next_key::<String>()? {
			let id = TableId::from_key(&key)
				.ok_or_else(|| A::Error::custom(format!("unexpected table key '{}'", key)))?;
			if tables.iter().any(|t| t.id == id) {
				return Err(A::Error::custom(format!("duplicate table key '{}'", key)));
			}

			let mut seats: Vec<SeatAssignment> = access
				.next_value::<Vec<WireSeat>>()?
				.into_iter()
				.map(|s| SeatAssignment { position: s.pos, name: s.jogador, id: None })
				.collect();
			seats.sort_by_key(|s| s.position);

			for (i, seat) in seats.iter().enumerate() {
				if seat.position != i + 1 {
					return Err(A::Error::custom(format!(
						"{} seat positions must run 1..{} without gaps, found {}",
						key,
						seats.len(),
						seat.position
					)));
				}
			}

			tables.push(Table { id, seats });
		}
		tables.sort_by_key(|t| t.id);

		Ok(DrawResult { tables })
	}
}

impl<'de> Deserialize<'de> for DrawResult {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(DrawResultVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn roster_of(n: usize) -> Vec<Participant> {
		(1..=n).map(|i| Participant::guest(format!("P{}", i))).collect()
	}

	fn sizes(result: &DrawResult) -> Vec<usize> {
		result.tables().iter().map(Table::len).collect()
	}

	#[test]
	fn test_table_count_threshold() {
		assert_eq!(table_count(18), 2);
		assert_eq!(table_count(19), 3);
		assert_eq!(table_count(0), 2);
	}

	#[test]
	fn test_partition_eighteen_two_tables() {
		let result = partition(&roster_of(18), SeatingRule::Halves);
		assert_eq!(sizes(&result), vec![9, 9]);
	}

	#[test]
	fn test_partition_odd_second_table_shorter() {
		let result = partition(&roster_of(7), SeatingRule::Halves);
		assert_eq!(sizes(&result), vec![4, 3]);
		assert_eq!(result.tables()[0].names(), vec!["P1", "P2", "P3", "P4"]);
		assert_eq!(result.tables()[1].names(), vec!["P5", "P6", "P7"]);
	}

	#[test]
	fn test_partition_halves_third_table_is_empty() {
		let result = partition(&roster_of(19), SeatingRule::Halves);
		assert_eq!(sizes(&result), vec![10, 9, 0]);

		let result = partition(&roster_of(20), SeatingRule::Halves);
		assert_eq!(sizes(&result), vec![10, 10, 0]);
	}

	#[test]
	fn test_partition_balanced_three_tables() {
		let result = partition(&roster_of(19), SeatingRule::Balanced);
		assert_eq!(sizes(&result), vec![7, 7, 5]);

		let result = partition(&roster_of(27), SeatingRule::Balanced);
		assert_eq!(sizes(&result), vec![9, 9, 9]);
	}

	#[test]
	fn test_partition_balanced_matches_halves_below_threshold() {
		for n in 0..=18 {
			assert_eq!(
				partition(&roster_of(n), SeatingRule::Balanced),
				partition(&roster_of(n), SeatingRule::Halves)
			);
		}
	}

	#[test]
	fn test_partition_positions_contiguous() {
		for rule in [SeatingRule::Halves, SeatingRule::Balanced] {
			for n in 0..40 {
				let result = partition(&roster_of(n), rule);
				assert_eq!(result.seated(), n);
				for table in result.tables() {
					let positions: Vec<usize> = table.seats.iter().map(|s| s.position).collect();
					assert_eq!(positions, (1..=table.len()).collect::<Vec<_>>());
				}
			}
		}
	}

	#[test]
	fn test_partition_empty() {
		let result = partition(&[], SeatingRule::Halves);
		assert_eq!(sizes(&result), vec![0, 0]);
	}

	#[test]
	fn test_draw_empty_roster_rejected() {
		let mut rng = StdRng::seed_from_u64(1);
		let guests: [&str; 1] = ["  "];
		let err = draw(&[], &guests, SeatingRule::Halves, &mut rng).unwrap_err();
		assert!(matches!(err, DrawError::EmptyRoster));
	}

	#[test]
	fn test_draw_keeps_member_ids() {
		let mut rng = StdRng::seed_from_u64(3);
		let members = vec![Member::new("1", "Pietro"), Member::new("2", "Chico")];
		let result = draw(&members, &["Leo"], SeatingRule::Halves, &mut rng).unwrap();

		let leo = result
			.tables()
			.iter()
			.flat_map(|t| t.seats.iter())
			.find(|s| s.name == "Leo")
			.unwrap();
		assert_eq!(leo.id, None);

		let pietro = result
			.tables()
			.iter()
			.flat_map(|t| t.seats.iter())
			.find(|s| s.name == "Pietro")
			.unwrap();
		assert_eq!(pietro.id.as_deref(), Some("1"));
	}

	#[test]
	fn test_table_id_keys() {
		assert_eq!(TableId(2).key(), "mesa_2");
		assert_eq!(TableId(3).label(), "Mesa 3");
		assert_eq!(TableId::from_key("mesa_1"), Some(TableId(1)));
		assert_eq!(TableId::from_key("mesa_4"), None);
		assert_eq!(TableId::from_key("table_1"), None);
	}

	#[test]
	fn test_seating_rule_from_str() {
		assert_eq!("balanced".parse::<SeatingRule>(), Ok(SeatingRule::Balanced));
		assert!("thirds".parse::<SeatingRule>().is_err());
	}

	#[test]
	fn test_json_wire_shape() {
		let result = partition(&roster_of(3), SeatingRule::Halves);
		let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
		assert_eq!(value["mesa_1"][0]["pos"], 1);
		assert_eq!(value["mesa_1"][1]["jogador"], "P2");
		assert_eq!(value["mesa_2"][0]["jogador"], "P3");
		assert!(value["mesa_1"][0].get("id").is_none());
	}

	#[test]
	fn test_json_decode_payload() {
		let json = r#"{
			"mesa_2": [{"pos": 1, "jogador": "Leo"}],
			"mesa_1": [{"pos": 2, "jogador": "Chico"}, {"pos": 1, "jogador": "Pietro"}]
		}"#;
		let result = DrawResult::from_json(json).unwrap();
		assert_eq!(result.tables()[0].id, TableId(1));
		assert_eq!(result.tables()[0].names(), vec!["Pietro", "Chico"]);
		assert_eq!(result.table(TableId(2)).unwrap().names(), vec!["Leo"]);
	}

	#[test]
	fn test_json_decode_rejects_nested_payload() {
		let json = r#"[{"mesas_load": {"mesa_1": [{"pos": 1, "jogador": "Leo"}]}}]"#;
		assert!(matches!(DrawResult::from_json(json), Err(DrawError::Decode(_))));
	}

	#[test]
	fn test_json_decode_rejects_unknown_key() {
		let json = r#"{"mesa_1": [], "extra": []}"#;
		assert!(DrawResult::from_json(json).is_err());
	}

	#[test]
	fn test_json_decode_rejects_duplicate_key() {
		let json = r#"{"mesa_1": [{"pos": 1, "jogador": "Ana"}], "mesa_1": [{"pos": 1, "jogador": "Bob"}]}"#;
		let err = DrawResult::from_json(json).unwrap_err();
		assert!(matches!(&err, DrawError::Decode(msg) if msg.contains("duplicate table key")));
	}

	#[test]
	fn test_json_decode_rejects_gaps() {
		let json = r#"{"mesa_1": [{"pos": 1, "jogador": "A"}, {"pos": 3, "jogador": "B"}]}"#;
		assert!(DrawResult::from_json(json).is_err());
	}
}
