use serde::{Deserialize, Serialize};

/// Attendance status a member carries on the players screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
	#[serde(rename = "confirmado")]
	Confirmed,
	#[serde(rename = "falta")]
	Absent,
	#[serde(rename = "convidado")]
	Guest,
}

impl std::fmt::Display for AttendanceStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			AttendanceStatus::Confirmed => write!(f, "confirmado"),
			AttendanceStatus::Absent => write!(f, "falta"),
			AttendanceStatus::Guest => write!(f, "convidado"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
	#[serde(default)]
	pub id: Option<String>,
	pub name: String,
	#[serde(default)]
	pub status: Option<AttendanceStatus>,
}

impl Member {
	pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			name: name.into(),
			status: None,
		}
	}

	pub fn with_status(mut self, status: AttendanceStatus) -> Self {
		self.status = Some(status);
		self
	}

	/// Members without a status were already filtered by the caller. Rows
	/// marked `convidado` go through the guest list instead.
	pub fn is_confirmed(&self) -> bool {
		matches!(self.status, None | Some(AttendanceStatus::Confirmed))
	}
}

/// A seated name. The id is carried through untouched for members and is
/// `None` for guests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
	pub id: Option<String>,
	pub name: String,
}

impl Participant {
	pub fn guest(name: impl Into<String>) -> Self {
		Self { id: None, name: name.into() }
	}
}

impl From<&Member> for Participant {
	fn from(member: &Member) -> Self {
		Self {
			id: member.id.clone(),
			name: member.name.clone(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
	participants: Vec<Participant>,
}

impl Roster {
	pub fn participants(&self) -> &[Participant] {
		&self.participants
	}

	pub fn names(&self) -> Vec<&str> {
		self.participants.iter().map(|p| p.name.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.participants.len()
	}

	pub fn is_empty(&self) -> bool {
		self.participants.is_empty()
	}
}

/// Members in order, then every guest whose trimmed name is non-empty.
/// Duplicated names are kept as distinct participants.
pub fn collect_roster<S: AsRef<str>>(members: &[Member], guests: &[S]) -> Roster {
	let participants = members
		.iter()
		.map(Participant::from)
		.chain(
			guests
				.iter()
				.map(|g| g.as_ref().trim())
				.filter(|g| !g.is_empty())
				.map(Participant::guest),
		)
		.collect();

	Roster { participants }
}

pub fn confirmed_members(members: &[Member]) -> Vec<Member> {
	members.iter().filter(|m| m.is_confirmed()).cloned().collect()
}

/// Guest names typed on the players screen: drafts still being edited and
/// the ones already confirmed for the stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestList {
	drafts: Vec<String>,
	confirmed: Vec<String>,
}

impl GuestList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_confirmed(confirmed: Vec<String>) -> Self {
		Self {
			drafts: Vec::new(),
			confirmed,
		}
	}

	pub fn drafts(&self) -> &[String] {
		&self.drafts
	}

	pub fn confirmed(&self) -> &[String] {
		&self.confirmed
	}

	pub fn add_draft(&mut self) -> usize {
		self.drafts.push(String::new());
		self.drafts.len() - 1
	}

	pub fn update_draft(&mut self, index: usize, value: impl Into<String>) {
		if let Some(slot) = self.drafts.get_mut(index) {
			*slot = value.into();
		}
	}

	pub fn remove_draft(&mut self, index: usize) -> Option<String> {
		if index < self.drafts.len() {
			Some(self.drafts.remove(index))
		} else {
			None
		}
	}

	/// Moves a non-blank draft into the confirmed list. Blank drafts stay put.
	pub fn confirm_draft(&mut self, index: usize) -> Option<String> {
		let name = self.drafts.get(index)?.trim().to_string();
		if name.is_empty() {
			return None;
		}
		self.drafts.remove(index);
		self.confirmed.push(name.clone());
		Some(name)
	}

	pub fn remove_confirmed(&mut self, index: usize) -> Option<String> {
		if index < self.confirmed.len() {
			Some(self.confirmed.remove(index))
		} else {
			None
		}
	}
}
