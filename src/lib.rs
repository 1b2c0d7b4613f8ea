pub mod config;
pub mod draw;
pub mod error;
pub mod logging;
pub mod rebuys;
pub mod roster;
pub mod shuffle;

pub use draw::{DrawResult, SeatingRule, Table, TableId, draw, draw_roster, partition};
pub use error::{ConfigError, DrawError, RebuyError};
pub use roster::{GuestList, Member, Participant, Roster, collect_roster};
