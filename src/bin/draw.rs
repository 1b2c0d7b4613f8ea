use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use apt_poker::config::{DrawConfig, load_config, load_config_auto, load_roster};
use apt_poker::draw::{DrawResult, SeatingRule, draw_roster};
use apt_poker::logging;

/// Draws the tables for a league stage.
#[derive(Debug, Parser)]
#[command(name = "apt-draw", version)]
struct Args {
	/// Roster file with [[members]] and guests
	#[arg(short, long)]
	roster: PathBuf,

	/// Config file (defaults to the apt-poker.toml search path)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Seed for a reproducible draw
	#[arg(short, long, env = "APT_DRAW_SEED")]
	seed: Option<u64>,

	/// Seating rule: halves or balanced
	#[arg(long)]
	rule: Option<SeatingRule>,

	/// Stage identifier used to tag log lines
	#[arg(long)]
	stage: Option<String>,

	/// Print the draw as JSON
	#[arg(long)]
	json: bool,
}

fn print_tables(result: &DrawResult) {
	for table in result.tables() {
		println!("{}", table.id.label());
		if table.is_empty() {
			println!("  -");
		}
		for seat in &table.seats {
			println!("  {:>2}. {}", seat.position, seat.name);
		}
		println!();
	}
}

fn run(args: Args) -> Result<(), String> {
	let config: DrawConfig = match &args.config {
		Some(path) => load_config(path),
		None => load_config_auto(),
	}
	.map_err(|e| e.to_string())?;

	config.apply_logging();
	if let Some(stage) = &args.stage {
		logging::set_stage_id(stage);
	}

	let roster_file = load_roster(&args.roster).map_err(|e| e.to_string())?;
	let roster = roster_file.roster();

	let rule = args.rule.unwrap_or(config.seating);
	let mut rng = match args.seed.or(config.seed) {
		Some(s) => StdRng::seed_from_u64(s),
		None => StdRng::from_os_rng(),
	};

	let result = draw_roster(&roster, rule, &mut rng).map_err(|e| e.to_string())?;

	if args.json {
		println!("{}", result.to_json().map_err(|e| e.to_string())?);
	} else {
		print_tables(&result);
	}
	Ok(())
}

fn main() -> ExitCode {
	match run(Args::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Error: {}", e);
			ExitCode::FAILURE
		}
	}
}
