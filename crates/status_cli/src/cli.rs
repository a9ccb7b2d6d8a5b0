use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::step::Step;

#[derive(Parser, Debug)]
#[command(name = "statusext")]
#[command(about = "Inspect and simulate extension status channels")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Raise log verbosity (-v debug, -vv trace); STATUSEXT_LOG overrides
	#[arg(short, long, action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the finalized channel layout
	Dump {
		/// Channel configuration file
		#[arg(short, long, value_name = "PATH")]
		config: PathBuf,
	},
	/// Apply mutations to an in-memory holder and report activations
	Simulate {
		/// Channel configuration file
		#[arg(short, long, value_name = "PATH")]
		config: PathBuf,

		/// Mutations as `set:NAME:VALUE`, `add:NAME:VALUE` or `sub:NAME:VALUE`
		#[arg(value_name = "STEP", required = true)]
		steps: Vec<Step>,
	},
	/// Resolve a channel name to its index
	Lookup {
		/// Channel configuration file
		#[arg(short, long, value_name = "PATH")]
		config: PathBuf,

		/// Channel name (case-insensitive)
		name: String,
	},
}
