//! `statusext`: inspect and simulate status channel configurations.

mod cli;
mod commands;
mod step;

use std::io;

use clap::Parser;
use cli::{Cli, Command};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "STATUSEXT_LOG";

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let stdout = io::stdout();
	let mut out = stdout.lock();
	match cli.command {
		Command::Dump { config } => commands::dump(&config, &mut out),
		Command::Simulate { config, steps } => commands::simulate(&config, &steps, &mut out),
		Command::Lookup { config, name } => commands::lookup(&config, &name, &mut out),
	}
}

fn setup_tracing(verbosity: u8) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
		EnvFilter::new(match verbosity {
			0 => "warn",
			1 => "statusext=debug,statusext_registry=debug,statusext_config=debug,statusext_bars=debug,info",
			_ => "trace",
		})
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.init();
}
