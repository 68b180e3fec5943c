use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tilemask::tools;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Rasterize GeoJSON or PostGIS features to label tiles
	Rasterize(tools::rasterize::Subcommand),

	/// Filter tiles in a slippy map dir using a csv tiles cover
	Subset(tools::subset::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Rasterize(arguments) => tools::rasterize::run(arguments),
		Commands::Subset(arguments) => tools::subset::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilemask"]).unwrap_err().to_string();
		assert!(err.starts_with("Rasterize vector ground truth into map tile training labels."));
		assert!(err.contains("\nUsage: tilemask [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilemask", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilemask "));
	}

	#[test]
	fn rasterize_subcommand() {
		let err = run_command(vec!["tilemask", "rasterize"]).unwrap_err().to_string();
		assert!(err.starts_with("Rasterize GeoJSON or PostGIS features to label tiles"));
	}

	#[test]
	fn subset_subcommand() {
		let err = run_command(vec!["tilemask", "subset"]).unwrap_err().to_string();
		assert!(err.starts_with("Filter tiles in a slippy map dir using a csv tiles cover"));
	}
}
