//! Entry point for manifx's CLI tool.

mod args;
mod commands;
mod utils;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
  history_command, import_command, manifest_command, reset_history_command,
};

#[derive(Parser)]
#[command(
  name = "manifx",
  bin_name = "manifx",
  version = env!("CARGO_PKG_VERSION"),
  about = "manifx is a CLI tool for building manifests and export histories \
    of de-identified DICOM series",
  max_term_width = 80
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  #[arg(
    long,
    global = true,
    default_value = "warn",
    help = "The log filter applied to diagnostic output written to stderr, \
      e.g. 'info' or 'manifx_history=debug'."
  )]
  log_level: String,

  #[arg(
    long,
    global = true,
    help = "The number of threads to use to perform work.",
    default_value_t = rayon::current_num_threads()
  )]
  threads: usize,
}

#[derive(Subcommand)]
enum Commands {
  #[command(about = manifest_command::ABOUT)]
  Manifest(manifest_command::ManifestArgs),

  #[command(about = import_command::ABOUT)]
  Import(import_command::ImportArgs),

  #[command(about = history_command::ABOUT)]
  History(history_command::HistoryArgs),

  #[command(about = reset_history_command::ABOUT)]
  ResetHistory(reset_history_command::ResetHistoryArgs),
}

fn main() -> Result<(), ()> {
  let cli = Cli::parse();

  let filter = EnvFilter::try_new(&cli.log_level)
    .unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Commands::Manifest(args) => manifest_command::run(&args, cli.threads),
    Commands::Import(args) => import_command::run(&args, cli.threads),
    Commands::History(args) => history_command::run(&args),
    Commands::ResetHistory(args) => reset_history_command::run(&args),
  }
}
