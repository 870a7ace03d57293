use std::sync::Arc;

use clap::Args;
use manifx::{
  ManifestService,
  core::{ManifestError, SystemClock},
  registry::NoQuarantine,
};

use crate::{
  args::{OutputArgs, StoreArgs},
  utils,
};

pub const ABOUT: &str = "Prints the export history of every series recorded \
  in a history store";

#[derive(Args)]
pub struct HistoryArgs {
  #[command(flatten)]
  store: StoreArgs,

  #[arg(
    long,
    help_heading = "Output",
    help = "Whether to include the original identifying values in the output.",
    default_value_t = false
  )]
  phi: bool,

  #[arg(
    long,
    help_heading = "Output",
    help = "Whether to include the dates of each series' first and last \
      export in the output.",
    default_value_t = false
  )]
  dates: bool,

  #[command(flatten)]
  output: OutputArgs,
}

pub fn run(args: &HistoryArgs) -> Result<(), ()> {
  let config = args.store.require_config()?;

  let service = ManifestService::from_config(
    &config,
    Arc::new(NoQuarantine),
    Arc::new(SystemClock),
  )
  .map_err(|e| e.print("loading configuration"))?;

  let result = service
    .render_history(args.output.format.into(), args.phi, args.dates)
    .map_err(|e| e.print("rendering history"))
    .and_then(|bytes| {
      utils::write_output(&args.output.output_filename, &bytes).map_err(|e| {
        utils::print_io_error(
          &e,
          "writing history",
          &args.output.output_filename,
        )
      })
    });

  service.shutdown();

  result
}
