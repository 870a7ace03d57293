use std::sync::Arc;

use clap::Args;
use manifx::{
  ManifestService,
  core::{ManifestError, SystemClock},
  registry::NoQuarantine,
};

use crate::args::StoreArgs;

pub const ABOUT: &str = "Deletes every series recorded in a history store";

#[derive(Args)]
pub struct ResetHistoryArgs {
  #[command(flatten)]
  store: StoreArgs,
}

pub fn run(args: &ResetHistoryArgs) -> Result<(), ()> {
  let config = args.store.require_config()?;

  let service = ManifestService::from_config(
    &config,
    Arc::new(NoQuarantine),
    Arc::new(SystemClock),
  )
  .map_err(|e| e.print("loading configuration"))?;

  let series_count = service.history().len();

  service.clear_history();
  service.shutdown();

  println!("Deleted the history of {series_count} series");

  Ok(())
}
