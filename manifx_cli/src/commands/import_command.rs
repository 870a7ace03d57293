use std::{path::PathBuf, sync::Arc};

use clap::Args;
use manifx::{
  ManifestService,
  core::{FieldTags, ManifestError, SystemClock},
  dicom::read_series_object,
  registry::NoQuarantine,
};

use crate::{
  args::OutputArgs,
  utils::{self, ProcessFileError},
};

pub const ABOUT: &str = "Builds the import manifest of the DICOM series in \
  one or more directories, as received before de-identification";

#[derive(Args)]
pub struct ImportArgs {
  #[arg(
    required = true,
    help_heading = "Input",
    help = "Directories to recursively search for DICOM P10 files."
  )]
  directories: Vec<PathBuf>,

  #[command(flatten)]
  output: OutputArgs,
}

pub fn run(args: &ImportArgs, threads: usize) -> Result<(), ()> {
  let service = ManifestService::in_memory(
    FieldTags::DEFAULT,
    Arc::new(NoQuarantine),
    Arc::new(SystemClock),
  );

  utils::process_dicom_files(
    &args.directories,
    threads,
    "building import manifest",
    |_, path| {
      let object = read_series_object(path).map_err(ProcessFileError::Read)?;
      service.log_import(&object);

      Ok(())
    },
  )?;

  let bytes = service
    .render_import(args.output.format.into())
    .map_err(|e| e.print("rendering import manifest"))?;

  utils::write_output(&args.output.output_filename, &bytes).map_err(|e| {
    utils::print_io_error(
      &e,
      "writing import manifest",
      &args.output.output_filename,
    )
  })
}
