use std::{path::PathBuf, sync::Arc};

use clap::Args;
use manifx::{
  ManifestService,
  core::{ManifestError, SeriesObject, SystemClock},
  dicom::read_series_object,
  registry::NoQuarantine,
};

use crate::{
  args::{OutputArgs, StoreArgs},
  utils::{self, ProcessFileError},
};

pub const ABOUT: &str = "Builds the manifest of de-identified DICOM series in \
  one or more directories, and records them in the export history";

#[derive(Args)]
pub struct ManifestArgs {
  #[arg(
    required = true,
    help_heading = "Input",
    help = "Directories to recursively search for de-identified DICOM P10 \
      files."
  )]
  directories: Vec<PathBuf>,

  #[arg(
    long,
    help_heading = "Input",
    help = "A directory holding the original DICOM P10 file of each \
      de-identified file, at the same path relative to this directory as the \
      de-identified file has relative to the input directory it was found in. \
      Original identifying values are read from these files."
  )]
  originals: Option<PathBuf>,

  #[arg(
    long,
    help_heading = "Output",
    help = "Whether to include the original identifying values in the \
      manifest.",
    default_value_t = false
  )]
  phi: bool,

  #[arg(
    long,
    help_heading = "Output",
    help = "Whether to print the manifest's status counters to stderr as \
      JSON.",
    default_value_t = false
  )]
  summarize: bool,

  #[command(flatten)]
  output: OutputArgs,

  #[command(flatten)]
  store: StoreArgs,
}

pub fn run(args: &ManifestArgs, threads: usize) -> Result<(), ()> {
  let config = args.store.load_config().map_err(|e| {
    e.print("loading configuration");
  })?;

  let quarantine = Arc::new(NoQuarantine);
  let clock = Arc::new(SystemClock);

  // Only record exports when a history store location was given
  let record_exports = args.store.is_set();

  let service = if record_exports {
    ManifestService::from_config(&config, quarantine, clock)
  } else {
    config.field_tags().map(|field_tags| {
      ManifestService::in_memory(field_tags, quarantine, clock)
    })
  };

  let service = service.map_err(|e| e.print("loading configuration"))?;

  let result = utils::process_dicom_files(
    &args.directories,
    threads,
    "building manifest",
    |directory, path| {
      let object = read_series_object(path).map_err(ProcessFileError::Read)?;

      let original = match &args.originals {
        Some(originals) => {
          let original_path = path
            .strip_prefix(directory)
            .map(|relative_path| originals.join(relative_path))
            .ok()
            .filter(|original_path| original_path.is_file());

          match original_path {
            Some(original_path) => Some(
              read_series_object(&original_path)
                .map_err(ProcessFileError::Read)?,
            ),
            None => {
              tracing::warn!(
                path = %path.display(),
                "No original file found"
              );
              None
            }
          }
        }

        None => None,
      };

      service.log(
        &object,
        original.as_ref().map(|original| original as &dyn SeriesObject),
      );

      // History failures are already logged by the store and don't stop
      // the remaining files
      if record_exports
        && let Err(e) = service.log_exported_object(&object)
      {
        tracing::debug!(
          path = %path.display(),
          error = %e,
          "Export not recorded in history"
        );
      }

      Ok(())
    },
  );

  let result = result.and_then(|()| {
    let bytes = service
      .render_manifest(args.output.format.into(), args.phi)
      .map_err(|e| e.print("rendering manifest"))?;

    utils::write_output(&args.output.output_filename, &bytes).map_err(|e| {
      utils::print_io_error(
        &e,
        "writing manifest",
        &args.output.output_filename,
      )
    })
  });

  if result.is_ok() && args.summarize {
    match serde_json::to_string_pretty(&service.status()) {
      Ok(json) => eprintln!("{json}"),
      Err(e) => tracing::warn!(error = %e, "Unable to serialize status"),
    }
  }

  service.shutdown();

  result
}
