use std::{
  fs::File,
  io::Write,
  path::{Path, PathBuf},
};

use manifx::{
  core::{ManifestError, print_error_lines},
  dicom::{DicomReadError, is_dicom_file},
};
use rayon::iter::{ParallelBridge, ParallelIterator};

/// Creates a Rayon thread pool with the specified number of threads.
///
pub fn create_thread_pool(
  threads: usize,
) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
  rayon::ThreadPoolBuilder::new().num_threads(threads).build()
}

type WalkItem = Result<(PathBuf, PathBuf), walkdir::Error>;

/// Lists the files under the given directories, recursively, along with the
/// directory each was found under.
///
pub fn walk_files(
  directories: &[PathBuf],
) -> impl Iterator<Item = WalkItem> + Send + '_ {
  directories.iter().flat_map(|dir| {
    walkdir::WalkDir::new(dir)
      .sort_by_file_name()
      .into_iter()
      .filter_map(move |entry| match entry {
        Ok(entry) if entry.file_type().is_file() => {
          Some(Ok((dir.clone(), entry.path().to_path_buf())))
        }
        Ok(_) => None,
        Err(e) => Some(Err(e)),
      })
  })
}

/// Writes bytes to the given path. The path "-" is interpreted as writing to
/// stdout.
///
pub fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
  if path == Path::new("-") {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()
  } else {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.flush()
  }
}

/// Prints an I/O error that occurred while performing a task.
///
pub fn print_io_error(
  error: &std::io::Error,
  task_description: &str,
  path: &Path,
) {
  print_error_lines(&[
    format!("I/O error {task_description}"),
    String::new(),
    format!("  Path: {}", path.display()),
    format!("  Error: {error}"),
  ]);
}

/// An error that stops the processing of a set of DICOM files.
///
pub enum ProcessFileError {
  Walk(walkdir::Error),
  Read(DicomReadError),
}

impl ProcessFileError {
  pub fn print(&self, task_description: &str) {
    match self {
      ProcessFileError::Walk(e) => {
        print_error_lines(&[format!("Error {task_description}: {e}")])
      }
      ProcessFileError::Read(e) => e.print(task_description),
    }
  }
}

/// Calls `process` on every DICOM P10 file found under the given directories,
/// using a thread pool. Files that aren't DICOM P10 files are skipped. The
/// first error stops processing and is printed to stderr.
///
pub fn process_dicom_files<F>(
  directories: &[PathBuf],
  threads: usize,
  task_description: &str,
  process: F,
) -> Result<(), ()>
where
  F: Fn(&Path, &Path) -> Result<(), ProcessFileError> + Sync,
{
  let thread_pool = create_thread_pool(threads).map_err(|e| {
    print_error_lines(&[format!("Error creating thread pool: {e}")]);
  })?;

  let result = thread_pool.install(|| {
    walk_files(directories).par_bridge().try_for_each(|item| {
      let (directory, path) = item.map_err(ProcessFileError::Walk)?;

      if !is_dicom_file(&path) {
        return Ok(());
      }

      process(&directory, &path)
    })
  });

  result.map_err(|e| e.print(task_description))
}
