//! The persistent history of exported series.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  sync::Arc,
};

use manifx_core::{Clock, Entry, SeriesObject, field_value, sorted_entries};
use manifx_registry::EntrySource;
use parking_lot::Mutex;

use crate::{HistoryError, lmdb_index::LmdbIndex};

/// The default LMDB map size: 64 MiB.
///
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// A persistent map from series instance UID to a history [`Entry`] holding
/// the number of instances exported and the first and last export times.
///
/// History entries are only changed by [`HistoryStore::record_export()`]. The
/// first export of a series seeds its history entry from the manifest entry
/// for the series, which carries the original identifying values.
///
/// If the backing LMDB environment can't be opened then the store logs a
/// warning and keeps its history in memory for the life of the process.
///
pub struct HistoryStore {
  backend: Mutex<Backend>,
  location: Option<StoreLocation>,
  clock: Arc<dyn Clock>,
}

#[derive(Clone, Debug)]
struct StoreLocation {
  path: PathBuf,
  map_size: usize,
}

enum Backend {
  Lmdb(LmdbIndex),
  Memory(BTreeMap<String, Entry>),
}

impl HistoryStore {
  /// Opens the history store in the given directory, creating it if needed.
  /// On failure the store falls back to an empty in-memory history.
  ///
  pub fn open(path: &Path, map_size: usize, clock: Arc<dyn Clock>) -> Self {
    let location = StoreLocation {
      path: path.to_path_buf(),
      map_size,
    };

    let backend = open_backend(&location);

    Self {
      backend: Mutex::new(backend),
      location: Some(location),
      clock,
    }
  }

  /// Creates a history store that is never persisted.
  ///
  pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
    Self {
      backend: Mutex::new(Backend::Memory(BTreeMap::new())),
      location: None,
      clock,
    }
  }

  /// Returns whether history is currently being written to disk.
  ///
  pub fn is_persistent(&self) -> bool {
    matches!(*self.backend.lock(), Backend::Lmdb(_))
  }

  /// The directory holding the store, if it was opened from one.
  ///
  pub fn path(&self) -> Option<&Path> {
    self.location.as_ref().map(|location| location.path.as_path())
  }

  /// Records the export of one instance.
  ///
  /// If the instance's series already has a history entry then its count is
  /// incremented and its last export time set to now. Otherwise the entry for
  /// the series is looked up in `source` and used to seed a new history
  /// entry, with a first export time of now and a count of one.
  ///
  /// When neither exists the history is left unchanged, a warning listing the
  /// current manifest keys is logged, and
  /// [`HistoryError::MissingSourceEntry`] is returned. This can happen if the
  /// export races the first log of the same series.
  ///
  pub fn record_export(
    &self,
    object: &dyn SeriesObject,
    source: &dyn EntrySource,
  ) -> Result<(), HistoryError> {
    let sop_instance_uid = field_value(object.sop_instance_uid());
    let series_instance_uid = field_value(object.series_instance_uid());

    let mut backend = self.backend.lock();

    let existing = match backend.get(&series_instance_uid) {
      Ok(entry) => entry,
      Err(e) => {
        tracing::warn!(
          sop_instance_uid = %sop_instance_uid,
          series_instance_uid = %series_instance_uid,
          error = %e,
          "Unable to read from the history store"
        );
        return Err(e);
      }
    };

    let mut entry = match existing.or_else(|| {
      source
        .entry(&series_instance_uid)
        .map(|entry| entry.history_seed())
    }) {
      Some(entry) => entry,

      None => {
        let registry_size = source.len();

        tracing::warn!(
          sop_instance_uid = %sop_instance_uid,
          series_instance_uid = %series_instance_uid,
          registry_size,
          "Unable to log exported instance in the history store"
        );
        for key in source.keys() {
          tracing::info!(key = %key, "Manifest key");
        }

        return Err(HistoryError::MissingSourceEntry {
          sop_instance_uid,
          series_instance_uid,
          registry_size,
        });
      }
    };

    entry.add_export(self.clock.now_millis());

    if let Err(e) = backend.put(&series_instance_uid, entry) {
      tracing::warn!(
        sop_instance_uid = %sop_instance_uid,
        series_instance_uid = %series_instance_uid,
        error = %e,
        "Unable to write to the history store"
      );
      return Err(e);
    }

    Ok(())
  }

  /// Returns a copy of the history entry for a series.
  ///
  pub fn entry(&self, series_instance_uid: &str) -> Option<Entry> {
    self.backend.lock().get(series_instance_uid).ok().flatten()
  }

  /// Returns the number of series in the history.
  ///
  pub fn len(&self) -> usize {
    match &*self.backend.lock() {
      Backend::Lmdb(index) => index.len().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Unable to read from the history store");
        0
      }),
      Backend::Memory(entries) => entries.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns copies of all history entries sorted by patient ID then series
  /// instance UID, with original identifying values only included when
  /// `include_phi` is set.
  ///
  pub fn snapshot(&self, include_phi: bool) -> Vec<Entry> {
    match &*self.backend.lock() {
      Backend::Lmdb(index) => match index.entries() {
        Ok(entries) => sorted_entries(&entries, include_phi),
        Err(e) => {
          tracing::warn!(error = %e, "Unable to read from the history store");
          vec![]
        }
      },

      Backend::Memory(entries) => {
        sorted_entries(entries.values(), include_phi)
      }
    }
  }

  /// Deletes the whole history. A store that was opened from a directory has
  /// the directory removed and a new empty store created in its place.
  ///
  pub fn clear(&self) {
    let mut backend = self.backend.lock();

    let Some(location) = &self.location else {
      *backend = Backend::Memory(BTreeMap::new());
      return;
    };

    let previous =
      std::mem::replace(&mut *backend, Backend::Memory(BTreeMap::new()));
    if let Backend::Lmdb(index) = previous
      && let Err(e) = index.close()
    {
      tracing::debug!(error = %e, "Unable to sync the history store");
    }

    if let Err(e) = std::fs::remove_dir_all(&location.path)
      && e.kind() != std::io::ErrorKind::NotFound
    {
      tracing::warn!(
        path = %location.path.display(),
        error = %e,
        "Unable to delete the history store"
      );
    }

    *backend = open_backend(location);

    tracing::info!(path = %location.path.display(), "Cleared history");
  }

  /// Syncs and closes the backing environment. Failures are logged and
  /// otherwise ignored. After shutdown the store behaves as an empty
  /// in-memory store.
  ///
  pub fn shutdown(&self) {
    let previous = std::mem::replace(
      &mut *self.backend.lock(),
      Backend::Memory(BTreeMap::new()),
    );

    if let Backend::Lmdb(index) = previous {
      match index.close() {
        Ok(()) => tracing::debug!("Closed history store"),
        Err(e) => tracing::debug!(
          error = %e,
          "Unable to sync and close the history store"
        ),
      }
    }
  }
}

impl Backend {
  fn get(
    &self,
    series_instance_uid: &str,
  ) -> Result<Option<Entry>, HistoryError> {
    match self {
      Backend::Lmdb(index) => index.get(series_instance_uid),
      Backend::Memory(entries) => {
        Ok(entries.get(series_instance_uid).cloned())
      }
    }
  }

  fn put(
    &mut self,
    series_instance_uid: &str,
    entry: Entry,
  ) -> Result<(), HistoryError> {
    match self {
      Backend::Lmdb(index) => index.put(series_instance_uid, &entry),
      Backend::Memory(entries) => {
        entries.insert(series_instance_uid.to_string(), entry);
        Ok(())
      }
    }
  }
}

fn open_backend(location: &StoreLocation) -> Backend {
  match LmdbIndex::open(&location.path, location.map_size) {
    Ok(index) => {
      tracing::debug!(path = %location.path.display(), "Opened history store");
      Backend::Lmdb(index)
    }

    Err(e) => {
      tracing::warn!(
        path = %location.path.display(),
        error = %e,
        "Unable to open the history store, history will not be persisted"
      );
      Backend::Memory(BTreeMap::new())
    }
  }
}
