//! The LMDB environment holding the series index.

use std::path::Path;

use heed::types::{SerdeBincode, Str};
use heed::{Database, Env, EnvOpenOptions};
use manifx_core::Entry;

use crate::HistoryError;

/// Name of the database in the environment that maps series instance UIDs to
/// history entries.
///
const SERIES_INDEX: &str = "seriesUIDIndex";

/// Returns the key of a series in the index. LMDB rejects empty keys, so
/// every key carries a prefix and an empty series instance UID still maps to
/// a valid key. The prefix is shared, so key order follows UID order.
///
fn index_key(series_instance_uid: &str) -> String {
  format!("S:{series_instance_uid}")
}

/// An open LMDB environment and its series index. Every write is committed
/// before returning.
///
pub(crate) struct LmdbIndex {
  env: Env,
  series: Database<Str, SerdeBincode<Entry>>,
}

impl LmdbIndex {
  /// Opens the environment in the given directory, creating the directory
  /// and the series index if they don't exist.
  ///
  pub fn open(path: &Path, map_size: usize) -> Result<Self, HistoryError> {
    std::fs::create_dir_all(path)?;

    // SAFETY: the environment is only ever opened through this store, and a
    // store location is owned by a single process.
    let env = unsafe {
      EnvOpenOptions::new()
        .map_size(map_size)
        .max_dbs(1)
        .open(path)?
    };

    let mut wtxn = env.write_txn()?;
    let series = env.create_database::<Str, SerdeBincode<Entry>>(
      &mut wtxn,
      Some(SERIES_INDEX),
    )?;
    wtxn.commit()?;

    Ok(Self { env, series })
  }

  pub fn get(
    &self,
    series_instance_uid: &str,
  ) -> Result<Option<Entry>, HistoryError> {
    let rtxn = self.env.read_txn()?;
    Ok(self.series.get(&rtxn, &index_key(series_instance_uid))?)
  }

  pub fn put(
    &self,
    series_instance_uid: &str,
    entry: &Entry,
  ) -> Result<(), HistoryError> {
    let mut wtxn = self.env.write_txn()?;
    self.series.put(&mut wtxn, &index_key(series_instance_uid), entry)?;
    wtxn.commit()?;

    Ok(())
  }

  /// Returns all entries in key order.
  ///
  pub fn entries(&self) -> Result<Vec<Entry>, HistoryError> {
    let rtxn = self.env.read_txn()?;

    let mut entries = vec![];
    for item in self.series.iter(&rtxn)? {
      let (_, entry) = item?;
      entries.push(entry);
    }

    Ok(entries)
  }

  pub fn len(&self) -> Result<usize, HistoryError> {
    let rtxn = self.env.read_txn()?;
    Ok(self.series.len(&rtxn)? as usize)
  }

  /// Flushes the environment to disk and closes it, blocking until the close
  /// completes.
  ///
  pub fn close(self) -> Result<(), HistoryError> {
    let synced = self.env.force_sync();
    self.env.prepare_for_closing().wait();

    Ok(synced?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_series_instance_uid_is_a_valid_key() {
    let dir = tempfile::tempdir().unwrap();
    let index = LmdbIndex::open(dir.path(), 10 * 1024 * 1024).unwrap();

    let entry = Entry {
      num_files: 3,
      ..Entry::default()
    };

    index.put("", &entry).unwrap();
    index.put("1.2", &Entry::default()).unwrap();

    assert_eq!(index.get("").unwrap(), Some(entry));
    assert_eq!(index.len().unwrap(), 2);

    index.close().unwrap();
  }
}
