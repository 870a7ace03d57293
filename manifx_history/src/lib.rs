//! A persistent, cross-run history of exported DICOM series, stored in an
//! LMDB environment.

mod history_error;
mod history_store;
mod lmdb_index;

pub use history_error::HistoryError;
pub use history_store::{DEFAULT_MAP_SIZE, HistoryStore};
