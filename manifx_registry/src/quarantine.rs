/// A query for the number of items currently held in the pipeline's
/// quarantines.
///
pub trait QuarantineDepth: Send + Sync {
  fn quarantine_depth(&self) -> u64;
}

/// Reports an empty quarantine. Used when no pipeline is attached.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct NoQuarantine;

impl QuarantineDepth for NoQuarantine {
  fn quarantine_depth(&self) -> u64 {
    0
  }
}

impl<F> QuarantineDepth for F
where
  F: Fn() -> u64 + Send + Sync,
{
  fn quarantine_depth(&self) -> u64 {
    self()
  }
}
