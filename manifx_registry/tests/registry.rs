use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};

use manifx_core::{FieldTags, SeriesRecord};
use manifx_registry::{EntrySource, ManifestRegistry, NoQuarantine};

#[test]
fn concurrent_logs_are_not_lost() {
  let registry =
    ManifestRegistry::new(FieldTags::default(), Arc::new(NoQuarantine));

  std::thread::scope(|scope| {
    for thread in 0..8 {
      let registry = &registry;

      scope.spawn(move || {
        for i in 0..500 {
          let series = if i % 2 == 0 { "S1" } else { "S2" };
          let object = SeriesRecord::new(series, &format!("{thread}.{i}"))
            .patient_id("P1");

          registry.log(&object, None);
        }
      });
    }
  });

  assert_eq!(registry.entry("S1").unwrap().num_files, 2000);
  assert_eq!(registry.entry("S2").unwrap().num_files, 2000);
  assert_eq!(registry.instance_count(), 4000);
  assert_eq!(registry.manifest_instance_count(), 4000);
}

#[test]
fn phi_fields_are_all_or_nothing() {
  let registry =
    ManifestRegistry::new(FieldTags::default(), Arc::new(NoQuarantine));

  let object = SeriesRecord::new("S1", "I1").patient_id("P1");
  let original = SeriesRecord::new("ORIG", "ORIG-I1").patient_id("P1-ORIG");

  registry.log(&object, None);
  registry.log(&object, Some(&original));
  registry.log(&SeriesRecord::new("S2", "I2").patient_id("P2"), None);

  let entries = registry.snapshot(true);
  assert_eq!(entries.len(), 2);

  let s1 = &entries[0];
  assert_eq!(s1.num_files, 2);
  let phi = s1.phi.as_ref().unwrap();
  assert_eq!(phi.patient_id, "P1-ORIG");
  assert_eq!(phi.series_instance_uid, "ORIG");
  assert_eq!(phi.study_date, "");

  assert_eq!(entries[1].phi, None);

  assert!(registry.snapshot(false).iter().all(|e| e.phi.is_none()));
}

#[test]
fn three_files_for_one_series() {
  let registry =
    ManifestRegistry::new(FieldTags::default(), Arc::new(NoQuarantine));

  let object = SeriesRecord::new("S1", "I1").patient_id("P1");
  let original = SeriesRecord::new("S1-ORIG", "I1").patient_id("P1-ORIG");

  registry.log(&object, Some(&original));
  registry.log(&object, None);
  registry.log(&object, None);

  let entry = registry.entry("S1").unwrap();
  assert_eq!(entry.num_files, 3);
  assert_eq!(entry.phi.unwrap().patient_id, "P1-ORIG");
}

#[test]
fn snapshot_is_sorted() {
  let registry =
    ManifestRegistry::new(FieldTags::default(), Arc::new(NoQuarantine));

  for (series, patient) in [("S3", "B"), ("S2", "A"), ("S1", "A"), ("S0", "C")]
  {
    registry.log(&SeriesRecord::new(series, "I").patient_id(patient), None);
  }

  let order: Vec<_> = registry
    .snapshot(false)
    .into_iter()
    .map(|e| e.series_instance_uid)
    .collect();

  assert_eq!(order, vec!["S1", "S2", "S3", "S0"]);
  assert_eq!(registry.snapshot(false), registry.snapshot(false));
}

#[test]
fn status_and_counter_initialization() {
  let depth = Arc::new(AtomicU64::new(3));

  let registry = {
    let depth = depth.clone();
    ManifestRegistry::new(
      FieldTags::default(),
      Arc::new(move || depth.load(Ordering::SeqCst)),
    )
  };

  registry.log(&SeriesRecord::new("S1", "I1"), None);
  registry.log(&SeriesRecord::new("S1", "I2"), None);
  registry.increment_queued_instance();

  let status = registry.status();
  assert_eq!(status.starting_quarantine_count, 0);
  assert_eq!(status.current_quarantine_count, 3);
  assert_eq!(status.current_manifest_instance_count, 2);
  assert_eq!(status.queued_instance_count, 1);

  depth.store(5, Ordering::SeqCst);

  let status = registry.initialize_counts();
  assert_eq!(status.starting_quarantine_count, 5);
  assert_eq!(status.current_quarantine_count, 5);
  assert_eq!(status.current_manifest_instance_count, 2);
  assert_eq!(status.queued_instance_count, 0);

  depth.store(1, Ordering::SeqCst);
  registry.clear();
  assert_eq!(registry.status().starting_quarantine_count, 1);
  assert_eq!(registry.series_count(), 0);
}
