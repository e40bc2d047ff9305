//! Record persistence
//!
//! Records are grouped into batch files of a fixed size, named from the run
//! id and a 1-based batch index. Each append rewrites the whole batch file,
//! so a single process must own an output directory for the run.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::constants::run::BATCH_SIZE;
use crate::error::Result;
use crate::records::GeneratedRecord;
use crate::report::RunReport;

/// Destination for persisted records and the run report
pub trait RecordSink {
    /// Persist one accepted record
    fn append(&mut self, record: &GeneratedRecord) -> Result<()>;

    /// Persist the end-of-run report
    fn write_report(&mut self, report: &RunReport) -> Result<()>;
}

/// JSON batch files on disk
#[derive(Debug, Clone)]
pub struct BatchFileStore {
    dir: PathBuf,
    batch_size: u64,
}

impl BatchFileStore {
    /// Create a store writing into `dir` with the default batch size.
    ///
    /// The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_batch_size(dir, BATCH_SIZE)
    }

    pub fn with_batch_size(dir: impl AsRef<Path>, batch_size: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 1-based batch holding record `id`
    pub fn batch_index(&self, id: u64) -> u64 {
        id.max(1).div_ceil(self.batch_size)
    }

    pub fn batch_path(&self, run_id: &str, batch_index: u64) -> PathBuf {
        self.dir.join(format!("{}_batch_{:04}.json", run_id, batch_index))
    }

    pub fn report_path(&self, run_id: &str) -> PathBuf {
        self.dir.join(format!("{}_report.json", run_id))
    }
}

impl RecordSink for BatchFileStore {
    fn append(&mut self, record: &GeneratedRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.batch_path(&record.run_id, self.batch_index(record.id));

        let mut batch: Vec<Value> = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };
        batch.push(serde_json::to_value(record)?);

        std::fs::write(&path, serde_json::to_string_pretty(&batch)?)?;
        log::debug!(
            "Saved record {} to {:?} ({} in batch)",
            record.id,
            path,
            batch.len()
        );
        Ok(())
    }

    fn write_report(&mut self, report: &RunReport) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.report_path(&report.run_id);
        std::fs::write(&path, serde_json::to_string_pretty(report)?)?;
        log::info!("Saved run report to {:?}", path);
        Ok(())
    }
}

/// In-memory sink, for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<GeneratedRecord>,
    pub report: Option<RunReport>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &GeneratedRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn write_report(&mut self, report: &RunReport) -> Result<()> {
        self.report = Some(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use widget_dsl::{content_hash, WidgetDocument};

    fn record(id: u64) -> GeneratedRecord {
        let doc = WidgetDocument::from_json(
            r#"{"widget": {"root": {"type": "leaf", "component": "Text", "content": "x"}}}"#,
        )
        .unwrap();
        let hash = content_hash(&doc).unwrap();
        GeneratedRecord {
            id,
            run_id: "run1".into(),
            seed_hash: hash.clone(),
            seed_dsl: doc.clone(),
            mutations: Vec::new(),
            result_dsl: doc,
            hash,
            generated_at: Utc::now(),
            controlled: None,
            repaired: false,
        }
    }

    #[test]
    fn test_batch_index() {
        let store = BatchFileStore::new("/tmp/unused");
        assert_eq!(store.batch_index(1), 1);
        assert_eq!(store.batch_index(100), 1);
        assert_eq!(store.batch_index(101), 2);
        assert_eq!(
            store.batch_path("run1", 2).file_name().unwrap(),
            "run1_batch_0002.json"
        );
    }

    #[test]
    fn test_append_groups_records_into_batches() {
        let dir = TempDir::new().unwrap();
        let mut store = BatchFileStore::with_batch_size(dir.path().join("out"), 2);
        for id in 1..=3 {
            store.append(&record(id)).unwrap();
        }

        let first: Vec<Value> = serde_json::from_str(
            &std::fs::read_to_string(store.batch_path("run1", 1)).unwrap(),
        )
        .unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1]["id"], 2);
        assert!(first[0].get("seedDSL").is_some());
        assert!(first[0].get("controlled").is_none());

        let second: Vec<Value> = serde_json::from_str(
            &std::fs::read_to_string(store.batch_path("run1", 2)).unwrap(),
        )
        .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0]["resultDSL"]["widget"]["root"]["content"], "x");
    }

    #[test]
    fn test_memory_sink_keeps_records() {
        let mut sink = MemorySink::new();
        sink.append(&record(1)).unwrap();
        assert_eq!(sink.records.len(), 1);
        assert!(sink.report.is_none());
    }
}
