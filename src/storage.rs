use crate::errors::StoreError;
use crate::feedback::{adjust_speed, round_speed};
use crate::models::{ExerciseTarget, HistoryEntry, HistoryLog, Outcome, TargetBook};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};
use tracing::{debug, error};

/// Synchronous key-value persistence port.
pub trait KeyValueStore {
    /// Returns `None` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the value under `key` in full.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.tmp"))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes a sibling temp file and renames it over the old value, so a
    /// crash mid-write never leaves a truncated document behind.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let temp = self.temp_path_for(key);
        fs::write(&temp, bytes)?;
        if let Err(err) = fs::rename(&temp, self.path_for(key)) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// A persisted progress shape and how an outcome changes it.
pub trait ProgressDocument: Serialize + DeserializeOwned + Default + Clone {
    /// Versioned key; bump the suffix when the shape changes incompatibly.
    const STORAGE_KEY: &'static str;

    fn apply(&mut self, outcome: &Outcome);
}

impl ProgressDocument for HistoryLog {
    const STORAGE_KEY: &'static str = "runProgress_v2";

    fn apply(&mut self, outcome: &Outcome) {
        self.history.push(HistoryEntry {
            hit: outcome.hit,
            label: Some(outcome.key.clone()),
        });
    }
}

impl ProgressDocument for TargetBook {
    const STORAGE_KEY: &'static str = "runPlan_v3";

    fn apply(&mut self, outcome: &Outcome) {
        let target = self
            .targets
            .entry(outcome.key.clone())
            .or_insert(ExerciseTarget {
                speed: outcome.baseline,
            });
        target.speed = round_speed(adjust_speed(target.speed, outcome.hit));
    }
}

impl TargetBook {
    /// Current target for `key`, falling back to the plan's speed.
    pub fn speed(&self, key: &str, baseline: f64) -> f64 {
        self.targets
            .get(key)
            .map(|target| target.speed)
            .unwrap_or(baseline)
    }
}

/// In-memory progress document mirrored to a persistence port.
///
/// The document is read once by [`ProgressStore::load`] and rewritten in full
/// after every mutation.
pub struct ProgressStore<D, S> {
    port: S,
    key: String,
    document: D,
}

impl<D: ProgressDocument, S: KeyValueStore> ProgressStore<D, S> {
    pub fn load(port: S) -> Self {
        Self::load_with_key(port, D::STORAGE_KEY)
    }

    /// Loads the document under `key`. Missing or malformed data yields an empty document.
    pub fn load_with_key(port: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let document = match port.load(&key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(err) => {
                    error!("failed to parse progress document {key}: {err}");
                    D::default()
                }
            },
            Ok(None) => D::default(),
            Err(err) => {
                error!("failed to read progress document {key}: {err}");
                D::default()
            }
        };

        Self {
            port,
            key,
            document,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    #[cfg(test)]
    pub fn port(&self) -> &S {
        &self.port
    }

    /// Applies `outcome` and persists. If the write fails the in-memory
    /// document is restored so it never runs ahead of storage.
    pub fn record_outcome(&mut self, outcome: &Outcome) -> Result<(), StoreError> {
        let previous = self.document.clone();
        self.document.apply(outcome);
        if let Err(err) = self.persist() {
            self.document = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(&self.document)?;
        self.port.save(&self.key, &payload)?;
        debug!(key = %self.key, bytes = payload.len(), "persisted progress document");
        Ok(())
    }

    /// Puts `document` back in place and rewrites it.
    fn restore(&mut self, document: D) -> Result<(), StoreError> {
        self.document = document;
        self.persist()
    }
}

/// Both progress documents. An outcome lands in both or in neither.
pub struct Progress<S> {
    history: ProgressStore<HistoryLog, S>,
    targets: ProgressStore<TargetBook, S>,
}

impl<S: KeyValueStore + Clone> Progress<S> {
    pub fn load(port: S) -> Self {
        Self {
            history: ProgressStore::load(port.clone()),
            targets: ProgressStore::load(port),
        }
    }
}

impl<S: KeyValueStore> Progress<S> {
    pub fn history(&self) -> &HistoryLog {
        self.history.document()
    }

    pub fn targets(&self) -> &TargetBook {
        self.targets.document()
    }

    /// Adjusts the target, then appends the history entry. If the history
    /// write fails the target is restored and rewritten before the error is returned.
    pub fn record_outcome(&mut self, outcome: &Outcome) -> Result<(), StoreError> {
        let previous = self.targets.document().clone();
        self.targets.record_outcome(outcome)?;
        if let Err(err) = self.history.record_outcome(outcome) {
            if let Err(restore_err) = self.targets.restore(previous) {
                error!(key = %outcome.key, "failed to restore targets after history write failed: {restore_err}");
            }
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        saves: usize,
        fail: bool,
    }

    impl KeyValueStore for CountingStore {
        fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
            if self.fail {
                return Err(std::io::Error::other("disk full").into());
            }
            self.saves += 1;
            self.inner.save(key, bytes)
        }
    }

    fn outcome(key: &str, hit: bool) -> Outcome {
        Outcome {
            key: key.to_string(),
            hit,
            baseline: 14.7,
        }
    }

    fn unique_dir() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("treadmill_coach_store_{}_{}", std::process::id(), nanos))
    }

    #[test]
    fn missing_document_loads_empty() {
        let history = ProgressStore::<HistoryLog, _>::load(MemoryStore::new());
        assert!(history.document().history.is_empty());
        let targets = ProgressStore::<TargetBook, _>::load(MemoryStore::new());
        assert!(targets.document().targets.is_empty());
    }

    #[test]
    fn malformed_document_loads_empty() {
        let mut port = MemoryStore::new();
        port.save(HistoryLog::STORAGE_KEY, b"{not json").unwrap();
        port.save(TargetBook::STORAGE_KEY, b"[1,2,3]").unwrap();

        let history = ProgressStore::<HistoryLog, _>::load(port.clone());
        assert_eq!(history.document(), &HistoryLog::default());
        let targets = ProgressStore::<TargetBook, _>::load(port);
        assert_eq!(targets.document(), &TargetBook::default());
    }

    #[test]
    fn record_appends_once_and_persists_once() {
        let mut store = ProgressStore::<HistoryLog, _>::load(CountingStore::default());
        store.record_outcome(&outcome("Monday_0", true)).unwrap();

        assert_eq!(store.document().history.len(), 1);
        assert_eq!(store.port().saves, 1);
        let persisted: HistoryLog =
            serde_json::from_slice(store.port().inner.get(HistoryLog::STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(&persisted, store.document());
        assert_eq!(persisted.history[0].label.as_deref(), Some("Monday_0"));
    }

    #[test]
    fn failed_persist_leaves_document_unchanged() {
        let port = CountingStore {
            fail: true,
            ..CountingStore::default()
        };
        let mut store = ProgressStore::<HistoryLog, _>::load(port);
        assert!(store.record_outcome(&outcome("Monday_0", false)).is_err());
        assert!(store.document().history.is_empty());
    }

    #[test]
    fn target_book_starts_from_baseline_and_steps() {
        let mut store = ProgressStore::<TargetBook, _>::load(MemoryStore::new());
        store.record_outcome(&outcome("Monday_0", true)).unwrap();
        assert_eq!(store.document().speed("Monday_0", 0.0), 14.8);
        store.record_outcome(&outcome("Monday_0", false)).unwrap();
        store.record_outcome(&outcome("Monday_0", false)).unwrap();
        assert_eq!(store.document().speed("Monday_0", 0.0), 14.6);
        let persisted = String::from_utf8(store.port().get(TargetBook::STORAGE_KEY).unwrap().to_vec()).unwrap();
        assert_eq!(persisted, r#"{"Monday_0":{"speed":14.6}}"#);
        assert_eq!(store.document().speed("Tuesday_0", 13.8), 13.8);
    }

    #[test]
    fn both_shapes_round_trip_through_the_port() {
        let mut history = ProgressStore::<HistoryLog, _>::load(MemoryStore::new());
        history.record_outcome(&outcome("Monday_0", true)).unwrap();
        history.record_outcome(&outcome("Tuesday_1", false)).unwrap();
        let reloaded = ProgressStore::<HistoryLog, _>::load(history.port().clone());
        assert_eq!(reloaded.document(), history.document());

        let mut targets = ProgressStore::<TargetBook, _>::load(MemoryStore::new());
        targets.record_outcome(&outcome("Monday_0", true)).unwrap();
        targets.record_outcome(&outcome("Friday_1", false)).unwrap();
        let reloaded = ProgressStore::<TargetBook, _>::load(targets.port().clone());
        assert_eq!(reloaded.document(), targets.document());
    }

    #[test]
    fn file_store_round_trips_and_overwrites() {
        let dir = unique_dir();
        let mut store = ProgressStore::<HistoryLog, _>::load(FileStore::new(&dir));
        store.record_outcome(&outcome("Monday_0", true)).unwrap();
        store.record_outcome(&outcome("Monday_0", false)).unwrap();

        let reloaded = ProgressStore::<HistoryLog, _>::load(FileStore::new(&dir));
        assert_eq!(reloaded.document().history.len(), 2);
        assert_eq!(reloaded.document(), store.document());
        assert!(dir.join("runProgress_v2.json").exists());
        assert!(!dir.join("runProgress_v2.json.tmp").exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn file_store_replaces_value_in_full() {
        let dir = unique_dir();
        let mut port = FileStore::new(&dir);
        port.save("runPlan_v3", br#"{"Monday_0":{"speed":14.8},"Friday_1":{"speed":16.6}}"#).unwrap();
        port.save("runPlan_v3", b"{}").unwrap();
        assert_eq!(port.load("runPlan_v3").unwrap().as_deref(), Some(&b"{}"[..]));
        assert_eq!(port.load("runProgress_v2").unwrap(), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn progress_records_into_both_documents() {
        let mut progress = Progress::load(MemoryStore::new());
        progress.record_outcome(&outcome("Monday_0", true)).unwrap();
        assert_eq!(progress.history().history.len(), 1);
        assert_eq!(progress.targets().speed("Monday_0", 0.0), 14.8);

        let reloaded = Progress::load(progress.history.port().clone());
        assert_eq!(reloaded.history(), progress.history());
        assert_eq!(reloaded.targets(), progress.targets());
    }

    #[test]
    fn failed_history_write_keeps_both_documents_unchanged() {
        let dir = unique_dir();
        let mut progress = Progress::load(FileStore::new(&dir));
        progress.record_outcome(&outcome("Monday_0", true)).unwrap();
        let targets_before = fs::read(dir.join("runPlan_v3.json")).unwrap();

        let history_path = dir.join("runProgress_v2.json");
        fs::remove_file(&history_path).unwrap();
        fs::create_dir(&history_path).unwrap();

        assert!(progress.record_outcome(&outcome("Monday_0", true)).is_err());
        assert_eq!(progress.history().history.len(), 1);
        assert_eq!(progress.targets().speed("Monday_0", 0.0), 14.8);
        assert_eq!(fs::read(dir.join("runPlan_v3.json")).unwrap(), targets_before);

        let reloaded = Progress::load(FileStore::new(&dir));
        assert_eq!(reloaded.targets(), progress.targets());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn custom_key_is_used_for_persistence() {
        let mut store = ProgressStore::<HistoryLog, _>::load_with_key(MemoryStore::new(), "runProgress_v3");
        store.persist().unwrap();
        assert_eq!(store.key(), "runProgress_v3");
        assert!(store.port().get("runProgress_v3").is_some());
        assert!(store.port().get(HistoryLog::STORAGE_KEY).is_none());
    }
}
