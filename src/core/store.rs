//! Case store - the persisted test case collection
//!
//! The collection lives in a single YAML slot. It is read once when the store
//! is opened and rewritten in full after every mutation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::identity::CaseId;
use crate::entities::{Step, TestCase};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Test case {0} not found")]
    NotFound(CaseId),

    #[error("Failed to write case store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize case store: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("No test case ids left (last id is TC-{})", u32::MAX)]
    IdsExhausted,
}

/// Replacement contents for an existing case
#[derive(Debug, Clone, Default)]
pub struct CasePatch {
    pub title: String,
    pub precondition: String,
    pub steps: Vec<Step>,
}

/// On-disk layout of the persistence slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredCollection {
    /// Number the next created case receives
    #[serde(default = "first_id")]
    next_id: u32,

    #[serde(default)]
    cases: Vec<TestCase>,
}

fn first_id() -> u32 {
    1
}

/// How the persisted state was found when the store was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot parsed successfully
    Loaded,
    /// Slot missing or empty
    Empty,
    /// Slot could not be parsed; started from an empty collection
    Recovered,
}

/// The test case collection with write-through persistence
#[derive(Debug)]
pub struct CaseStore {
    path: Option<PathBuf>,
    state: StoredCollection,
    outcome: LoadOutcome,
}

impl CaseStore {
    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: StoredCollection {
                next_id: first_id(),
                cases: Vec::new(),
            },
            outcome: LoadOutcome::Empty,
        }
    }

    /// Open the persistence slot at `path`
    ///
    /// Missing, empty or malformed content yields an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (mut state, outcome) = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => {
                (StoredCollection::default(), LoadOutcome::Empty)
            }
            Ok(content) => {
                let filename = path.display().to_string();
                match crate::yaml::parse_yaml::<StoredCollection>(&content, &filename) {
                    Ok(state) => (state, LoadOutcome::Loaded),
                    Err(e) => {
                        warn!("case store {} is malformed, starting empty: {}", filename, e);
                        (StoredCollection::default(), LoadOutcome::Recovered)
                    }
                }
            }
            Err(e) => {
                debug!("no case store at {} ({}), starting empty", path.display(), e);
                (StoredCollection::default(), LoadOutcome::Empty)
            }
        };

        // Never hand out an id that is already taken
        let highest = state.cases.iter().map(|c| c.id.number()).max().unwrap_or(0);
        state.next_id = state
            .next_id
            .max(highest.saturating_add(1))
            .max(first_id());

        debug!("opened case store with {} case(s)", state.cases.len());
        Self {
            path: Some(path),
            state,
            outcome,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.outcome
    }

    /// All cases in insertion order
    pub fn cases(&self) -> &[TestCase] {
        &self.state.cases
    }

    pub fn len(&self) -> usize {
        self.state.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.cases.is_empty()
    }

    pub fn get(&self, id: CaseId) -> Option<&TestCase> {
        self.state.cases.iter().find(|c| c.id == id)
    }

    /// Append a new case under the next sequential id
    pub fn create(
        &mut self,
        title: impl Into<String>,
        precondition: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<TestCase, StoreError> {
        let id = CaseId::new(self.state.next_id);
        if self.get(id).is_some() {
            return Err(StoreError::IdsExhausted);
        }
        let next_id = self
            .state
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;

        let case = TestCase::new(id, title, precondition, steps);
        let mut next = self.state.clone();
        next.next_id = next_id;
        next.cases.push(case.clone());
        self.commit(next)?;

        debug!("created {}", id);
        Ok(case)
    }

    /// Replace title, precondition and steps of an existing case
    pub fn update(&mut self, id: CaseId, patch: CasePatch) -> Result<TestCase, StoreError> {
        let mut next = self.state.clone();
        let case = next
            .cases
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))?;

        case.title = patch.title;
        case.precondition = patch.precondition;
        case.steps = patch.steps;
        let updated = case.clone();
        self.commit(next)?;

        debug!("updated {}", id);
        Ok(updated)
    }

    /// Remove a case; absent ids are a no-op
    ///
    /// Returns whether a case was removed.
    pub fn delete(&mut self, id: CaseId) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            debug!("delete of absent {} ignored", id);
            return Ok(false);
        }
        let mut next = self.state.clone();
        next.cases.retain(|c| c.id != id);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove every case; the id counter keeps running
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let next = StoredCollection {
            next_id: self.state.next_id,
            cases: Vec::new(),
        };
        self.commit(next)
    }

    /// Persist `next` and adopt it; on a failed write the store is unchanged
    fn commit(&mut self, next: StoredCollection) -> Result<(), StoreError> {
        self.persist(&next)?;
        self.state = next;
        Ok(())
    }

    fn persist(&self, state: &StoredCollection) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let yaml = serde_yml::to_string(state)?;
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(path, yaml).map_err(io_err)?;

        debug!("wrote {} case(s) to {}", state.cases.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ExpectedStatus;
    use tempfile::TempDir;

    fn one_step() -> Vec<Step> {
        vec![Step::new("open app", ExpectedStatus::Success, "home screen")]
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = CaseStore::in_memory();
        let a = store.create("A", "", one_step()).unwrap();
        let b = store.create("B", "", one_step()).unwrap();
        assert_eq!(a.id.to_string(), "TC-1");
        assert_eq!(b.id.to_string(), "TC-2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_not_reused_after_delete_or_clear() {
        let mut store = CaseStore::in_memory();
        store.create("A", "", one_step()).unwrap();
        let b = store.create("B", "", one_step()).unwrap();
        assert!(store.delete(b.id).unwrap());
        let c = store.create("C", "", one_step()).unwrap();
        assert_eq!(c.id.to_string(), "TC-3");

        store.clear().unwrap();
        assert!(store.is_empty());
        let d = store.create("D", "", one_step()).unwrap();
        assert_eq!(d.id.to_string(), "TC-4");
    }

    #[test]
    fn test_update_replaces_fields() {
        let mut store = CaseStore::in_memory();
        let case = store.create("Old", "pre", one_step()).unwrap();

        let updated = store
            .update(
                case.id,
                CasePatch {
                    title: "New".to_string(),
                    precondition: "other".to_string(),
                    steps: Vec::new(),
                },
            )
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.precondition, "other");
        assert!(updated.steps.is_empty());
        assert_eq!(store.get(case.id), Some(&updated));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = CaseStore::in_memory();
        let err = store.update(CaseId::new(9), CasePatch::default()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == CaseId::new(9)));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = CaseStore::in_memory();
        store.create("A", "", one_step()).unwrap();
        assert!(!store.delete(CaseId::new(7)).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_through_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/cases.yaml");

        let mut store = CaseStore::open(&path);
        assert_eq!(store.load_outcome(), LoadOutcome::Empty);
        store.create("Login", "user exists", one_step()).unwrap();
        store.create("Logout", "", one_step()).unwrap();
        store.delete(CaseId::new(2)).unwrap();
        assert!(path.exists());

        let mut reopened = CaseStore::open(&path);
        assert_eq!(reopened.load_outcome(), LoadOutcome::Loaded);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.cases()[0].title, "Login");

        let next = reopened.create("Search", "", one_step()).unwrap();
        assert_eq!(next.id, CaseId::new(3));
    }

    #[test]
    fn test_malformed_store_recovers_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cases.yaml");
        fs::write(&path, "cases: [ {{ not yaml").unwrap();

        let store = CaseStore::open(&path);
        assert_eq!(store.load_outcome(), LoadOutcome::Recovered);
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_file_is_empty_collection() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cases.yaml");
        fs::write(&path, "\n").unwrap();

        let mut store = CaseStore::open(&path);
        assert_eq!(store.load_outcome(), LoadOutcome::Empty);
        assert_eq!(store.path(), Some(path.as_path()));
        let case = store.create("First", "", one_step()).unwrap();
        assert_eq!(case.id, CaseId::new(1));
    }

    #[test]
    fn test_next_id_guards_against_stale_counter() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cases.yaml");
        fs::write(
            &path,
            "next_id: 1\ncases:\n  - id: TC-4\n    title: Imported\n",
        )
        .unwrap();

        let mut store = CaseStore::open(&path);
        let case = store.create("Next", "", Vec::new()).unwrap();
        assert_eq!(case.id, CaseId::new(5));
    }

    #[test]
    fn test_largest_stored_id_does_not_overflow() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cases.yaml");
        fs::write(
            &path,
            "next_id: 1\ncases:\n  - id: TC-4294967295\n    title: Last\n",
        )
        .unwrap();

        let mut store = CaseStore::open(&path);
        assert_eq!(store.load_outcome(), LoadOutcome::Loaded);
        assert_eq!(store.len(), 1);

        let err = store.create("Overflow", "", one_step()).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_counter_at_last_id_is_exhausted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cases.yaml");
        fs::write(&path, "next_id: 4294967295\ncases: []\n").unwrap();

        let mut store = CaseStore::open(&path);
        let err = store.create("Last", "", one_step()).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = CaseStore::open(blocker.join("cases.yaml"));
        let err = store.create("Lost", "", one_step()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(store.is_empty());

        // once the path is writable the counter resumes where it was
        fs::remove_file(&blocker).unwrap();
        let case = store.create("Kept", "", one_step()).unwrap();
        assert_eq!(case.id, CaseId::new(1));

        fs::remove_dir_all(&blocker).unwrap();
        fs::write(&blocker, "not a directory").unwrap();
        let patch = CasePatch {
            title: "Renamed".to_string(),
            precondition: String::new(),
            steps: one_step(),
        };
        assert!(store.update(case.id, patch).is_err());
        assert!(store.delete(case.id).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(case.id).unwrap().title, "Kept");
    }
}
