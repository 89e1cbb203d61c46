//! Deck-scoped storage of card states and review logs
//!
//! Each deck gets one activity file next to it:
//! ```text
//! decks/
//! ├── spanish.json          # deck document (read-only here)
//! └── spanish.review.json   # { "states": {...}, "logs": {...} }
//! ```
//!
//! Every mutation rewrites the whole snapshot before returning. Before
//! overwriting, the store checks that the file still has the contents it
//! last saw; what happens when another writer got there first is decided
//! by the [`ConflictPolicy`].

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::models::{ActivitySnapshot, CardState, ReviewLog};
use crate::repository::locate_deck;

/// Suffix appended to the deck's stem to name its activity file
pub const ACTIVITY_SUFFIX: &str = ".review.json";

#[derive(Error, Debug)]
pub enum ActivityError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Activity store is not bound to a deck")]
    NotBound,

    #[error("Activity file changed since it was loaded: {0}")]
    Conflict(PathBuf),
}

pub type Result<T> = std::result::Result<T, ActivityError>;

/// What to do when the activity file changed underneath this store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Last writer wins
    Overwrite,
    /// Fail the write with [`ActivityError::Conflict`]
    Reject,
    /// Reload the file and re-apply this store's unsaved changes
    #[default]
    Merge,
}

/// Activity file for a deck: same directory, deck stem plus [`ACTIVITY_SUFFIX`]
pub fn activity_path_for(deck_path: &Path) -> PathBuf {
    let mut name: OsString = deck_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(ACTIVITY_SUFFIX);

    match deck_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

struct Scope {
    deck_path: PathBuf,
    activity_path: PathBuf,
}

/// Mutations not yet written to disk
#[derive(Clone, Default)]
struct Pending {
    states: BTreeSet<String>,
    /// Number of log entries appended per card
    logs: BTreeMap<String, usize>,
}

/// Storage for one deck's activity, created per unit of work
pub struct ActivityStore {
    /// Directory relative deck ids are resolved against
    root: PathBuf,
    policy: ConflictPolicy,
    scope: Option<Scope>,
    snapshot: ActivitySnapshot,
    /// Hash of the file as last read or written; `None` if it did not exist
    fingerprint: Option<Vec<u8>>,
    pending: Pending,
}

impl ActivityStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            policy: ConflictPolicy::default(),
            scope: None,
            snapshot: ActivitySnapshot::default(),
            fingerprint: None,
            pending: Pending::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Scope the store to a deck. Binding to a different deck drops the
    /// in-memory snapshot; binding to the same deck again does nothing.
    pub fn bind(&mut self, deck_id: &str) {
        let deck_path = locate_deck(&self.root, deck_id);
        if let Some(scope) = &self.scope {
            if scope.deck_path == deck_path {
                return;
            }
            log::debug!(
                "Rebinding activity store from {:?} to {:?}",
                scope.deck_path,
                deck_path
            );
        }

        self.snapshot = ActivitySnapshot::default();
        self.fingerprint = None;
        self.pending = Pending::default();
        self.scope = Some(Scope {
            activity_path: activity_path_for(&deck_path),
            deck_path,
        });
    }

    pub fn is_bound(&self) -> bool {
        self.scope.is_some()
    }

    pub fn deck_path(&self) -> Option<&Path> {
        self.scope.as_ref().map(|s| s.deck_path.as_path())
    }

    pub fn activity_path(&self) -> Option<&Path> {
        self.scope.as_ref().map(|s| s.activity_path.as_path())
    }

    fn bound_activity_path(&self) -> Result<PathBuf> {
        self.scope
            .as_ref()
            .map(|s| s.activity_path.clone())
            .ok_or(ActivityError::NotBound)
    }

    /// Read the bound activity file into memory. A missing file is not an error.
    pub fn load(&mut self) -> Result<()> {
        let path = self.bound_activity_path()?;
        match read_if_exists(&path)? {
            Some(bytes) => {
                let disk = ActivitySnapshot::from_slice(&bytes)?;
                log::debug!(
                    "Loaded {} card states from {:?}",
                    disk.states.len(),
                    path
                );
                self.absorb_disk(disk);
                self.fingerprint = Some(fingerprint(&bytes));
            }
            None => {
                self.fingerprint = None;
            }
        }
        Ok(())
    }

    /// In-memory lookup; never touches the disk
    pub fn card_state(&self, card_id: &str) -> Option<&CardState> {
        self.snapshot.states.get(card_id)
    }

    /// Review history of a card in append order
    pub fn review_log(&self, card_id: &str) -> &[ReviewLog] {
        self.snapshot
            .logs
            .get(card_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn snapshot(&self) -> &ActivitySnapshot {
        &self.snapshot
    }

    /// Upsert a card's state and write it out
    pub fn save_card_state(&mut self, card_id: &str, state: CardState) -> Result<()> {
        self.commit(|store| store.put_state(card_id, state))
    }

    /// Append to a card's review log and write it out
    pub fn append_review_log(&mut self, card_id: &str, entry: ReviewLog) -> Result<()> {
        self.commit(|store| store.push_log(card_id, entry))
    }

    /// Store the outcome of one grading event with a single write
    pub fn record_review(&mut self, card_id: &str, state: CardState, entry: ReviewLog) -> Result<()> {
        self.commit(|store| {
            store.put_state(card_id, state);
            store.push_log(card_id, entry);
        })
    }

    /// Apply `change` and persist it. If the write fails (including a
    /// rejected conflict) the in-memory snapshot is restored, so lookups only
    /// ever report what is on disk. After a `Conflict`, call [`load`] and
    /// retry.
    ///
    /// [`load`]: ActivityStore::load
    fn commit(&mut self, change: impl FnOnce(&mut Self)) -> Result<()> {
        self.bound_activity_path()?;
        let snapshot = self.snapshot.clone();
        let pending = self.pending.clone();

        change(self);
        if let Err(e) = self.persist() {
            self.snapshot = snapshot;
            self.pending = pending;
            return Err(e);
        }
        Ok(())
    }

    fn put_state(&mut self, card_id: &str, state: CardState) {
        self.snapshot.states.insert(card_id.to_string(), state);
        self.pending.states.insert(card_id.to_string());
    }

    fn push_log(&mut self, card_id: &str, entry: ReviewLog) {
        self.snapshot
            .logs
            .entry(card_id.to_string())
            .or_default()
            .push(entry);
        *self.pending.logs.entry(card_id.to_string()).or_insert(0) += 1;
    }

    /// Write the whole snapshot to the activity file
    pub fn persist(&mut self) -> Result<()> {
        let path = self.bound_activity_path()?;

        let on_disk = read_if_exists(&path)?;
        let disk_fingerprint = on_disk.as_deref().map(fingerprint);
        if disk_fingerprint != self.fingerprint {
            match self.policy {
                ConflictPolicy::Overwrite => {
                    log::warn!("Overwriting concurrent changes to {:?}", path);
                }
                ConflictPolicy::Reject => {
                    log::warn!("Refusing to overwrite concurrent changes to {:?}", path);
                    return Err(ActivityError::Conflict(path));
                }
                ConflictPolicy::Merge => {
                    log::warn!("Merging concurrent changes to {:?}", path);
                    if let Some(bytes) = &on_disk {
                        let disk = ActivitySnapshot::from_slice(bytes)?;
                        self.absorb_disk(disk);
                    }
                }
            }
        }

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let bytes = self.snapshot.to_bytes()?;
        write_atomic(&path, &bytes)?;

        let written = fingerprint(&bytes);
        log::debug!("Persisted {:?} ({})", path, hex::encode(&written[..8]));
        self.fingerprint = Some(written);
        self.pending = Pending::default();
        Ok(())
    }

    /// Take the disk's version of every card this store has not changed,
    /// keeping this store's unsaved state upserts and log appends on top
    fn absorb_disk(&mut self, disk: ActivitySnapshot) {
        let ActivitySnapshot { states, logs } = disk;

        for (card_id, state) in states {
            if !self.pending.states.contains(&card_id) {
                self.snapshot.states.insert(card_id, state);
            }
        }

        for (card_id, mut disk_log) in logs {
            let fresh = self.pending.logs.get(&card_id).copied().unwrap_or(0);
            if let Some(ours) = self.snapshot.logs.get(&card_id) {
                let start = ours.len().saturating_sub(fresh);
                disk_log.extend_from_slice(&ours[start..]);
            }
            self.snapshot.logs.insert(card_id, disk_log);
        }
    }
}

fn fingerprint(bytes: &[u8]) -> Vec<u8> {
    Sha256::digest(bytes).to_vec()
}

fn read_if_exists(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write to a sibling `.tmp` file, then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp_path = PathBuf::from(tmp);

    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)
}
