use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{SnapshotError, SnapshotResult};

/// One aggregate value bound to one JSON file on disk.
///
/// `save` replaces the file wholesale; `load` parses it back. When the
/// file does not exist yet, `load` returns `T::default()` and persists it
/// immediately, so a fresh library is durable from its first moment.
#[derive(Debug)]
pub struct SnapshotFile<T> {
    path: PathBuf,
    _state: PhantomData<fn() -> T>,
}

impl<T> SnapshotFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Bind a snapshot to a file path. No filesystem access happens until
    /// [`Self::save`] or [`Self::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _state: PhantomData,
        }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the snapshot file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Serialize the full state and replace the file with it.
    ///
    /// The JSON is written to a `.tmp` sibling and renamed over the
    /// target, so readers never observe a half-written snapshot under the
    /// final name.
    pub fn save(&self, state: &T) -> SnapshotResult<()> {
        let json = serde_json::to_string_pretty(state)?;

        let tmp = self.tmp_path();
        let result = fs::write(&tmp, json.as_bytes())
            .and_then(|()| fs::rename(&tmp, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result?;

        debug!(path = %self.path.display(), bytes = json.len(), "snapshot saved");
        Ok(())
    }

    /// Read and parse the full state from the file.
    ///
    /// A missing file yields `T::default()`, persisted before returning.
    /// A file that exists but fails to parse is a hard error; the library
    /// never guesses at a partially readable state.
    pub fn load(&self) -> SnapshotResult<T> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let state = T::default();
                self.save(&state)?;
                return Ok(state);
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::from_str(&text).map_err(|source| SnapshotError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use serde::Deserialize;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct State {
        entries: BTreeMap<String, u32>,
        label: String,
    }

    fn temp_snapshot() -> (tempfile::TempDir, SnapshotFile<State>) {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = SnapshotFile::new(dir.path().join("state.json"));
        (dir, snapshot)
    }

    #[test]
    fn save_load_roundtrip() {
        let (_dir, snapshot) = temp_snapshot();
        let mut state = State::default();
        state.entries.insert("a".into(), 1);
        state.label = "current".into();

        snapshot.save(&state).unwrap();
        assert_eq!(snapshot.load().unwrap(), state);
    }

    #[test]
    fn empty_state_roundtrips() {
        let (_dir, snapshot) = temp_snapshot();
        snapshot.save(&State::default()).unwrap();
        assert_eq!(snapshot.load().unwrap(), State::default());
    }

    #[test]
    fn load_on_absent_file_persists_default() {
        let (_dir, snapshot) = temp_snapshot();
        assert!(!snapshot.exists());

        let state = snapshot.load().unwrap();
        assert_eq!(state, State::default());
        assert!(snapshot.exists());
    }

    #[test]
    fn save_replaces_previous_state() {
        let (_dir, snapshot) = temp_snapshot();
        let mut state = State::default();
        state.entries.insert("a".into(), 1);
        snapshot.save(&state).unwrap();

        state.entries.clear();
        state.entries.insert("b".into(), 2);
        snapshot.save(&state).unwrap();

        let loaded = snapshot.load().unwrap();
        assert!(!loaded.entries.contains_key("a"));
        assert_eq!(loaded.entries.get("b"), Some(&2));
    }

    #[test]
    fn corrupt_file_is_a_hard_error() {
        let (_dir, snapshot) = temp_snapshot();
        fs::write(snapshot.path(), b"{ not json").unwrap();

        let err = snapshot.load().unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt { .. }));
    }

    #[test]
    fn save_leaves_no_tmp_file() {
        let (_dir, snapshot) = temp_snapshot();
        snapshot.save(&State::default()).unwrap();
        assert!(!snapshot.tmp_path().exists());
    }
}
