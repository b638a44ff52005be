//! Durable place store keeping one JSON document per place.
//!
//! The store works inside a capability-scoped directory handle; it never
//! touches paths outside it. Writes go through a temporary file and rename
//! so a crash mid-write cannot corrupt an entry. Place ids may contain
//! path-hostile characters, so entry file names escape everything outside
//! a conservative alphabet.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8PathBuf;
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::place::{CachedPlace, PlaceId};
use crate::domain::ports::{PlaceStore, PlaceStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Place store persisting entries as JSON files in one directory.
#[derive(Debug)]
pub struct JsonFilePlaceStore {
    dir: Dir,
}

impl JsonFilePlaceStore {
    /// Create a store over an already opened directory handle.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self { dir }
    }
}

impl PlaceStore for JsonFilePlaceStore {
    fn load(&self, id: &PlaceId) -> Result<Option<CachedPlace>, PlaceStoreError> {
        let path = entry_path(id);
        let contents = match self.dir.read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(PlaceStoreError::backend(format!("reading {path}: {error}")));
            }
        };
        let entry = serde_json::from_str(&contents).map_err(|error| {
            PlaceStoreError::serialization(format!("decoding {path}: {error}"))
        })?;
        Ok(Some(entry))
    }

    fn save(&self, id: &PlaceId, entry: &CachedPlace) -> Result<(), PlaceStoreError> {
        let path = entry_path(id);
        let json = serde_json::to_string_pretty(entry)
            .map_err(|error| PlaceStoreError::serialization(error.to_string()))?;
        write_atomic(&self.dir, path.as_str(), &json)
            .map_err(|error| PlaceStoreError::backend(format!("writing {path}: {error}")))
    }

    fn remove(&self, id: &PlaceId) -> Result<(), PlaceStoreError> {
        let path = entry_path(id);
        match self.dir.remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(PlaceStoreError::backend(format!("removing {path}: {error}"))),
        }
    }

    fn load_all(&self) -> Result<Vec<CachedPlace>, PlaceStoreError> {
        let entries = self
            .dir
            .entries()
            .map_err(|error| PlaceStoreError::backend(format!("listing place store: {error}")))?;

        let mut places = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| {
                PlaceStoreError::backend(format!("listing place store: {error}"))
            })?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // Temp leftovers start with a dot; foreign files lack the suffix.
            if name.starts_with('.') || !name.ends_with(".json") {
                continue;
            }
            let contents = self.dir.read_to_string(&name).map_err(|error| {
                PlaceStoreError::backend(format!("reading {name}: {error}"))
            })?;
            let place = serde_json::from_str(&contents).map_err(|error| {
                PlaceStoreError::serialization(format!("decoding {name}: {error}"))
            })?;
            places.push(place);
        }
        Ok(places)
    }
}

/// File name for a place id, escaping everything outside `[A-Za-z0-9_-]`.
///
/// The mapping is injective and encode-only; ids are recovered from the
/// documents themselves, never from file names.
fn entry_path(id: &PlaceId) -> Utf8PathBuf {
    let raw = id.as_ref();
    let mut name = String::with_capacity(raw.len() + 5);
    for byte in raw.bytes() {
        match byte {
            b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'-' | b'_' => name.push(char::from(byte)),
            other => name.push_str(&format!("%{other:02X}")),
        }
    }
    name.push_str(".json");
    Utf8PathBuf::from(name)
}

/// Write contents to a file atomically using a temp file and rename.
///
/// The temporary file lives in the same directory so the rename stays on
/// one filesystem; the target is never partially written.
fn write_atomic(dir: &Dir, file_name: &str, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(".{file_name}.tmp.{}.{stamp}.{counter}", std::process::id());

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(&tmp_name, &options)?;

    if let Err(error) = file.write_all(contents.as_bytes()) {
        drop(file);
        drop(dir.remove_file(&tmp_name));
        return Err(error);
    }
    if let Err(error) = file.sync_all() {
        drop(file);
        drop(dir.remove_file(&tmp_name));
        return Err(error);
    }
    drop(file);

    if let Err(error) = rename_temp_to_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(error);
    }
    sync_directory(dir);
    Ok(())
}

#[cfg(windows)]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists, so remove it first.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best-effort directory sync; ignore failures.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Ignore sync failures.
    }
}
