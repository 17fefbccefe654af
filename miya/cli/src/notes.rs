//! Local store of deposit notes

use anyhow::Result;
use mcore::FixedBytes;
use mcrypto::DepositNote;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

const EXTENSION: &str = "note";

/// Deposit notes kept under `<cache>/notes`, one file per commitment
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    /// Open the note store of a data directory
    pub fn new(cache: &Path) -> Self {
        Self {
            dir: cache.join("notes"),
        }
    }

    /// The path of the note of a base58 commitment
    pub fn path(&self, commitment: &str) -> Result<PathBuf> {
        let commitment = bs58::decode(commitment)
            .into_vec()
            .map_err(|e| anyhow::anyhow!("Invalid commitment {commitment}: {e}"))?
            .bytes32("commitment")?;
        Ok(self
            .dir
            .join(bs58::encode(&commitment).into_string())
            .with_extension(EXTENSION))
    }

    /// Write a note, replacing the previous state of the same commitment
    ///
    /// The note is synced to a temporary file first and renamed over the
    /// previous state, the old secret stays readable until the new one is
    /// on disk.
    pub fn save(&self, note: &DepositNote) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(&bs58::encode(&note.commitment).into_string())?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));

        let mut file = File::create(&tmp)?;
        file.write_all(note.encode()?.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("Saved {} note to {}", note.state.as_str(), path.display());
        Ok(path)
    }

    /// Load the note of a base58 commitment
    pub fn load(&self, commitment: &str) -> Result<DepositNote> {
        let path = self.path(commitment)?;
        anyhow::ensure!(path.exists(), "Note {commitment} not found");
        DepositNote::decode(&fs::read_to_string(&path)?)
    }

    /// List all notes, oldest first
    pub fn list(&self) -> Result<Vec<DepositNote>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut notes = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }

            match DepositNote::decode(&fs::read_to_string(&path)?) {
                Ok(note) => notes.push(note),
                Err(e) => tracing::warn!("Skipping unreadable note {}: {e}", path.display()),
            }
        }

        notes.sort_by_key(|note| note.timestamp);
        Ok(notes)
    }
}

#[cfg(test)]
use mcrypto::NoteState;

#[test]
fn test_note_store() -> Result<()> {
    let cache = std::env::temp_dir().join(format!("miya-notes-{}", std::process::id()));
    let _ = fs::remove_dir_all(&cache);
    let store = NoteStore::new(&cache);
    assert!(store.list()?.is_empty());

    let mut note = DepositNote::new();
    let commitment = bs58::encode(&note.commitment).into_string();
    let path = store.save(&note)?;
    assert_eq!(path, cache.join("notes").join(format!("{commitment}.note")));

    note.mark_deposited()?;
    store.save(&note)?;
    assert_eq!(store.load(&commitment)?.state, NoteState::Deposited);

    assert!(!path.with_extension("note.tmp").exists());

    fs::write(cache.join("notes").join("broken.note"), "0OIl")?;
    fs::write(cache.join("notes").join("README"), "ignored")?;
    fs::write(cache.join("notes").join("stale.note.tmp"), "ignored")?;
    assert_eq!(store.list()?, vec![note]);

    let missing = bs58::encode([9u8; 32]).into_string();
    assert!(store.load(&missing).is_err());
    Ok(fs::remove_dir_all(&cache)?)
}

#[test]
fn test_note_path_rejects_foreign_names() -> Result<()> {
    let store = NoteStore::new(Path::new("/cache"));
    for name in ["../x", "../../etc/passwd", "missing", "", "0OIl"] {
        assert!(store.path(name).is_err(), "{name}");
    }

    let err = store.path("abc").unwrap_err();
    assert_eq!(
        err.downcast_ref::<mcore::Error>().map(mcore::Error::kind),
        Some(mcore::ErrorKind::Encoding)
    );

    let commitment = bs58::encode([1u8; 32]).into_string();
    assert_eq!(
        store.path(&commitment)?,
        PathBuf::from(format!("/cache/notes/{commitment}.note"))
    );
    Ok(())
}
