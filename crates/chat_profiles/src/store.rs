use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use rand::{seq::SliceRandom, Rng};

use crate::{AuthorProfile, PALETTE};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// JSON-backed store of author profiles.
///
/// The file is a single object keyed by display name:
///
/// ```json
/// { "Alice": { "color": "cyan", "voice": "english+f2" } }
/// ```
///
/// A missing file yields an empty store; a malformed one is a hard error so a
/// corrupted settings file is surfaced at startup rather than silently
/// overwritten.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: HashMap<String, AuthorProfile>,
}

impl ProfileStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let profiles = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file yet, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(ProfileStore { path, profiles })
    }

    /// Returns the stored profile for `name`, creating and persisting one on
    /// first sighting.
    ///
    /// A new profile gets a random palette color and a random voice from
    /// `voices`. The full store is rewritten synchronously before returning,
    /// so assignments survive a crash right after creation.
    pub fn get_or_create(
        &mut self,
        name: &str,
        voices: &[String],
    ) -> Result<AuthorProfile, StoreError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }

        let mut rng = rand::thread_rng();
        let profile = AuthorProfile {
            color: PALETTE[rng.gen_range(0..PALETTE.len())],
            voice: voices.choose(&mut rng).cloned(),
        };
        self.profiles.insert(name.to_owned(), profile.clone());
        self.persist()?;
        tracing::info!(author = name, color = profile.color.css(), "assigned new author profile");

        Ok(profile)
    }

    pub fn get(&self, name: &str) -> Option<&AuthorProfile> {
        self.profiles.get(name)
    }

    /// Rewrites the whole settings file. Called on every insertion and once
    /// more at shutdown as a final flush.
    pub fn persist(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&self.profiles)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
