//! Best score persistence
//!
//! One scalar per game. The browser build keeps it in LocalStorage; native
//! builds keep a small JSON file.

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use crate::error::PersistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// Keep `score` if it beats the stored best; true on a new best
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(key: &str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(key) {
                match serde_json::from_str::<BestScore>(&json) {
                    Ok(best) => {
                        log::info!("Loaded best score {} ({})", best.value, key);
                        return best;
                    }
                    Err(err) => log::warn!("Ignoring stored best score for {}: {}", key, err),
                }
            }
        }
        Self::default()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self, key: &str) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(key, &json).is_err() {
                    log::warn!("Could not write best score for {}", key);
                } else {
                    log::info!("Best score saved: {} ({})", self.value, key);
                }
            }
        }
    }

    /// File used by `load`/`save` on native builds
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path(key: &str) -> PathBuf {
        let dir = std::env::var_os("RETRO_ARCADE_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!("{key}.json"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        std::fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Missing or unreadable files start from zero
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(key: &str) -> Self {
        let path = Self::default_path(key);
        match Self::load_from(&path) {
            Ok(best) => {
                log::info!("Loaded best score {} from {}", best.value, path.display());
                best
            }
            Err(PersistError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, key: &str) {
        let path = Self::default_path(key);
        match self.save_to(&path) {
            Ok(()) => log::info!("Best score saved: {} ({})", self.value, path.display()),
            Err(err) => log::warn!("Could not save best score to {}: {}", path.display(), err),
        }
    }
}
