//! Crash-safe persistence of the history overlay.
//!
//! Saves write a version marker line followed by the entries whose
//! candidate order differs from the base snapshot, plus deletion
//! records for base candidates no longer present. The file is replaced
//! via temp → backup → rename so the previous generation stays
//! recoverable if the process dies mid-write.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use super::ConversionDictionary;

/// Records following a `; 1.1.0` marker line are fully trusted on
/// load; records before it may only reorder known readings.
pub(crate) const HISTORY_VERSION: &str = "1.1.0";

fn version_line() -> String {
    format!("; {HISTORY_VERSION}\n")
}

impl ConversionDictionary {
    /// Persist the history overlay. No-op unless a confirmation
    /// changed the active layer since the last save; on write failure
    /// the dirty flag stays set so a later save retries.
    pub fn save_history(&mut self) {
        if !self.dirty {
            return;
        }
        let Some(path) = self.history_path.clone() else {
            debug!("no history path configured, nothing persisted");
            return;
        };
        match self.write_history(&path) {
            Ok(()) => {
                self.dirty = false;
                info!(path = %path.display(), "saved conversion history");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save conversion history");
            }
        }
    }

    /// Truncate the history file to just the version marker.
    pub fn clear_history(&mut self) {
        let Some(path) = self.history_path.clone() else {
            return;
        };
        match atomic_replace(&path, version_line().as_bytes()) {
            Ok(()) => {
                self.dirty = false;
                info!(path = %path.display(), "cleared conversion history");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to clear conversion history");
            }
        }
    }

    fn write_history(&self, path: &Path) -> io::Result<()> {
        let mut out = version_line();

        let mut readings: Vec<&String> = self.active.keys().collect();
        readings.sort();
        for reading in readings {
            let candidates = &self.active[reading];
            if self.base.get(reading).is_some_and(|b| b == candidates) {
                continue;
            }
            out.push_str(reading);
            out.push_str(" /");
            out.push_str(&candidates.join("/"));
            out.push_str("/\n");

            if let Some(base_candidates) = self.base.get(reading) {
                let removed: Vec<&str> = base_candidates
                    .iter()
                    .filter(|c| !candidates.contains(c))
                    .map(String::as_str)
                    .collect();
                if !removed.is_empty() {
                    out.push_str(&format!("-{reading} /{}/\n", removed.join("/")));
                }
            }
        }

        // Entries deleted outright from the active layer.
        let mut gone: Vec<&String> = self
            .base
            .keys()
            .filter(|reading| !self.active.contains_key(*reading))
            .collect();
        gone.sort();
        for reading in gone {
            out.push_str(&format!("-{reading} /{}/\n", self.base[reading].join("/")));
        }

        atomic_replace(path, out.as_bytes())
    }
}

/// Replace `path` with `bytes` without ever exposing a half-written
/// file: write a temp file, move any existing file aside as `.bak`,
/// then rename the temp file into place.
fn atomic_replace(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    if path.exists() {
        let backup = path.with_extension("bak");
        match fs::remove_file(&backup) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::rename(path, &backup)?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
