//! The conversion dictionary: layered reading → candidates store with
//! incremental lookup, history-driven candidate promotion, and
//! crash-safe persistence of the personalization overlay.
//!
//! `base` holds the system data (katakana, supplementary, and primary
//! dictionaries, later loads preferred) and never changes after
//! construction; `active` starts as a copy of `base` and accumulates
//! the user dictionary, the saved history overlay, and session
//! confirmations. Saving diffs `active` against `base`.

mod lookup;
mod persistence;
#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::settings::EngineConfig;
use crate::unicode::{normalize_long_vowels, STEM_MARKER};

use persistence::HISTORY_VERSION;

/// Per-session match state: reset at session start, replaced wholesale
/// by `lookup`, consumed and cleared by `confirm`.
#[derive(Debug, Default)]
struct MatchState {
    /// The matched portion of the input buffer (what the host replaces).
    reading: String,
    /// Display candidates: stem markers stripped, digits substituted,
    /// okurigana composed.
    candidates: Vec<String>,
    /// Whether each candidate is a complete word (vs. still-extendable).
    completed: Vec<bool>,
    selected: usize,
    /// Canonical store key (stem reading or numeral template) the
    /// candidates came from.
    stored_key: Option<String>,
    /// Display index → stored candidate index, present when okurigana
    /// bucketing reordered the list.
    order: Option<Vec<usize>>,
    /// Typed digit run substituted for the template placeholder.
    number: Option<String>,
    pseudo: bool,
}

pub struct ConversionDictionary {
    base: HashMap<String, Vec<String>>,
    active: HashMap<String, Vec<String>>,
    history_path: Option<PathBuf>,
    strict_voicing: bool,
    dirty: bool,
    state: MatchState,
}

impl ConversionDictionary {
    /// Build the layered store. Missing or unreadable dictionary files
    /// are logged and skipped; construction itself cannot fail.
    pub fn open(config: &EngineConfig) -> Self {
        let paths = &config.dictionaries;
        let mut base = HashMap::new();
        // Katakana first so katakana candidates rank after kanji ones.
        for path in [&paths.katakana, &paths.supplement, &paths.system]
            .into_iter()
            .flatten()
        {
            load_file(&mut base, path, false);
        }

        let mut active = base.clone();
        if let Some(path) = &paths.user {
            load_file(&mut active, path, false);
        }
        if let Some(path) = &paths.history {
            load_file(&mut active, path, true);
        }

        Self {
            base,
            active,
            history_path: paths.history.clone(),
            strict_voicing: config.matching.strict_voicing,
            dirty: false,
            state: MatchState::default(),
        }
    }

    /// Clear the session match state.
    pub fn reset(&mut self) {
        self.state = MatchState::default();
    }

    /// The currently selected candidate, or the empty string when
    /// nothing is matched.
    pub fn current(&self) -> String {
        if self.state.reading.is_empty() {
            return String::new();
        }
        self.state.candidates[self.state.selected].clone()
    }

    pub fn next(&mut self) -> String {
        if self.state.selected + 1 < self.state.candidates.len() {
            self.state.selected += 1;
        }
        self.current()
    }

    pub fn previous(&mut self) -> String {
        if self.state.selected > 0 {
            self.state.selected -= 1;
        }
        self.current()
    }

    /// Select a candidate by index; out-of-range indices are ignored.
    pub fn set_current(&mut self, index: usize) {
        if !self.state.reading.is_empty() && index < self.state.candidates.len() {
            self.state.selected = index;
        }
    }

    /// The matched reading window, empty when nothing is matched.
    pub fn reading(&self) -> &str {
        &self.state.reading
    }

    pub fn candidates(&self) -> &[String] {
        if self.state.reading.is_empty() {
            &[]
        } else {
            &self.state.candidates
        }
    }

    /// Whether the selected candidate is a complete word (a direct hit
    /// or a fully realized inflected form).
    pub fn is_complete(&self) -> bool {
        self.state
            .completed
            .get(self.state.selected)
            .copied()
            .unwrap_or(false)
    }

    pub fn is_pseudo(&self) -> bool {
        self.state.pseudo
    }

    /// Select whether voiced/unvoiced kana pairs are treated as
    /// distinct during okurigana comparison.
    pub fn set_strict_voicing(&mut self, strict: bool) {
        self.strict_voicing = strict;
    }

    /// Install a single self-referential candidate so the typed text
    /// stays navigable when no entry exists. Never persisted.
    pub fn create_pseudo_candidate(&mut self, text: &str) {
        self.state = MatchState {
            reading: text.to_string(),
            candidates: vec![text.to_string()],
            completed: vec![true],
            pseudo: true,
            ..MatchState::default()
        };
    }

    /// Promote the selected candidate to the front of its canonical
    /// stored list and clear the session state.
    ///
    /// `shrunk_prefix`, when non-empty, is the leading part of a longer
    /// compound reading whose trailing sub-match was just confirmed;
    /// the compound `prefix + reading → prefix + candidate` is then
    /// registered as a new preferred entry. Returns the canonical
    /// stored index that was confirmed, `None` when nothing was active.
    pub fn confirm(&mut self, shrunk_prefix: &str) -> Option<usize> {
        if self.state.reading.is_empty() {
            return None;
        }
        if self.state.pseudo {
            // Echoed-back text is not a preference.
            self.reset();
            return None;
        }

        let selected = self.state.selected;
        let stored_idx = self
            .state
            .order
            .as_ref()
            .and_then(|order| order.get(selected).copied())
            .unwrap_or(selected);
        let key = self
            .state
            .stored_key
            .clone()
            .unwrap_or_else(|| self.state.reading.clone());

        if stored_idx != 0 {
            if let Some(list) = self.active.get_mut(&key) {
                if stored_idx < list.len() {
                    let candidate = list.remove(stored_idx);
                    debug!(reading = %key, candidate = %candidate, "promoted candidate");
                    list.insert(0, candidate);
                    self.dirty = true;
                }
            }
        }

        if !shrunk_prefix.is_empty() {
            if let Some(front) = self.active.get(&key).and_then(|list| list.first()).cloned() {
                let compound_reading = format!("{shrunk_prefix}{key}");
                let compound = format!("{shrunk_prefix}{front}");
                if register_entry(&mut self.active, &compound_reading, &[compound], false) {
                    debug!(reading = %compound_reading, "registered compound entry");
                    self.dirty = true;
                }
            }
        }

        self.reset();
        Some(stored_idx)
    }
}

/// Load one line-oriented dictionary file into `map`.
///
/// `gated` marks the history overlay: records before its version
/// marker line may only reorder known readings, never introduce new
/// ones. Any failure degrades to "this file contributes nothing".
fn load_file(map: &mut HashMap<String, Vec<String>>, path: &Path, gated: bool) {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "dictionary not loaded");
            return;
        }
    };

    let mut trusted = !gated;
    let mut entries = 0usize;
    for line in io::BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stopped reading dictionary");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix(';') {
            if !trusted && comment.trim() == HISTORY_VERSION {
                trusted = true;
            }
            continue;
        }

        let Some((reading, rest)) = line.split_once(' ') else {
            warn!(path = %path.display(), line = %line, "malformed entry");
            continue;
        };
        let candidates: Vec<String> = rest
            .trim_matches(['/', ' '])
            .split('/')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            warn!(path = %path.display(), line = %line, "malformed entry");
            continue;
        }

        if let Some(target) = reading.strip_prefix('-') {
            delete_candidates(map, target, &candidates);
        } else {
            register_entry(map, reading, &candidates, !trusted);
        }
        entries += 1;
    }
    info!(path = %path.display(), entries, "loaded dictionary");
}

/// Register an entry plus its derived spellings: a long-vowel reading
/// is also stored under its plain-vowel normalization, and a stem
/// reading auto-registers its marker-stripped alias pointing at the
/// marked reading so marker-agnostic lookups can discover it.
/// Returns whether the map changed.
fn register_entry(
    map: &mut HashMap<String, Vec<String>>,
    reading: &str,
    candidates: &[String],
    reorder_only: bool,
) -> bool {
    let mut changed = merge(map, reading, candidates, reorder_only);
    let mut spellings = vec![reading.to_string()];
    if reading.contains('ー') {
        let normalized = normalize_long_vowels(reading);
        if normalized != reading {
            changed |= merge(map, &normalized, candidates, reorder_only);
            spellings.push(normalized);
        }
    }
    for spelling in spellings {
        if spelling.ends_with(STEM_MARKER) && map.contains_key(&spelling) {
            let stem = spelling.trim_end_matches(STEM_MARKER).to_string();
            if !stem.is_empty() {
                changed |= merge(map, &stem, &[spelling], reorder_only);
            }
        }
    }
    changed
}

/// Merge candidates into an entry. Incoming candidates are inserted at
/// the front in reverse order, so the last one ends up most preferred;
/// candidates already present are moved, not duplicated. With
/// `reorder_only`, unknown readings are dropped: un-versioned history
/// cannot invent vocabulary. Returns whether the map changed.
fn merge(
    map: &mut HashMap<String, Vec<String>>,
    reading: &str,
    candidates: &[String],
    reorder_only: bool,
) -> bool {
    let filtered: Vec<&String> = candidates
        .iter()
        .filter(|c| {
            if c.as_str() == reading {
                warn!(reading = %reading, "self-referential candidate dropped");
                return false;
            }
            true
        })
        .collect();
    if filtered.is_empty() {
        return false;
    }

    match map.get(reading) {
        Some(existing) => {
            let mut updated = existing.clone();
            for candidate in filtered.iter().rev() {
                if let Some(pos) = updated.iter().position(|c| c == *candidate) {
                    updated.remove(pos);
                }
                updated.insert(0, (*candidate).clone());
            }
            if updated == *existing {
                return false;
            }
            map.insert(reading.to_string(), updated);
            true
        }
        None if reorder_only => {
            debug!(reading = %reading, "unversioned history reading dropped");
            false
        }
        None => {
            map.insert(
                reading.to_string(),
                filtered.into_iter().cloned().collect(),
            );
            true
        }
    }
}

/// Apply a deletion record: remove the listed candidates from the
/// entry, dropping the entry entirely once empty.
fn delete_candidates(map: &mut HashMap<String, Vec<String>>, reading: &str, candidates: &[String]) {
    let Some(list) = map.get_mut(reading) else {
        return;
    };
    list.retain(|c| !candidates.contains(c));
    if list.is_empty() {
        map.remove(reading);
    }
}
