//! Incremental reading-window lookup.
//!
//! A lookup either finds the longest dictionary reading ending at the
//! cursor (the plain case, with a digit-run → placeholder collapse for
//! templated counter entries) or, when a stem marker sits in the
//! window, matches the typed okurigana against every candidate of the
//! longest stem reading (the suffix case). Either way the session
//! state is replaced in full; a miss leaves it reset.

use std::collections::HashSet;

use tracing::debug;

use crate::inflection::{match_okurigana, split_inflectable, OkuriMatch};
use crate::numeric::{substitute_number, NUMBER_PLACEHOLDER};
use crate::unicode::{is_hiragana, is_okuri_punct, is_reading_char, strip_stem_marker, STEM_MARKER};

use super::{ConversionDictionary, MatchState};

impl ConversionDictionary {
    /// Find the longest match ending at `cursor` within
    /// `buffer[anchor..cursor]` and return the current candidate text
    /// (empty on a miss). Positions are character indices.
    pub fn lookup(&mut self, buffer: &str, cursor: usize, anchor: usize) -> String {
        self.reset();
        let chars: Vec<char> = buffer.chars().collect();
        let cursor = cursor.min(chars.len());
        let anchor = anchor.min(cursor);
        if anchor == cursor {
            return String::new();
        }

        let marker = chars[anchor..cursor]
            .iter()
            .rposition(|&c| c == STEM_MARKER)
            .map(|rel| anchor + rel);
        if let Some(marker) = marker {
            if let Some((suffix, end)) = okurigana_span(&chars, marker, cursor) {
                self.lookup_suffix(&chars, marker, anchor, &suffix, end);
                return self.current();
            }
        }
        self.lookup_plain(&chars, cursor, anchor);
        self.current()
    }

    /// Plain case: grow the window backward from the cursor, keeping
    /// the longest reading the store knows. A contiguous digit run at
    /// the start of the window is collapsed to the template
    /// placeholder before probing.
    fn lookup_plain(&mut self, chars: &[char], cursor: usize, anchor: usize) {
        let mut in_digits = false;
        let mut best: Option<(usize, String, Option<String>)> = None;
        for start in (anchor..cursor).rev() {
            let c = chars[start];
            if c.is_ascii_digit() {
                in_digits = true;
            } else if in_digits {
                // The digit run must lead the window.
                break;
            } else if !is_reading_char(c) {
                break;
            }
            let (key, digits) = collapse_leading_digits(&chars[start..cursor]);
            if self.active.contains_key(&key) {
                best = Some((start, key, digits));
            }
        }
        let Some((start, key, digits)) = best else {
            return;
        };

        let stored = &self.active[&key];
        let candidates: Vec<String> = stored
            .iter()
            .map(|candidate| {
                let display = strip_stem_marker(candidate);
                match &digits {
                    Some(run) => substitute_number(display, run),
                    None => display.to_string(),
                }
            })
            .collect();
        debug!(reading = %key, candidates = candidates.len(), "plain match");
        self.state = MatchState {
            reading: chars[start..cursor].iter().collect(),
            completed: vec![true; candidates.len()],
            candidates,
            stored_key: Some(key),
            number: digits,
            ..MatchState::default()
        };
    }

    /// Suffix case: find the longest stem reading ending at the
    /// marker, then grade the typed okurigana against each of its
    /// candidates. Complete matches rank before incomplete ones, with
    /// surfaces deduplicated and each display position mapped back to
    /// its stored candidate index.
    fn lookup_suffix(
        &mut self,
        chars: &[char],
        marker: usize,
        anchor: usize,
        suffix: &str,
        end: usize,
    ) {
        let mut best: Option<(usize, String)> = None;
        for start in (anchor..marker).rev() {
            let c = chars[start];
            if !is_reading_char(c) || c == STEM_MARKER {
                break;
            }
            let key: String = chars[start..=marker].iter().collect();
            if self.active.contains_key(&key) {
                best = Some((start, key));
            }
        }
        let Some((start, key)) = best else {
            return;
        };

        let mut complete: Vec<(String, usize)> = Vec::new();
        let mut incomplete: Vec<(String, usize)> = Vec::new();
        for (idx, candidate) in self.active[&key].iter().enumerate() {
            let (head, tail) = split_inflectable(candidate);
            let surface = format!("{head}{suffix}");
            match match_okurigana(tail, suffix, self.strict_voicing) {
                OkuriMatch::Complete => complete.push((surface, idx)),
                OkuriMatch::Incomplete => incomplete.push((surface, idx)),
                OkuriMatch::Invalid => {}
            }
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut completed = Vec::new();
        let mut order = Vec::new();
        for (is_complete, bucket) in [(true, complete), (false, incomplete)] {
            for (surface, idx) in bucket {
                if seen.insert(surface.clone()) {
                    candidates.push(surface);
                    completed.push(is_complete);
                    order.push(idx);
                }
            }
        }
        if candidates.is_empty() {
            return;
        }
        debug!(
            stem = %key,
            suffix = %suffix,
            candidates = candidates.len(),
            "okurigana match"
        );
        self.state = MatchState {
            reading: chars[start..end].iter().collect(),
            candidates,
            completed,
            stored_key: Some(key),
            order: Some(order),
            ..MatchState::default()
        };
    }
}

/// Validate the span between the stem marker and the cursor as typed
/// okurigana: pure hiragana, optionally closed by one punctuation
/// character. Without a closing punctuation the word is extended
/// forward past the cursor to its natural end. Returns the typed
/// suffix and the end position the match covers.
fn okurigana_span(chars: &[char], marker: usize, cursor: usize) -> Option<(String, usize)> {
    let span = &chars[marker + 1..cursor];
    if let Some((&last, body)) = span.split_last() {
        if is_okuri_punct(last) {
            return body
                .iter()
                .all(|&c| is_hiragana(c))
                .then(|| (body.iter().collect(), cursor - 1));
        }
    }
    if !span.iter().all(|&c| is_hiragana(c)) {
        return None;
    }
    let mut end = cursor;
    while end < chars.len() && is_hiragana(chars[end]) {
        end += 1;
    }
    Some((chars[marker + 1..end].iter().collect(), end))
}

/// Collapse a leading ASCII digit run to the template placeholder,
/// returning the probe key and the collapsed digits.
fn collapse_leading_digits(window: &[char]) -> (String, Option<String>) {
    let run = window
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if run == 0 {
        return (window.iter().collect(), None);
    }
    let mut key = String::with_capacity(window.len());
    key.push(NUMBER_PLACEHOLDER);
    key.extend(&window[run..]);
    (key, Some(window[..run].iter().collect()))
}
