//! Numeral templating for readings.
//!
//! Counter words are stored once with a placeholder ("#こ" → "#個") and
//! matched against any typed digit run ("3こ", "128こ"). The lookup
//! collapses the run to the placeholder before probing the store and the
//! digits are substituted back into every returned candidate.

/// Placeholder character used by templated dictionary entries.
pub const NUMBER_PLACEHOLDER: char = '#';

/// Substitute a typed digit run into a templated string.
pub fn substitute_number(template: &str, digits: &str) -> String {
    let mut out = String::with_capacity(template.len() + digits.len());
    for c in template.chars() {
        if c == NUMBER_PLACEHOLDER {
            out.push_str(digits);
        } else {
            out.push(c);
        }
    }
    out
}
