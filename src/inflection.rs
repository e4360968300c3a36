//! Table-driven okurigana (inflection) matching.
//!
//! Stem entries carry candidates like "書k" or "知らs": a fixed head, an
//! optional fixed kana portion, and a one-character tag selecting a row
//! of the conjugation table. The matcher grades the user-typed
//! continuation against that row with a three-valued outcome.

use crate::unicode::{is_dakuten_pair, is_hiragana};

/// Tag characters selecting a conjugation row. Part of the inflectable
/// tail of a stored candidate, never typed by the user.
pub const TAG_CHARS: &str = "1iIkKgsStnbmrwW235";

/// Per-tag slots of valid suffix realizations. `None` marks a slot the
/// conjugation class does not have; an empty string marks a bare stem
/// that stands on its own once anything follows it.
static CONJUGATIONS: &[(char, &[Option<&str>])] = &[
    ('1', &[
        Some(""), Some("る"), Some("れば"), Some("ろ"), Some("よう"), Some("て"), Some("た"),
        Some("な"), Some("た"), Some("ま"), Some("ず"), None, None,
    ]),
    ('i', &[
        Some("く"), Some("い"), Some("ければ"), None, Some("かろう"), Some("くて"), Some("かった"),
        None, None, None, None, None, None, Some(""), Some("さ"), Some("み"), Some("げ"),
        Some("そう"),
    ]),
    // 小さい, 大きい
    ('I', &[
        Some("く"), Some("い"), Some("ければ"), None, Some("かろう"), Some("くて"), Some("かった"),
        None, None, None, None, None, None, Some(""), Some("さ"), Some("み"), Some("げ"),
        Some("そう"), Some("な"),
    ]),
    ('k', &[
        Some("き"), Some("く"), Some("けば"), Some("け"), Some("こう"), Some("いて"), Some("いた"),
        Some("かな"), Some("きた"), Some("きま"), Some("かず"), Some("かせ"), Some("かれ"),
    ]),
    // 行く
    ('K', &[
        Some("き"), Some("く"), Some("けば"), Some("け"), Some("こう"), Some("って"), Some("った"),
        Some("かな"), Some("きた"), Some("きま"), Some("かず"), Some("かせ"), Some("かれ"),
    ]),
    ('g', &[
        Some("ぎ"), Some("ぐ"), Some("げば"), Some("げ"), Some("ごう"), Some("いで"), Some("いだ"),
        Some("がな"), Some("ぎた"), Some("ぎま"), Some("がず"), Some("がせ"), Some("がれ"),
    ]),
    ('s', &[
        Some("し"), Some("す"), Some("せば"), Some("せ"), Some("そう"), Some("して"), Some("した"),
        Some("さな"), Some("した"), Some("しま"), Some("さず"), Some("させ"), Some("され"),
    ]),
    // 欲S
    ('S', &[
        Some("し"), Some("する"), Some("すれば"), Some("しろ"), Some("しよう"), Some("して"),
        Some("した"), Some("しな"), Some("した"), Some("しま"), Some("せず"), Some("させ"),
        Some("され"),
    ]),
    ('t', &[
        Some("ち"), Some("つ"), Some("てば"), Some("て"), Some("とう"), Some("って"), Some("った"),
        Some("たな"), Some("ちた"), Some("ちま"), Some("たず"), Some("たせ"), Some("たれ"),
    ]),
    ('n', &[
        Some("に"), Some("ぬ"), Some("ねば"), Some("ね"), Some("のう"), Some("んで"), Some("んだ"),
        Some("なな"), Some("にた"), Some("にま"), Some("なず"), Some("なせ"), Some("なれ"),
    ]),
    ('b', &[
        Some("び"), Some("ぶ"), Some("べば"), Some("べ"), Some("ぼう"), Some("んで"), Some("んだ"),
        Some("ばな"), Some("びた"), Some("びま"), Some("ばず"), Some("ばせ"), Some("ばれ"),
    ]),
    ('m', &[
        Some("み"), Some("む"), Some("めば"), Some("め"), Some("もう"), Some("んで"), Some("んだ"),
        Some("まな"), Some("みた"), Some("みま"), Some("まず"), Some("ませ"), Some("まれ"),
    ]),
    ('r', &[
        Some("り"), Some("る"), Some("れば"), Some("れ"), Some("ろう"), Some("って"), Some("った"),
        Some("らな"), Some("りた"), Some("りま"), Some("らず"), Some("らせ"), Some("られ"),
    ]),
    ('w', &[
        Some("い"), Some("う"), Some("えば"), Some("え"), Some("おう"), Some("って"), Some("った"),
        Some("わな"), Some("いた"), Some("いま"), Some("わず"), Some("わせ"), Some("われ"),
    ]),
    // 問う, 請う, 乞う
    ('W', &[
        Some("い"), Some("う"), Some("えば"), Some("え"), Some("おう"), Some("うて"), Some("うた"),
        Some("わな"), Some("いた"), Some("いま"), Some("わず"), Some("わせ"), Some("われ"),
    ]),
    // きて
    ('2', &[
        Some(""), None, None, None, None, Some("て"), Some("た"), None, Some("た"), Some("ま"),
        None, None, None,
    ]),
    // くる
    ('3', &[
        None, Some("る"), Some("れば"), None, None, None, None, None, None, None, None, None,
        None,
    ]),
    // こい
    ('5', &[
        None, None, None, Some("い"), Some("よう"), None, None, Some("な"), None, None,
        Some("ず"), Some("させ"), Some("られ"),
    ]),
];

/// Outcome of matching typed text against a candidate's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OkuriMatch {
    /// The typed text cannot extend this candidate.
    Invalid,
    /// The typed text is a valid prefix of some inflected form.
    Incomplete,
    /// The typed text realizes a recognized inflected form, possibly
    /// with trailing characters already consumed.
    Complete,
}

fn conjugation_row(tag: char) -> Option<&'static [Option<&'static str>]> {
    CONJUGATIONS
        .iter()
        .find(|&&(t, _)| t == tag)
        .map(|&(_, row)| row)
}

/// Split a candidate into its fixed head and inflectable tail — the
/// trailing run of hiragana or tag characters ("知らs" → ("知", "らs")).
pub fn split_inflectable(candidate: &str) -> (&str, &str) {
    let mut split = candidate.len();
    for (idx, c) in candidate.char_indices().rev() {
        if is_hiragana(c) || TAG_CHARS.contains(c) {
            split = idx;
        } else {
            break;
        }
    }
    candidate.split_at(split)
}

/// Whether some longer form in the row extends `form`. A form that
/// other forms extend cannot close a word by itself: extra typed text
/// past it should have matched through the longer form instead.
fn is_extensible(form: &str, row: &[Option<&str>]) -> bool {
    row.iter()
        .flatten()
        .any(|g| g.len() > form.len() && g.starts_with(form))
}

/// Grade the user-typed continuation `typed` against a candidate's
/// inflectable tail.
///
/// The tail's trailing tag character (if any) selects the conjugation
/// row; the rest of the tail is compared literally, tolerating a
/// voicing-only mismatch on the final typed character unless `strict`.
/// The remainder is then scanned against the row's forms from longest
/// to shortest.
pub fn match_okurigana(tail: &str, typed: &str, strict: bool) -> OkuriMatch {
    let (fixed, tag) = match tail.chars().last() {
        Some(c) if TAG_CHARS.contains(c) => (&tail[..tail.len() - c.len_utf8()], Some(c)),
        _ => (tail, None),
    };

    let fixed_chars: Vec<char> = fixed.chars().collect();
    let typed_chars: Vec<char> = typed.chars().collect();
    for (i, (&f, &t)) in fixed_chars.iter().zip(typed_chars.iter()).enumerate() {
        if f == t {
            continue;
        }
        if !strict && i + 1 == typed_chars.len() && is_dakuten_pair(f, t) {
            return OkuriMatch::Incomplete;
        }
        return OkuriMatch::Invalid;
    }
    if typed_chars.len() < fixed_chars.len() {
        return OkuriMatch::Incomplete;
    }
    let rest: String = typed_chars[fixed_chars.len()..].iter().collect();

    let Some(row) = tag.and_then(conjugation_row) else {
        // No inflection: the fixed suffix is the whole word.
        return if rest.is_empty() {
            OkuriMatch::Complete
        } else {
            OkuriMatch::Invalid
        };
    };

    if rest.is_empty() {
        return OkuriMatch::Incomplete;
    }

    let mut forms: Vec<&str> = row.iter().flatten().copied().collect();
    forms.sort_by_key(|f| std::cmp::Reverse(f.chars().count()));

    for form in forms {
        if form.is_empty() {
            // Bare stem used directly: complete once anything is typed.
            return OkuriMatch::Complete;
        }
        if form == rest {
            return if is_extensible(form, row) {
                OkuriMatch::Incomplete
            } else {
                OkuriMatch::Complete
            };
        }
        if form.starts_with(rest.as_str()) {
            return OkuriMatch::Incomplete;
        }
        if rest.starts_with(form) && !is_extensible(form, row) {
            return OkuriMatch::Complete;
        }
    }
    OkuriMatch::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_inflectable() {
        assert_eq!(split_inflectable("書k"), ("書", "k"));
        assert_eq!(split_inflectable("知らs"), ("知", "らs"));
        assert_eq!(split_inflectable("大きi"), ("大", "きi"));
        assert_eq!(split_inflectable("東京"), ("東京", ""));
        assert_eq!(split_inflectable("取り"), ("取", "り"));
    }

    #[test]
    fn test_three_valued_scenarios() {
        // 書k: き is still growing, きます closes, きぬ is no form.
        assert_eq!(match_okurigana("k", "き", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("k", "きます", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("k", "きぬ", false), OkuriMatch::Invalid);
    }

    #[test]
    fn test_exact_forms() {
        assert_eq!(match_okurigana("k", "いて", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("k", "く", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("k", "かない", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("k", "い", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("k", "か", false), OkuriMatch::Incomplete);
    }

    #[test]
    fn test_empty_typed_is_incomplete() {
        assert_eq!(match_okurigana("k", "", false), OkuriMatch::Incomplete);
    }

    #[test]
    fn test_fixed_portion() {
        // 知らs
        assert_eq!(match_okurigana("らs", "ら", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("らs", "らして", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("らs", "りして", false), OkuriMatch::Invalid);
    }

    #[test]
    fn test_no_tag_fixed_suffix_only() {
        assert_eq!(match_okurigana("り", "り", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("り", "", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("り", "りた", false), OkuriMatch::Invalid);
        assert_eq!(match_okurigana("", "きます", false), OkuriMatch::Invalid);
        assert_eq!(match_okurigana("", "", false), OkuriMatch::Complete);
    }

    #[test]
    fn test_dakuten_tolerance() {
        // 高札か vs typed が: voicing alternation at the final compared
        // character is tolerated only in relaxed mode.
        assert_eq!(match_okurigana("か", "が", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("か", "が", true), OkuriMatch::Invalid);
        // Mismatch with further typed text is never tolerated.
        assert_eq!(match_okurigana("かk", "がき", false), OkuriMatch::Invalid);
    }

    #[test]
    fn test_adjective_rows() {
        assert_eq!(match_okurigana("i", "い", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("i", "かっ", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("i", "さ", false), OkuriMatch::Complete);
        // Empty slot: bare stem + anything unmatched is complete.
        assert_eq!(match_okurigana("i", "を", false), OkuriMatch::Complete);
    }

    #[test]
    fn test_suru_row() {
        assert_eq!(match_okurigana("S", "する", false), OkuriMatch::Complete);
        assert_eq!(match_okurigana("S", "すれ", false), OkuriMatch::Incomplete);
        assert_eq!(match_okurigana("S", "しました", false), OkuriMatch::Complete);
    }
}
