//! Character-level Unicode classification for Japanese readings.

/// Sentinel marking a reading as a verb/adjective stem that still
/// needs an okurigana suffix ("か―" for 書く, 描く, ...).
pub const STEM_MARKER: char = '―';

/// Check the full Hiragana block (U+3040..U+309F). This includes a few
/// unassigned codepoints but those never appear in readings, so the
/// simpler block-level check is preferred over an exact range.
pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

/// Check the full Katakana block (U+30A0..U+30FF), which also covers
/// the prolonged sound mark ー (U+30FC).
pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

/// Characters that may appear in a stored reading: hiragana, katakana
/// (including ー), and the stem marker.
pub fn is_reading_char(c: char) -> bool {
    is_hiragana(c) || is_katakana(c) || c == STEM_MARKER
}

/// Punctuation that may close an inflected word typed after the stem
/// marker.
pub fn is_okuri_punct(c: char) -> bool {
    matches!(c, '、' | '。' | '，' | '．')
}

/// Strip one trailing stem marker for display.
pub fn strip_stem_marker(s: &str) -> &str {
    s.strip_suffix(STEM_MARKER).unwrap_or(s)
}

/// Convert a hiragana string to katakana. Non-hiragana characters are
/// passed through unchanged.
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if ('\u{3041}'..='\u{3096}').contains(&c) {
                char::from_u32(c as u32 + 0x60).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

const SEION: &str = "かきくけこさしすせそたちつてとはひふへほ";
const DAKUON: &str = "がぎぐげござじずぜぞだぢづでどばびぶべぼ";

/// Whether `a` and `b` differ only by a dakuten (voicing mark),
/// e.g. か/が or た/だ, in either direction.
pub fn is_dakuten_pair(a: char, b: char) -> bool {
    if a == b {
        return false;
    }
    let pos = |plain: char, voiced: char| {
        SEION
            .chars()
            .position(|c| c == plain)
            .zip(DAKUON.chars().position(|c| c == voiced))
            .is_some_and(|(p, v)| p == v)
    };
    pos(a, b) || pos(b, a)
}

// Kana grouped by vowel class, small kana included. ん and punctuation
// have no vowel and leave a following ー untouched.
const VOWEL_ROWS: &[(&str, char)] = &[
    ("ぁあかがさざただなはばぱまゃやらゎわ", 'あ'),
    ("ぃいきぎしじちぢにひびぴみりゐ", 'い'),
    ("ぅうくぐすずっつづぬふぶぷむゅゆるゔ", 'う'),
    ("ぇえけげせぜてでねへべぺめれゑ", 'え'),
    ("ぉおこごそぞとどのほぼぽもょよろを", 'お'),
];

fn plain_vowel(c: char) -> Option<char> {
    let katakana = ('\u{30A1}'..='\u{30F6}').contains(&c);
    let folded = if katakana {
        char::from_u32(c as u32 - 0x60)?
    } else {
        c
    };
    let vowel = VOWEL_ROWS
        .iter()
        .find(|(row, _)| row.contains(folded))
        .map(|&(_, v)| v)?;
    if katakana {
        char::from_u32(vowel as u32 + 0x60)
    } else {
        Some(vowel)
    }
}

/// Replace each long-vowel mark ー with the plain vowel of the kana
/// before it ("ラーメン" → "ラアメン"). A ー with no preceding kana
/// vowel is left as is. Historical input uses either spelling, so
/// readings are registered under both.
pub fn normalize_long_vowels(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        let pushed = if c == 'ー' {
            prev.and_then(plain_vowel).unwrap_or(c)
        } else {
            c
        };
        out.push(pushed);
        prev = Some(pushed);
    }
    out
}
