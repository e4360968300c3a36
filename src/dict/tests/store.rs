use tempfile::tempdir;

use super::*;

#[test]
fn load_basic_entry() {
    let dir = tempdir().unwrap();
    let mut dict = open_with_system(dir.path(), "きょう /今日/京/\n");
    assert_eq!(dict.lookup("きょう", 3, 0), "今日");
    assert_eq!(dict.reading(), "きょう");
    assert_eq!(dict.candidates(), ["今日", "京"]);
}

#[test]
fn later_layers_are_preferred() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    config.dictionaries.katakana =
        Some(write_dict(dir.path(), "katakana.dic", "きょう /キョウ/\n"));
    let mut dict = ConversionDictionary::open(&config);
    // Katakana loads first, so its candidates rank last.
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["今日", "京", "キョウ"]);
}

#[test]
fn user_dictionary_reorders_active_layer() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    config.dictionaries.user = Some(write_dict(dir.path(), "my.dic", "きょう /京/\n"));
    let mut dict = ConversionDictionary::open(&config);
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["京", "今日"]);
}

#[test]
fn last_incoming_candidate_is_most_preferred() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/\n");
    config.dictionaries.user =
        Some(write_dict(dir.path(), "my.dic", "きょう /京/教/\n"));
    let mut dict = ConversionDictionary::open(&config);
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["京", "教", "今日"]);
}

#[test]
fn self_referential_candidates_are_stripped() {
    let dir = tempdir().unwrap();
    let mut dict = open_with_system(dir.path(), "きょう /きょう/今日/\n");
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["今日"]);
}

#[test]
fn comments_blanks_and_malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let contents = "; restrained dictionary\n\nnospacehere\nきょう /今日/\n";
    let mut dict = open_with_system(dir.path(), contents);
    assert_eq!(dict.lookup("きょう", 3, 0), "今日");
    assert_eq!(dict.lookup("nospacehere", 11, 0), "");
}

#[test]
fn missing_files_are_not_fatal() {
    let dir = tempdir().unwrap();
    let mut config = EngineConfig::default();
    config.dictionaries.system = Some(dir.path().join("does-not-exist.dic"));
    let mut dict = ConversionDictionary::open(&config);
    assert_eq!(dict.lookup("きょう", 3, 0), "");
}

#[test]
fn unversioned_history_is_reorder_only() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    // No version marker: may reorder きょう, must not invent あした.
    config.dictionaries.history = Some(write_dict(
        dir.path(),
        "history.dic",
        "きょう /京/\nあした /明日/\n",
    ));
    let mut dict = ConversionDictionary::open(&config);
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["京", "今日"]);
    assert_eq!(dict.lookup("あした", 3, 0), "");
}

#[test]
fn versioned_history_is_fully_trusted() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    config.dictionaries.history = Some(write_dict(
        dir.path(),
        "history.dic",
        "ふるい /古い/\n; 1.1.0\nあした /明日/\n",
    ));
    let mut dict = ConversionDictionary::open(&config);
    // Before the marker: dropped. After: trusted.
    assert_eq!(dict.lookup("ふるい", 3, 0), "");
    assert_eq!(dict.lookup("あした", 3, 0), "明日");
}

#[test]
fn deletion_records_remove_candidates() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    config.dictionaries.history = Some(write_dict(
        dir.path(),
        "history.dic",
        "; 1.1.0\n-きょう /京/\n",
    ));
    let mut dict = ConversionDictionary::open(&config);
    dict.lookup("きょう", 3, 0);
    assert_eq!(dict.candidates(), ["今日"]);
}

#[test]
fn deleting_every_candidate_drops_the_entry() {
    let dir = tempdir().unwrap();
    let mut config = config_with_system(dir.path(), "きょう /今日/京/\n");
    config.dictionaries.history = Some(write_dict(
        dir.path(),
        "history.dic",
        "; 1.1.0\n-きょう /今日/京/\n",
    ));
    let mut dict = ConversionDictionary::open(&config);
    assert_eq!(dict.lookup("きょう", 3, 0), "");
}

#[test]
fn stem_reading_registers_marker_stripped_alias() {
    let dir = tempdir().unwrap();
    let dict = open_with_system(dir.path(), "か― /書k/\n");
    assert_eq!(dict.active["か"], ["か―"]);
}

#[test]
fn long_vowel_readings_register_both_spellings() {
    let dir = tempdir().unwrap();
    let mut dict = open_with_system(dir.path(), "らーめん /拉麺/\n");
    assert_eq!(dict.lookup("らーめん", 4, 0), "拉麺");
    assert_eq!(dict.lookup("らあめん", 4, 0), "拉麺");
}
