mod store;

use std::path::{Path, PathBuf};

use crate::settings::EngineConfig;

use super::ConversionDictionary;

fn write_dict(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn config_with_system(dir: &Path, contents: &str) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.dictionaries.system = Some(write_dict(dir, "system.dic", contents));
    config
}

fn open_with_system(dir: &Path, contents: &str) -> ConversionDictionary {
    ConversionDictionary::open(&config_with_system(dir, contents))
}
