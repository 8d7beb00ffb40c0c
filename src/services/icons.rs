use crate::config::IconsConfig;
use crate::events::Slot;
use std::path::{Path, PathBuf};

/// Пара иконок on/off на каждый слот в одном каталоге
#[derive(Debug, Clone)]
pub struct IconSet {
    dir: PathBuf,
}

impl IconSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &IconsConfig) -> Self {
        Self::new(config.dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slot: Slot, is_on: bool) -> PathBuf {
        let suffix = if is_on { "on" } else { "off" };
        self.dir.join(format!("{}-{}.png", slot.icon_stem(), suffix))
    }

    /// Файлы иконок, которых нет на диске
    pub fn missing(&self) -> Vec<PathBuf> {
        Slot::ALL
            .iter()
            .flat_map(|slot| [self.path_for(*slot, true), self.path_for(*slot, false)])
            .filter(|path| !path.is_file())
            .collect()
    }
}
