use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WPM: u32 = 300;
pub const MIN_WPM: u32 = 100;
pub const MAX_WPM: u32 = 1000;
pub const WPM_STEP: u32 = 50;

/// Clamp a words-per-minute value into the supported range.
pub fn clamp_wpm(wpm: u32) -> u32 {
    wpm.clamp(MIN_WPM, MAX_WPM)
}

/// Read-mode (RSVP) preferences. Persisted separately from
/// [`TypingSettings`]; the two modes never share a settings slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingSettings {
    pub wpm: u32,
    pub show_orp: bool,
    pub use_punctuation: bool,
    pub show_progress: bool,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            show_orp: true,
            use_punctuation: true,
            show_progress: false,
        }
    }
}

/// Type-mode preferences, phrased as what the reference text keeps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypingSettings {
    pub include_periods: bool,
    pub include_punctuation: bool,
    pub include_capitalization: bool,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            include_periods: true,
            include_punctuation: true,
            include_capitalization: true,
        }
    }
}

pub trait SettingsStore {
    fn load_reading(&self) -> ReadingSettings;
    fn save_reading(&self, settings: &ReadingSettings) -> std::io::Result<()>;
    fn load_typing(&self) -> TypingSettings;
    fn save_typing(&self, settings: &TypingSettings) -> std::io::Result<()>;
}

/// JSON files under the project config dir, one per mode.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    dir: PathBuf,
}

impl FileSettingsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let dir = if let Some(pd) = ProjectDirs::from("", "", "lexio") {
            pd.config_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        };
        Self { dir }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn load_file<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        if let Ok(bytes) = fs::read(self.dir.join(name)) {
            if let Ok(value) = serde_json::from_slice::<T>(&bytes) {
                return value;
            }
        }
        T::default()
    }

    fn save_file<T: Serialize>(&self, name: &str, value: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(value).unwrap_or_default();
        fs::write(self.dir.join(name), data)
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load_reading(&self) -> ReadingSettings {
        self.load_file("reading.json")
    }

    fn save_reading(&self, settings: &ReadingSettings) -> std::io::Result<()> {
        self.save_file("reading.json", settings)
    }

    fn load_typing(&self) -> TypingSettings {
        self.load_file("typing.json")
    }

    fn save_typing(&self, settings: &TypingSettings) -> std::io::Result<()> {
        self.save_file("typing.json", settings)
    }
}
