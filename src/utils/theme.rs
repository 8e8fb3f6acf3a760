use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, warn};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// String key-value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as a flat JSON object on disk. A missing or empty file
/// reads as no preferences at all.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let exists_and_non_empty = self.path.exists()
            && fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false);
        if !exists_and_non_empty {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Malformed preferences file {}", self.path.display()))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking the write.
        let mut prefs = self.load().unwrap_or_default();
        prefs.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&prefs)?)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}

/// Preferences that only live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Current theme plus the store it is persisted to.
pub struct ThemeSwitch<S: PreferenceStore> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeSwitch<S> {
    /// Picks the stored theme if there is one, otherwise follows the OS
    /// dark-mode signal. Store errors count as "nothing stored".
    pub fn init(store: S, os_prefers_dark: Option<bool>) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unreadable theme preference: {:#}", e);
                None
            }
        };

        let mut switch = ThemeSwitch { store, current: Theme::Light };
        match stored.as_deref() {
            Some("dark") => switch.apply(Theme::Dark),
            Some("light") => switch.apply(Theme::Light),
            _ if os_prefers_dark == Some(true) => switch.apply(Theme::Dark),
            _ => debug!("No theme preference, staying on {}", switch.current),
        }
        switch
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn toggle(&mut self) -> Theme {
        self.apply(self.current.toggled());
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply(&mut self, theme: Theme) {
        self.current = theme;
        if let Err(e) = self.store.set(THEME_KEY, theme.as_str()) {
            warn!("Theme preference not saved: {:#}", e);
        }
    }
}
