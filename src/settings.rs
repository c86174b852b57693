// ⚙️ App Settings - Display preferences for the running session
//
// Stored as JSON ({"darkMode": false, "textSize": "normal", "language": "id"})
// so the binaries can remember the last choice between runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
}

impl TextSize {
    pub fn next(&self) -> Self {
        match self {
            TextSize::Small => TextSize::Normal,
            TextSize::Normal => TextSize::Large,
            TextSize::Large => TextSize::Small,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TextSize::Small => "small",
            TextSize::Normal => "normal",
            TextSize::Large => "large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bahasa Indonesia
    #[default]
    Id,
    En,
}

impl Language {
    pub fn toggle(&self) -> Self {
        match self {
            Language::Id => Language::En,
            Language::En => Language::Id,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub text_size: TextSize,
    pub language: Language,
}

/// One settings field update, applied by `AppSettings::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum SettingChange {
    DarkMode(bool),
    TextSize(TextSize),
    Language(Language),
}

impl AppSettings {
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::DarkMode(on) => self.dark_mode = on,
            SettingChange::TextSize(size) => self.text_size = size,
            SettingChange::Language(language) => self.language = language,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read settings file: {:?}", path.as_ref()))?;

        let settings: AppSettings =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!("using default settings: {:#}", e);
                AppSettings::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write settings file: {:?}", path.as_ref()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert!(!settings.dark_mode);
        assert_eq!(settings.text_size, TextSize::Normal);
        assert_eq!(settings.language, Language::Id);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"darkMode": false, "textSize": "normal", "language": "id"})
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.text_size, TextSize::Normal);
    }

    #[test]
    fn test_apply_changes() {
        let mut settings = AppSettings::default();
        settings.apply(SettingChange::DarkMode(true));
        settings.apply(SettingChange::TextSize(TextSize::Large));
        settings.apply(SettingChange::Language(Language::En));

        assert!(settings.dark_mode);
        assert_eq!(settings.text_size, TextSize::Large);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn test_setting_change_json() {
        let change: SettingChange =
            serde_json::from_str(r#"{"key": "textSize", "value": "small"}"#).unwrap();
        assert_eq!(change, SettingChange::TextSize(TextSize::Small));
    }

    #[test]
    fn test_cycles() {
        assert_eq!(TextSize::Large.next(), TextSize::Small);
        assert_eq!(Language::Id.toggle(), Language::En);
        assert_eq!(Language::En.toggle().code(), "id");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "tuition_settings_{}.json",
            std::process::id()
        ));
        let settings = AppSettings {
            dark_mode: true,
            text_size: TextSize::Small,
            language: Language::En,
        };

        settings.save(&path).unwrap();
        let loaded = AppSettings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = AppSettings::load_or_default("/nonexistent/settings.json");
        assert_eq!(settings, AppSettings::default());
    }
}
