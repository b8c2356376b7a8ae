use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User preferences stored alongside the children.
///
/// The key set is closed: only the keys named by [`SettingKey`] exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    snow_enabled: bool,
    music_enabled: bool,
    volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snow_enabled: true,
            music_enabled: false,
            volume: 0.5,
        }
    }
}

/// Recognized setting names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    SnowEnabled,
    MusicEnabled,
    Volume,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::SnowEnabled,
        SettingKey::MusicEnabled,
        SettingKey::Volume,
    ];

    /// The key as it appears in the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::SnowEnabled => "snowEnabled",
            SettingKey::MusicEnabled => "musicEnabled",
            SettingKey::Volume => "volume",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSetting(s.to_string()))
    }
}

/// A setting value: settings are either flags or numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
}

impl Settings {
    pub fn snow_enabled(&self) -> bool {
        self.snow_enabled
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::SnowEnabled => SettingValue::Bool(self.snow_enabled),
            SettingKey::MusicEnabled => SettingValue::Bool(self.music_enabled),
            SettingKey::Volume => SettingValue::Number(self.volume),
        }
    }

    /// Set a value, checking its type and range against the key.
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), ValidationError> {
        match (key, value) {
            (SettingKey::SnowEnabled, SettingValue::Bool(b)) => self.snow_enabled = b,
            (SettingKey::MusicEnabled, SettingValue::Bool(b)) => self.music_enabled = b,
            (SettingKey::Volume, SettingValue::Number(v)) => {
                if !(v.is_finite() && (0.0..=1.0).contains(&v)) {
                    return Err(ValidationError::SettingRange {
                        key: key.as_str(),
                        value: v,
                    });
                }
                self.volume = v;
            }
            (SettingKey::Volume, SettingValue::Bool(_)) => {
                return Err(ValidationError::SettingType {
                    key: key.as_str(),
                    expected: "number",
                })
            }
            (_, SettingValue::Number(_)) => {
                return Err(ValidationError::SettingType {
                    key: key.as_str(),
                    expected: "boolean",
                })
            }
        }
        Ok(())
    }

    /// Flip a boolean setting and return its new value.
    pub fn toggle(&mut self, key: SettingKey) -> Result<bool, ValidationError> {
        match self.get(key) {
            SettingValue::Bool(b) => {
                self.set(key, SettingValue::Bool(!b))?;
                Ok(!b)
            }
            SettingValue::Number(_) => Err(ValidationError::SettingType {
                key: key.as_str(),
                expected: "boolean",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.snow_enabled());
        assert!(!settings.music_enabled());
        assert_eq!(settings.volume(), 0.5);
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!("snowEnabled".parse::<SettingKey>(), Ok(SettingKey::SnowEnabled));
        assert_eq!(
            "confetti".parse::<SettingKey>(),
            Err(ValidationError::UnknownSetting("confetti".into()))
        );
    }

    #[test]
    fn test_set_checks_type_and_range() {
        let mut settings = Settings::default();
        settings
            .set(SettingKey::Volume, SettingValue::Number(0.8))
            .unwrap();
        assert_eq!(settings.volume(), 0.8);

        assert!(matches!(
            settings.set(SettingKey::Volume, SettingValue::Number(1.5)),
            Err(ValidationError::SettingRange { .. })
        ));
        assert!(matches!(
            settings.set(SettingKey::SnowEnabled, SettingValue::Number(1.0)),
            Err(ValidationError::SettingType { expected: "boolean", .. })
        ));
        assert_eq!(settings.volume(), 0.8);
        assert!(settings.snow_enabled());
    }

    #[test]
    fn test_toggle() {
        let mut settings = Settings::default();
        assert!(!settings.toggle(SettingKey::SnowEnabled).unwrap());
        assert!(!settings.snow_enabled());
        assert!(settings.toggle(SettingKey::Volume).is_err());
    }

    #[test]
    fn test_persisted_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"snowEnabled": true, "musicEnabled": false, "volume": 0.5})
        );
    }
}
