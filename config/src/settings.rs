use crate::ast::Value;
use smol_str::SmolStr;
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    String(String),
    Bool(bool),
    Number(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    String,
    Bool,
    Number,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingKind::String => "string",
            SettingKind::Bool => "bool",
            SettingKind::Number => "number",
        })
    }
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::String(_) => SettingKind::String,
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Number(_) => SettingKind::Number,
        }
    }

    /// Reads `text` as a value of `kind`, as typed on a command line.
    pub fn parse_as(kind: SettingKind, text: &str) -> Option<SettingValue> {
        match kind {
            SettingKind::String => Some(SettingValue::String(text.to_string())),
            SettingKind::Bool => match text {
                "true" | "on" | "yes" => Some(SettingValue::Bool(true)),
                "false" | "off" | "no" => Some(SettingValue::Bool(false)),
                _ => None,
            },
            SettingKind::Number => text.parse().ok().map(SettingValue::Number),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            SettingValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(value) => write!(f, "{value:?}"),
            SettingValue::Bool(value) => write!(f, "{value}"),
            SettingValue::Number(value) => write!(f, "{value}"),
        }
    }
}

impl From<Value> for SettingValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(value) => SettingValue::String(value),
            Value::Number(value) => SettingValue::Number(value),
            Value::Bool(value) => SettingValue::Bool(value),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Number(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Unknown setting '{0}'")]
    Unknown(String),
    #[error("Setting '{name}' expects a {expected}, got a {found}")]
    TypeMismatch {
        name: String,
        expected: SettingKind,
        found: SettingKind,
    },
    #[error("Setting '{name}' is already registered as a {existing}")]
    Conflict { name: String, existing: SettingKind },
    #[error("Can't read '{text}' as a {expected} for '{name}'")]
    Unparsable {
        name: String,
        text: String,
        expected: SettingKind,
    },
}

/// Named settings whose kind is fixed by the value they were registered
/// with.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: BTreeMap<SmolStr, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings the editor itself reads.
    pub fn with_defaults() -> Self {
        let mut settings = Self::new();
        let defaults: [(&str, SettingValue); 6] = [
            ("tab_width", 4i64.into()),
            ("tab_to_spaces", true.into()),
            ("numbers", true.into()),
            ("indent", true.into()),
            ("scroll_jump", 15i64.into()),
            ("light", false.into()),
        ];
        for (name, value) in defaults {
            settings.values.insert(name.into(), value);
        }
        settings
    }

    /// Registers `name` with a default. Registering again with the same kind
    /// keeps the current value.
    pub fn register(
        &mut self,
        name: &str,
        default: impl Into<SettingValue>,
    ) -> Result<(), SettingsError> {
        let default = default.into();
        match self.values.get(name) {
            Some(existing) if existing.kind() != default.kind() => Err(SettingsError::Conflict {
                name: name.to_string(),
                existing: existing.kind(),
            }),
            Some(_) => Ok(()),
            None => {
                self.values.insert(name.into(), default);
                Ok(())
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Replaces the value of a registered setting, returning the old one.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<SettingValue>,
    ) -> Result<SettingValue, SettingsError> {
        let value = value.into();
        let slot = self
            .values
            .get_mut(name)
            .ok_or_else(|| SettingsError::Unknown(name.to_string()))?;
        if slot.kind() != value.kind() {
            return Err(SettingsError::TypeMismatch {
                name: name.to_string(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        Ok(std::mem::replace(slot, value))
    }

    /// Sets a registered setting, or registers an unknown one with `value`
    /// as its default. Used for user settings from rc files and scripts.
    pub fn assign(&mut self, name: &str, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        let value = value.into();
        if self.contains(name) {
            self.set(name, value).map(|_| ())
        } else {
            self.register(name, value)
        }
    }

    /// Sets a registered setting from command line text.
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<(), SettingsError> {
        let kind = self
            .get(name)
            .map(SettingValue::kind)
            .ok_or_else(|| SettingsError::Unknown(name.to_string()))?;
        let value = SettingValue::parse_as(kind, text).ok_or_else(|| SettingsError::Unparsable {
            name: name.to_string(),
            text: text.to_string(),
            expected: kind,
        })?;
        self.set(name, value).map(|_| ())
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(SettingValue::as_bool)
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SettingValue::as_number)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(SettingValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_typed() {
        let settings = Settings::with_defaults();
        assert_eq!(settings.number("tab_width"), Some(4));
        assert_eq!(settings.bool("tab_to_spaces"), Some(true));
        assert_eq!(settings.number("scroll_jump"), Some(15));
        assert_eq!(settings.bool("light"), Some(false));
        assert_eq!(settings.bool("tab_width"), None);
    }

    #[test]
    fn set_checks_name_and_kind() {
        let mut settings = Settings::with_defaults();
        assert_eq!(settings.set("tab_width", 2i64), Ok(SettingValue::Number(4)));
        assert_eq!(
            settings.set("tab_width", true),
            Err(SettingsError::TypeMismatch {
                name: "tab_width".into(),
                expected: SettingKind::Number,
                found: SettingKind::Bool,
            })
        );
        assert_eq!(
            settings.set("nope", 1i64),
            Err(SettingsError::Unknown("nope".into()))
        );
    }

    #[test]
    fn register_conflicts_on_kind() {
        let mut settings = Settings::with_defaults();
        assert!(settings.register("tab_width", 8i64).is_ok());
        assert_eq!(settings.number("tab_width"), Some(4));
        assert!(matches!(
            settings.register("tab_width", "wide"),
            Err(SettingsError::Conflict { .. })
        ));
    }

    #[test]
    fn assign_registers_user_settings() {
        let mut settings = Settings::new();
        settings.assign("theme", "dark").unwrap();
        assert_eq!(settings.string("theme"), Some("dark"));
        settings.assign("theme", "light").unwrap();
        assert_eq!(settings.string("theme"), Some("light"));
        assert!(settings.assign("theme", 3i64).is_err());
    }

    #[test]
    fn set_from_str_parses_by_kind() {
        let mut settings = Settings::with_defaults();
        settings.set_from_str("tab_width", "8").unwrap();
        settings.set_from_str("numbers", "off").unwrap();
        assert_eq!(settings.number("tab_width"), Some(8));
        assert_eq!(settings.bool("numbers"), Some(false));
        assert_eq!(
            settings.set_from_str("tab_width", "eight").unwrap_err().to_string(),
            "Can't read 'eight' as a number for 'tab_width'"
        );
    }
}
