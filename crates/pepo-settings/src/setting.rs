//! Setting definitions and value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SettingType {
    /// Boolean value (on/off)
    Bool = 1,
    /// Integer value
    Int = 2,
    /// String value
    String = 3,
}

impl SettingType {
    /// Get the display name for this type
    pub fn name(&self) -> &'static str {
        match self {
            SettingType::Bool => "bool",
            SettingType::Int => "int",
            SettingType::String => "string",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i32),
    /// String value
    String(String),
}

impl SettingValue {
    /// Get the type of this value
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Bool(_) => SettingType::Bool,
            SettingValue::Int(_) => SettingType::Int,
            SettingValue::String(_) => SettingType::String,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            SettingValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Try to get as int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            SettingValue::Int(v) => Some(*v),
            SettingValue::Bool(v) => Some(if *v { 1 } else { 0 }),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this value can be stored in a setting of the target type
    pub fn is_compatible_with(&self, target_type: SettingType) -> bool {
        matches!(
            (self, target_type),
            (SettingValue::Bool(_), SettingType::Bool)
                | (SettingValue::Int(_), SettingType::Int)
                | (SettingValue::String(_), SettingType::String)
                | (SettingValue::Bool(_), SettingType::Int)
                | (SettingValue::Int(_), SettingType::Bool)
        )
    }

    /// Parse user text into a value of the given type
    ///
    /// Booleans accept `on/off`, `true/false`, `yes/no` and `1/0` in any case.
    pub fn parse(setting_type: SettingType, text: &str) -> Option<SettingValue> {
        let text = text.trim();
        match setting_type {
            SettingType::Bool => match text.to_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => Some(SettingValue::Bool(true)),
                "off" | "false" | "no" | "0" => Some(SettingValue::Bool(false)),
                _ => None,
            },
            SettingType::Int => text.parse().ok().map(SettingValue::Int),
            SettingType::String => Some(SettingValue::String(text.to_string())),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", if *b { "on" } else { "off" }),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(v)
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::String(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::String(v.to_string())
    }
}

/// Metadata for a setting definition
#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    /// Stable identifier, also the index into the settings table
    pub id: u16,
    /// Name of the setting (e.g., "suggestion_sensitivity")
    pub name: &'static str,
    /// Type of the setting
    pub setting_type: SettingType,
    /// Default value (string settings resolve theirs via `get_string_default`)
    pub default: SettingValue,
    /// Minimum value (for integer settings)
    pub min: Option<i32>,
    /// Maximum value (for integer settings)
    pub max: Option<i32>,
    /// One-line description shown by `get` and `settings`
    pub description: &'static str,
}

impl Setting {
    /// Check a value against this setting's range
    pub fn check_range(&self, value: &SettingValue) -> Result<(), String> {
        if self.setting_type != SettingType::Int {
            return Ok(());
        }
        if let (Some(v), Some(min), Some(max)) = (value.as_int(), self.min, self.max) {
            if v < min || v > max {
                return Err(format!("value {} is outside range [{}, {}]", v, min, max));
            }
        }
        Ok(())
    }
}
