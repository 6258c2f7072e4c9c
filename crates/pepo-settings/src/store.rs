//! Setting storage and retrieval

use serde::{Deserialize, Serialize};

use crate::definitions::{default_value, get_setting, get_setting_id, SETTINGS, SETTING_COUNT};
use crate::error::SettingError;
use crate::setting::{Setting, SettingValue};

// =============================================================================
// Global Settings Store
// =============================================================================

/// Session-wide settings store
/// Uses a Vec indexed by setting ID for O(1) access
#[derive(Debug)]
pub struct GlobalSettings {
    /// Current values (None = use default)
    values: Vec<Option<SettingValue>>,
    /// Tracks which settings have been modified
    changed: Vec<bool>,
}

impl GlobalSettings {
    /// Create a new global settings store with defaults
    pub fn new() -> Self {
        GlobalSettings {
            values: vec![None; SETTING_COUNT],
            changed: vec![false; SETTING_COUNT],
        }
    }

    /// Get a setting value, returning the default if not explicitly set
    pub fn get(&self, id: u16) -> Option<SettingValue> {
        let setting = get_setting(id)?;
        self.values[id as usize]
            .clone()
            .or_else(|| Some(default_value(setting)))
    }

    /// Get a setting value by name
    pub fn get_by_name(&self, name: &str) -> Result<SettingValue, SettingError> {
        let id = get_setting_id(name).ok_or_else(|| SettingError::not_found_name(name))?;
        self.get(id).ok_or_else(|| SettingError::not_found_id(id))
    }

    /// Check if a setting is explicitly defined (not using default)
    pub fn is_defined(&self, id: u16) -> bool {
        self.values.get(id as usize).map_or(false, |v| v.is_some())
    }

    /// Set a setting value
    ///
    /// The value is type- and range-checked; on error the stored value is unchanged.
    pub fn set(&mut self, id: u16, value: SettingValue) -> Result<(), SettingError> {
        let setting = get_setting(id).ok_or_else(|| SettingError::not_found_id(id))?;

        if !value.is_compatible_with(setting.setting_type) {
            return Err(SettingError::TypeMismatch {
                name: setting.name.to_string(),
                expected: setting.setting_type.name(),
                actual: value.setting_type().name(),
            });
        }

        setting
            .check_range(&value)
            .map_err(|reason| SettingError::InvalidValue {
                name: setting.name.to_string(),
                reason,
            })?;

        let idx = id as usize;
        if self.get(id).as_ref() != Some(&value) {
            self.changed[idx] = true;
        }
        self.values[idx] = Some(value);
        Ok(())
    }

    /// Set a setting from user text, parsing it according to the setting's type
    pub fn set_from_str(&mut self, name: &str, text: &str) -> Result<u16, SettingError> {
        let id = get_setting_id(name).ok_or_else(|| SettingError::not_found_name(name))?;
        let setting = get_setting(id).ok_or_else(|| SettingError::not_found_id(id))?;
        let value = SettingValue::parse(setting.setting_type, text).ok_or_else(|| {
            SettingError::Parse {
                name: setting.name.to_string(),
                input: text.to_string(),
                expected: setting.setting_type.name(),
            }
        })?;
        self.set(id, value)?;
        Ok(id)
    }

    /// Unset a setting (revert to default)
    pub fn unset(&mut self, id: u16) -> bool {
        let idx = id as usize;
        if idx >= SETTING_COUNT {
            return false;
        }
        let was_set = self.values[idx].take().is_some();
        if was_set {
            self.changed[idx] = true;
        }
        was_set
    }

    /// Reset all settings to defaults
    pub fn reset_all(&mut self) {
        for id in 0..SETTING_COUNT as u16 {
            self.unset(id);
        }
    }

    /// Check if a setting has changed since last check
    pub fn check_changed(&mut self, id: u16) -> bool {
        let idx = id as usize;
        if idx >= SETTING_COUNT {
            return false;
        }
        std::mem::take(&mut self.changed[idx])
    }

    /// Every setting with its current value (default if unset), in ID order
    pub fn export_all(&self) -> Vec<(&'static Setting, SettingValue)> {
        SETTINGS
            .iter()
            .map(|s| (s, self.get(s.id).unwrap_or_else(|| default_value(s))))
            .collect()
    }

    // =========================================================================
    // Type-Safe Getters
    // =========================================================================

    /// Get a boolean setting
    pub fn get_bool(&self, id: u16) -> bool {
        self.get(id).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Get an integer setting
    pub fn get_int(&self, id: u16) -> i32 {
        self.get(id).and_then(|v| v.as_int()).unwrap_or(0)
    }

    /// Get a string setting
    pub fn get_string(&self, id: u16) -> String {
        self.get(id)
            .and_then(|v| v.as_string().map(|s| s.to_string()))
            .unwrap_or_default()
    }

    // =========================================================================
    // Type-Safe Setters
    // =========================================================================

    /// Set a boolean setting
    pub fn set_bool(&mut self, id: u16, value: bool) -> Result<(), SettingError> {
        self.set(id, SettingValue::Bool(value))
    }

    /// Set an integer setting
    pub fn set_int(&mut self, id: u16, value: i32) -> Result<(), SettingError> {
        self.set(id, SettingValue::Int(value))
    }

    /// Set a string setting
    pub fn set_string(&mut self, id: u16, value: impl Into<String>) -> Result<(), SettingError> {
        self.set(id, SettingValue::String(value.into()))
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GlobalSettings {
    fn clone(&self) -> Self {
        GlobalSettings {
            values: self.values.clone(),
            changed: vec![false; SETTING_COUNT], // Don't clone changed state
        }
    }
}

// =============================================================================
// Serialization Support
// =============================================================================

/// Serialized setting entry, keyed by name so files survive ID renumbering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedSetting {
    pub name: String,
    pub value: SettingValue,
}

impl GlobalSettings {
    /// Apply a serialized list
    ///
    /// Every entry is validated first; nothing is applied if any entry is invalid.
    pub fn apply_serialized(&mut self, list: &[SerializedSetting]) -> Result<(), SettingError> {
        let mut staged = self.clone();
        for entry in list {
            let id = get_setting_id(&entry.name)
                .ok_or_else(|| SettingError::not_found_name(entry.name.as_str()))?;
            staged.set(id, entry.value.clone())?;
        }
        for entry in list {
            if let Some(id) = get_setting_id(&entry.name) {
                self.set(id, entry.value.clone())?;
            }
        }
        Ok(())
    }
}
