//! Setting definitions
//!
//! Setting indices are stable: they are used as the `id` and as the index
//! into `SETTINGS`.

use crate::setting::{Setting, SettingType, SettingValue};

/// Total number of settings
pub const SETTING_COUNT: usize = 5;

/// Setting indices
#[allow(non_upper_case_globals)]
pub mod id {
    pub const suggestion_sensitivity: u16 = 0;
    pub const sound: u16 = 1;
    pub const macro_depth_limit: u16 = 2;
    pub const cursor: u16 = 3;
    pub const echo_macros: u16 = 4;
}

/// Get a setting definition by ID
pub fn get_setting(id: u16) -> Option<&'static Setting> {
    SETTINGS.get(id as usize)
}

/// Get a setting ID by name
pub fn get_setting_id(name: &str) -> Option<u16> {
    SETTINGS.iter().find(|s| s.name == name).map(|s| s.id)
}

macro_rules! s_bool {
    ($id:expr, $name:expr, $default:expr, $descr:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Bool, default: SettingValue::Bool($default), min: None, max: None, description: $descr }
    };
}

macro_rules! s_int {
    ($id:expr, $name:expr, $default:expr, $min:expr, $max:expr, $descr:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::Int, default: SettingValue::Int($default), min: Some($min), max: Some($max), description: $descr }
    };
}

macro_rules! s_string {
    ($id:expr, $name:expr, $descr:expr) => {
        Setting { id: $id, name: $name, setting_type: SettingType::String, default: SettingValue::String(String::new()), min: None, max: None, description: $descr }
    };
}

/// All setting definitions
pub static SETTINGS: &[Setting] = &[
    s_int!(0, "suggestion_sensitivity", 3, 0, 10, "edit distance below which an unknown command is suggested"),
    s_bool!(1, "sound", false, "make outcome feedback audible"),
    s_int!(2, "macro_depth_limit", 32, 1, 1000, "maximum nesting of macros calling macros"),
    s_string!(3, "cursor", "prompt shown before each input line"),
    s_bool!(4, "echo_macros", false, "echo each macro line before it runs"),
];

/// String defaults for settings that have them
/// Resolved at runtime since a non-empty `String` cannot live in a static
pub fn get_string_default(id: u16) -> &'static str {
    match id {
        id::cursor => ">> ",
        _ => "",
    }
}

/// Resolve the default value of a setting
pub fn default_value(setting: &Setting) -> SettingValue {
    match setting.setting_type {
        SettingType::String => SettingValue::String(get_string_default(setting.id).to_string()),
        _ => setting.default.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_count() {
        assert_eq!(SETTINGS.len(), SETTING_COUNT);
    }

    #[test]
    fn test_get_setting_id() {
        assert_eq!(get_setting_id("suggestion_sensitivity"), Some(id::suggestion_sensitivity));
        assert_eq!(get_setting_id("cursor"), Some(id::cursor));
        assert_eq!(get_setting_id("nope"), None);
    }

    #[test]
    fn test_setting_indices_match() {
        for (idx, setting) in SETTINGS.iter().enumerate() {
            assert_eq!(setting.id as usize, idx, "Setting {} at index {} has mismatched id", setting.name, idx);
        }
    }

    #[test]
    fn test_defaults_within_range() {
        for setting in SETTINGS.iter() {
            assert_eq!(setting.default.setting_type(), setting.setting_type);
            assert!(setting.check_range(&default_value(setting)).is_ok(), "{}", setting.name);
        }
    }

    #[test]
    fn test_string_default() {
        let cursor = get_setting(id::cursor).unwrap();
        assert_eq!(default_value(cursor), SettingValue::String(">> ".to_string()));
    }
}
