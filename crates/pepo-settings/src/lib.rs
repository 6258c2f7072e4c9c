//! Pepo Settings System
//!
//! Typed, range-checked, session-wide settings for the pepo shell.
//!
//! Every setting has a stable ID, a name, a type (`Bool`, `Int` or `String`),
//! a default and, for integers, an inclusive range. Writes that fail type or
//! range validation are rejected and leave the stored value unchanged.
//!
//! # Example
//!
//! ```rust
//! use pepo_settings::{GlobalSettings, id};
//!
//! let mut settings = GlobalSettings::new();
//! settings.set_int(id::suggestion_sensitivity, 5).unwrap();
//! assert!(settings.set_int(id::suggestion_sensitivity, 11).is_err());
//! assert_eq!(settings.get_int(id::suggestion_sensitivity), 5);
//! ```

mod definitions;
mod error;
mod setting;
mod store;

// Re-export main types
pub use definitions::{
    default_value, get_setting, get_setting_id, get_string_default, SETTINGS, SETTING_COUNT,
};
pub use error::SettingError;
pub use setting::{Setting, SettingType, SettingValue};
pub use store::{GlobalSettings, SerializedSetting};

/// Setting ID constants
pub mod id {
    pub use crate::definitions::id::*;
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::definitions::id;
    pub use crate::{GlobalSettings, Setting, SettingError, SettingType, SettingValue};
}
