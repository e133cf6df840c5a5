use std::path::PathBuf;

use pooltix_domain::{
    CalendarKind, Catalog, CatalogError, DayCalendar, DigitStyle, TicketType,
    DEFAULT_UTC_OFFSET_MINUTES,
};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Stores user-configurable desk preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional storage root. Defaults to the application home directory.
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub calendar: CalendarKind,
    #[serde(default = "Config::default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub digits: DigitStyle,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replaces the built-in catalog when present.
    pub catalog: Option<Vec<TicketType>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            calendar: CalendarKind::default(),
            utc_offset_minutes: Self::default_utc_offset_minutes(),
            digits: DigitStyle::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            recent_limit: Self::default_recent_limit(),
            backup_retention: Self::default_backup_retention(),
            catalog: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::apply`].
    pub const KEYS: [&'static str; 7] = [
        "data_dir",
        "calendar",
        "utc_offset_minutes",
        "digits",
        "ui_color_enabled",
        "recent_limit",
        "backup_retention",
    ];

    pub fn default_utc_offset_minutes() -> i32 {
        DEFAULT_UTC_OFFSET_MINUTES
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_recent_limit() -> usize {
        10
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn day_calendar(&self) -> DayCalendar {
        DayCalendar::new(self.calendar, self.utc_offset_minutes, self.digits)
    }

    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(types) => Catalog::new(types.clone()),
            None => Ok(Catalog::standard()),
        }
    }

    pub fn resolve_data_dir(&self, home: &std::path::Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| home.to_path_buf())
    }

    /// Updates one scalar setting from its textual form.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "data_dir" => {
                self.data_dir = if value.is_empty() || value == "default" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "calendar" => {
                self.calendar = CalendarKind::parse(value).ok_or_else(|| {
                    ConfigError::Invalid(format!("unknown calendar `{}`", value))
                })?;
            }
            "utc_offset_minutes" => {
                let minutes: i32 = value.parse().map_err(|_| {
                    ConfigError::Invalid(format!("`{}` is not a whole number of minutes", value))
                })?;
                if !(-14 * 60..=14 * 60).contains(&minutes) {
                    return Err(ConfigError::Invalid(format!(
                        "offset {} is outside -840..=840 minutes",
                        minutes
                    )));
                }
                self.utc_offset_minutes = minutes;
            }
            "digits" => {
                self.digits = DigitStyle::parse(value).ok_or_else(|| {
                    ConfigError::Invalid(format!("unknown digit style `{}`", value))
                })?;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_bool(value)?;
            }
            "recent_limit" => {
                self.recent_limit = parse_positive(value)?;
            }
            "backup_retention" => {
                self.backup_retention = parse_positive(value)?;
            }
            other => {
                return Err(ConfigError::Invalid(format!("unknown setting `{}`", other)));
            }
        }
        Ok(())
    }

    /// Current textual value of a setting, as shown by the shell.
    pub fn value_of(&self, key: &str) -> Option<String> {
        let value = match key {
            "data_dir" => self
                .data_dir
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "default".into()),
            "calendar" => self.calendar.to_string(),
            "utc_offset_minutes" => self.utc_offset_minutes.to_string(),
            "digits" => self.digits.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "recent_limit" => self.recent_limit.to_string(),
            "backup_retention" => self.backup_retention.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("`{}` is not a boolean", value))),
    }
}

fn parse_positive(value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(format!(
            "`{}` must be a positive whole number",
            value
        ))),
    }
}
