use chrono::FixedOffset;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::time::{DisplayLocale, HourCycle};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_cycle: Option<HourCycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("vendorbazaar").join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// A missing file is not an error; it just means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Configured locale, or the environment's when none is set.
    pub fn display_locale(&self) -> Result<DisplayLocale, ConfigError> {
        let locale = match &self.locale {
            Some(tag) => DisplayLocale::from_tag(tag)?,
            None => DisplayLocale::from_env(),
        };
        Ok(match self.hour_cycle {
            Some(hour_cycle) => locale.with_hour_cycle(hour_cycle),
            None => locale,
        })
    }

    /// `None` means the local zone.
    pub fn display_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.utc_offset.as_deref().map(parse_utc_offset).transpose()
    }
}

/// Parse `+05:30`, `-08:00` or `Z`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(s.to_string());
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::locale::DatePattern;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            locale: Some("en-GB".to_string()),
            hour_cycle: Some(HourCycle::H12),
            utc_offset: Some("+05:30".to_string()),
        };
        config.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("hour_cycle = \"h12\""));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "hour_cycle = \"h99\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn hour_cycle_overrides_locale() {
        let config = Config {
            locale: Some("de-DE".to_string()),
            hour_cycle: Some(HourCycle::H12),
            utc_offset: None,
        };
        let locale = config.display_locale().unwrap();
        assert_eq!(locale.hour_cycle, HourCycle::H12);
        assert_eq!(locale.date, DatePattern::DayMonthYear { sep: '.' });
    }

    #[test]
    fn unknown_locale_is_an_error() {
        let config = Config {
            locale: Some("klingon".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.display_locale(), Err(ConfigError::Locale(_))));
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_utc_offset("-08:00").unwrap().local_minus_utc(), -28_800);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        for bad in ["05:30", "+5", "+24:00", "+01:60", "", "+aa:bb"] {
            assert!(parse_utc_offset(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn display_offset_defaults_to_local() {
        assert_eq!(Config::default().display_offset().unwrap(), None);
    }
}
