use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unknown locale: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HourCycle {
    H12,
    H23,
}

impl HourCycle {
    fn pattern(&self) -> &'static str {
        match self {
            HourCycle::H12 => "%-I:%M %p",
            HourCycle::H23 => "%H:%M",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `6/15/2024`
    MonthDayYear,
    /// `15/06/2024`, `15.06.2024`
    DayMonthYear { sep: char },
    /// `2024-06-15`, `2024/06/15`
    YearMonthDay { sep: char },
}

/// How short times and dates are written for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLocale {
    pub tag: String,
    pub hour_cycle: HourCycle,
    pub date: DatePattern,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self::preset("en-US", HourCycle::H12, DatePattern::MonthDayYear)
    }
}

impl DisplayLocale {
    fn preset(tag: &str, hour_cycle: HourCycle, date: DatePattern) -> Self {
        Self {
            tag: tag.to_string(),
            hour_cycle,
            date,
        }
    }

    /// Resolve a BCP-47 style (`en-GB`) or POSIX style (`de_DE.UTF-8`) tag.
    pub fn from_tag(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        // strip encoding and modifier: "de_DE.UTF-8@euro" -> "de_DE"
        let base = trimmed
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('_', "-");
        let mut parts = base.split('-');
        let lang = parts.next().unwrap_or_default().to_lowercase();
        // skip a script subtag: "en-Latn-US", "zh-Hant-TW"
        let mut region = parts.next();
        if region.is_some_and(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic())) {
            region = parts.next();
        }
        let region = region.map(|r| r.to_uppercase());

        let (hour_cycle, date) = match (lang.as_str(), region.as_deref()) {
            ("en", None | Some("US")) => (HourCycle::H12, DatePattern::MonthDayYear),
            ("en", Some(_)) | ("fr" | "es" | "it" | "pt", _) => {
                (HourCycle::H23, DatePattern::DayMonthYear { sep: '/' })
            }
            ("de" | "ru" | "pl", _) => (HourCycle::H23, DatePattern::DayMonthYear { sep: '.' }),
            ("ja" | "zh" | "ko", _) => (HourCycle::H23, DatePattern::YearMonthDay { sep: '/' }),
            ("sv" | "c" | "posix", _) => (HourCycle::H23, DatePattern::YearMonthDay { sep: '-' }),
            _ => return Err(LocaleError::Unknown(trimmed.to_string())),
        };

        let tag = if matches!(lang.as_str(), "c" | "posix") {
            lang.to_uppercase()
        } else {
            match region {
                Some(region) => format!("{}-{}", lang, region),
                None => lang,
            }
        };
        Ok(Self::preset(&tag, hour_cycle, date))
    }

    /// Locale of the running environment: `LC_ALL`, `LC_TIME`, then `LANG`.
    pub fn from_env() -> Self {
        let tag = ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.trim().is_empty());

        match tag {
            Some(tag) => Self::from_tag(&tag).unwrap_or_else(|e| {
                log::debug!("{}, falling back to en-US", e);
                Self::default()
            }),
            None => {
                log::debug!("No locale in environment, using en-US");
                Self::default()
            }
        }
    }

    pub fn with_hour_cycle(mut self, hour_cycle: HourCycle) -> Self {
        self.hour_cycle = hour_cycle;
        self
    }

    pub fn format_time<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        date.format(self.hour_cycle.pattern()).to_string()
    }

    pub fn format_date<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self.date {
            DatePattern::MonthDayYear => date.format("%-m/%-d/%Y").to_string(),
            DatePattern::DayMonthYear { sep } => {
                date.format(&format!("%d{sep}%m{sep}%Y")).to_string()
            }
            DatePattern::YearMonthDay { sep } => {
                date.format(&format!("%Y{sep}%m{sep}%d")).to_string()
            }
        }
    }
}
