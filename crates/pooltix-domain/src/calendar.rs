//! Calendar stamping for ticket day keys and time labels.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Local offset used when nothing else is configured (+03:30).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 210;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Calendar system used to render day keys.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    /// Solar Hijri calendar (`1403/01/01`).
    #[default]
    Persian,
    Gregorian,
}

impl CalendarKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "persian" | "jalali" | "shamsi" => Some(CalendarKind::Persian),
            "gregorian" => Some(CalendarKind::Gregorian),
            _ => None,
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CalendarKind::Persian => "persian",
            CalendarKind::Gregorian => "gregorian",
        };
        f.write_str(label)
    }
}

/// Digit glyphs used in rendered dates and times.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DigitStyle {
    #[default]
    Latin,
    Persian,
}

impl DigitStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "latin" | "ascii" => Some(DigitStyle::Latin),
            "persian" => Some(DigitStyle::Persian),
            _ => None,
        }
    }
}

impl fmt::Display for DigitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DigitStyle::Latin => "latin",
            DigitStyle::Persian => "persian",
        };
        f.write_str(label)
    }
}

/// A year/month/day triple in whichever calendar produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilDate {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

/// Date and time strings captured when a ticket is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStamp {
    pub date: String,
    pub time: String,
}

/// Turns instants into the `date`/`time` strings stored on tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCalendar {
    pub kind: CalendarKind,
    pub utc_offset_minutes: i32,
    pub digits: DigitStyle,
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self {
            kind: CalendarKind::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            digits: DigitStyle::default(),
        }
    }
}

impl DayCalendar {
    pub fn new(kind: CalendarKind, utc_offset_minutes: i32, digits: DigitStyle) -> Self {
        Self {
            kind,
            utc_offset_minutes,
            digits,
        }
    }

    /// Stable identifier recorded on stamped tickets, e.g. `persian+210`.
    pub fn id(&self) -> String {
        format!("{}{:+}", self.kind, self.utc_offset_minutes)
    }

    /// Falls back to UTC when the configured offset is out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn civil_date(&self, instant: DateTime<Utc>) -> CivilDate {
        let local = instant.with_timezone(&self.offset()).date_naive();
        match self.kind {
            CalendarKind::Persian => gregorian_to_persian(local),
            CalendarKind::Gregorian => CivilDate {
                year: local.year() as i64,
                month: local.month(),
                day: local.day(),
            },
        }
    }

    /// Day bucketing key, `YYYY/MM/DD`.
    pub fn date_key(&self, instant: DateTime<Utc>) -> String {
        let civil = self.civil_date(instant);
        let raw = format!("{:04}/{:02}/{:02}", civil.year, civil.month, civil.day);
        localize_digits(&raw, self.digits)
    }

    /// Wall-clock label, `HH:MM`.
    pub fn time_label(&self, instant: DateTime<Utc>) -> String {
        let local = instant.with_timezone(&self.offset());
        let raw = format!("{:02}:{:02}", local.hour(), local.minute());
        localize_digits(&raw, self.digits)
    }

    pub fn stamp(&self, instant: DateTime<Utc>) -> DayStamp {
        DayStamp {
            date: self.date_key(instant),
            time: self.time_label(instant),
        }
    }

    /// Rewrites user-typed keys into the configured digit style so they compare
    /// equal to stored keys. Returns `None` for anything not shaped `YYYY/MM/DD`.
    pub fn normalize_key(&self, input: &str) -> Option<String> {
        let latin = to_latin_digits(input.trim()).replace('-', "/");
        let mut parts = latin.split('/');
        let year: u32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let day: u32 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        let raw = format!("{:04}/{:02}/{:02}", year, month, day);
        Some(localize_digits(&raw, self.digits))
    }
}

/// Converts a proleptic Gregorian date into the Solar Hijri calendar.
pub fn gregorian_to_persian(date: NaiveDate) -> CivilDate {
    const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let gy = date.year() as i64;
    let gm = date.month() as usize;
    let gd = date.day() as i64;
    let gy2 = if gm > 2 { gy + 1 } else { gy };

    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd
        + DAYS_BEFORE_MONTH[gm - 1];

    let mut year = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    year += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        year += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (month, day) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    CivilDate {
        year,
        month: month as u32,
        day: day as u32,
    }
}

pub fn localize_digits(input: &str, style: DigitStyle) -> String {
    match style {
        DigitStyle::Latin => to_latin_digits(input),
        DigitStyle::Persian => input
            .chars()
            .map(|ch| match ch.to_digit(10) {
                Some(value) if ch.is_ascii_digit() => PERSIAN_DIGITS[value as usize],
                _ => ch,
            })
            .collect(),
    }
}

/// Maps Persian and Arabic-Indic digits to ASCII, leaving everything else intact.
pub fn to_latin_digits(input: &str) -> String {
    input
        .chars()
        .map(|ch| {
            PERSIAN_DIGITS
                .iter()
                .position(|d| *d == ch)
                .or_else(|| ARABIC_INDIC_DIGITS.iter().position(|d| *d == ch))
                .and_then(|idx| char::from_digit(idx as u32, 10))
                .unwrap_or(ch)
        })
        .collect()
}
