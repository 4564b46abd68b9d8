//! Backup filename encoding
//!
//! Backups are named `profile{N}_{yyyyMMdd}_{HHmmss}.{ext}`. The name is the
//! only place a backup's profile and timestamp are stored, so decoding is
//! strict: anything that isn't exactly this shape is rejected.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

use crate::error::{SaveError, SaveResult};
use crate::models::Profile;

const PROFILE_PREFIX: &str = "profile";

/// Profile and timestamp recovered from a backup filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedName {
    pub profile: Profile,
    pub timestamp: NaiveDateTime,
    pub extension: String,
}

/// Why a filename is not a backup
///
/// Listing treats every variant as "skip this file".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no extension")]
    MissingExtension,

    #[error("expected 3 underscore-separated parts, found {0}")]
    PartCount(usize),

    #[error("missing 'profile' prefix")]
    MissingPrefix,

    #[error("invalid profile '{0}'")]
    Profile(String),

    #[error("invalid date '{0}'")]
    Date(String),

    #[error("invalid time '{0}'")]
    Time(String),
}

/// Build the backup filename for a snapshot
///
/// Sub-second precision is dropped.
pub fn encode(profile: Profile, timestamp: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}{}_{}.{}",
        PROFILE_PREFIX,
        profile.number(),
        timestamp.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Parse a backup filename
pub fn decode(file_name: &str) -> Result<DecodedName, DecodeError> {
    let (stem, extension) = file_name
        .split_once('.')
        .filter(|(_, ext)| !ext.is_empty())
        .ok_or(DecodeError::MissingExtension)?;

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() != 3 {
        return Err(DecodeError::PartCount(parts.len()));
    }

    let profile = parse_profile(parts[0])?;
    let date = parse_date(parts[1]).ok_or_else(|| DecodeError::Date(parts[1].to_string()))?;
    let time = parse_time(parts[2]).ok_or_else(|| DecodeError::Time(parts[2].to_string()))?;

    Ok(DecodedName {
        profile,
        timestamp: NaiveDateTime::new(date, time),
        extension: extension.to_string(),
    })
}

/// Check that an extension yields names that stay in the backup directory
/// and decode back to themselves
pub fn validate_extension(extension: &str) -> SaveResult<()> {
    if extension.is_empty() {
        return Err(SaveError::Config("backup extension must not be empty".into()));
    }
    if extension.chars().any(|c| c == '/' || c == '\\' || c == '\0') {
        return Err(SaveError::Config(format!(
            "backup extension '{}' must not contain path separators",
            extension
        )));
    }

    let sample = encode(Profile::new(Profile::MIN)?, NaiveDateTime::default(), extension);
    match decode(&sample) {
        Ok(decoded) if decoded.extension == extension => Ok(()),
        _ => Err(SaveError::Config(format!(
            "backup extension '{}' does not produce decodable names",
            extension
        ))),
    }
}

/// Drop the sub-second part of a timestamp
pub fn truncate_to_second(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

fn parse_profile(part: &str) -> Result<Profile, DecodeError> {
    let digits = part
        .strip_prefix(PROFILE_PREFIX)
        .ok_or(DecodeError::MissingPrefix)?;

    // No sign, no leading zero
    if digits.is_empty() || !all_digits(digits) || digits.starts_with('0') {
        return Err(DecodeError::Profile(digits.to_string()));
    }

    digits
        .parse::<i64>()
        .ok()
        .and_then(|n| Profile::new(n).ok())
        .ok_or_else(|| DecodeError::Profile(digits.to_string()))
}

fn parse_date(part: &str) -> Option<NaiveDate> {
    if part.len() != 8 || !all_digits(part) {
        return None;
    }

    let year: i32 = part[0..4].parse().ok()?;
    let month: u32 = part[4..6].parse().ok()?;
    let day: u32 = part[6..8].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(part: &str) -> Option<NaiveTime> {
    if part.len() != 6 || !all_digits(part) {
        return None;
    }

    let hour: u32 = part[0..2].parse().ok()?;
    let minute: u32 = part[2..4].parse().ok()?;
    let second: u32 = part[4..6].parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, second)
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
