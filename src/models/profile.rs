//! Profile type for identifying save slots
//!
//! The game keeps up to four independent save slots. Every live save path
//! and every backup filename is keyed by one of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SaveError, SaveResult};

/// A validated save slot number in `Profile::MIN..=Profile::MAX`
///
/// Can only be built through validation, so holding a `Profile` means the
/// range check has already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Profile(u8);

impl Profile {
    /// Lowest valid profile number
    pub const MIN: u8 = 1;
    /// Highest valid profile number
    pub const MAX: u8 = 4;

    /// Validate a profile number
    ///
    /// Accepts any integer so callers can pass unvalidated settings or CLI
    /// input straight through; out-of-range values are rejected, never clamped.
    pub fn new(number: impl Into<i64>) -> SaveResult<Self> {
        let number = number.into();
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&number) {
            Ok(Self(number as u8))
        } else {
            Err(SaveError::InvalidProfile(number))
        }
    }

    /// All profiles in ascending order
    pub fn all() -> impl Iterator<Item = Profile> {
        (Self::MIN..=Self::MAX).map(Self)
    }

    /// The profile number
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// Filename of the game's live save for this profile
    pub fn live_save_file_name(&self) -> String {
        format!("profile{}.userdata", self.0)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Profile {
    type Error = SaveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Profile> for u8 {
    fn from(profile: Profile) -> Self {
        profile.0
    }
}

impl FromStr for Profile {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let number: i64 = s
            .parse()
            .map_err(|_| SaveError::Config(format!("Profile must be a number, got '{}'", s)))?;
        Self::new(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        for n in 1..=4u8 {
            assert_eq!(Profile::new(n).unwrap().number(), n);
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(matches!(Profile::new(0), Err(SaveError::InvalidProfile(0))));
        assert!(matches!(Profile::new(5), Err(SaveError::InvalidProfile(5))));
        assert!(matches!(
            Profile::new(-1i64),
            Err(SaveError::InvalidProfile(-1))
        ));
    }

    #[test]
    fn test_all() {
        let numbers: Vec<u8> = Profile::all().map(|p| p.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("3".parse::<Profile>().unwrap().number(), 3);
        assert_eq!(" 2 ".parse::<Profile>().unwrap().number(), 2);
        assert!("9".parse::<Profile>().unwrap_err().is_invalid_profile());
        assert!("two".parse::<Profile>().is_err());
    }

    #[test]
    fn test_live_save_file_name() {
        let profile = Profile::new(2u8).unwrap();
        assert_eq!(profile.live_save_file_name(), "profile2.userdata");
    }

    #[test]
    fn test_serde_validates() {
        let profile: Profile = serde_json::from_str("4").unwrap();
        assert_eq!(profile.number(), 4);
        assert!(serde_json::from_str::<Profile>("7").is_err());
        assert_eq!(serde_json::to_string(&profile).unwrap(), "4");
    }
}
