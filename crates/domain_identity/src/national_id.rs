//! National identity number validation and derivation
//!
//! A national identity number is a 13-digit string encoding date of birth,
//! a gender sequence, and a trailing check digit:
//!
//! ```text
//! Y Y M M D D S S S S C A Z
//! └─┬─┘ └┬┘ └┬┘ └─┬─┘ │ │ └── check digit
//!   │    │   │    │   │ └──── race digit (historical, ignored)
//!   │    │   │    │   └────── citizenship digit (ignored)
//!   │    │   │    └────────── gender sequence, > 4999 is male
//!   │    │   └─────────────── day of birth
//!   │    └─────────────────── month of birth
//!   └──────────────────────── two-digit year of birth
//! ```
//!
//! Every function in this module is total: malformed input yields `false` or
//! `None`, never a panic or an error. Calling form logic treats "field not
//! yet derivable" as a normal state rather than an error path.
//!
//! The check digit follows the Luhn convention that doubles the digits at
//! odd 0-indexed positions 1, 3, ..., 11. Two-digit years are resolved with
//! a cutoff computed from the evaluation date, so a derived birth year is
//! never in the future.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Length of a well-formed national identity number
pub const ID_NUMBER_LENGTH: usize = 13;

/// Gender sequences strictly above this value denote a male
const MALE_SEQUENCE_THRESHOLD: u32 = 4999;

/// Gender derived from the identity number's sequence digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Attributes deterministically derivable from a valid national ID number
///
/// These are computed once at lookup time and cached on the in-progress
/// draft until the user overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedIdentityAttributes {
    pub gender: Gender,
    pub birth_date: NaiveDate,
}

/// Parses the input into exactly 13 ASCII digits, or nothing
fn parse_digits(id: &str) -> Option<[u8; ID_NUMBER_LENGTH]> {
    if id.len() != ID_NUMBER_LENGTH {
        return None;
    }
    let mut digits = [0u8; ID_NUMBER_LENGTH];
    for (i, ch) in id.chars().enumerate() {
        digits[i] = ch.to_digit(10)? as u8;
    }
    Some(digits)
}

/// Validates the trailing check digit of a national identity number
///
/// The shape check (exactly 13 ASCII digits) is re-verified here and not
/// assumed from the caller. The first twelve digits are summed with the
/// digits at odd 0-indexed positions doubled (values above 9 reduced by 9),
/// and the expected check digit `(10 - (sum mod 10)) mod 10` is compared
/// with the thirteenth digit.
///
/// # Examples
///
/// ```
/// use domain_identity::national_id::validate_checksum;
///
/// assert!(validate_checksum("8001015009087"));
/// assert!(!validate_checksum("8001015009088"));
/// assert!(!validate_checksum("80010150090"));
/// ```
pub fn validate_checksum(id: &str) -> bool {
    let Some(digits) = parse_digits(id) else {
        return false;
    };

    let mut sum = 0u32;
    for (i, &digit) in digits[..ID_NUMBER_LENGTH - 1].iter().enumerate() {
        let mut value = u32::from(digit);
        if i % 2 == 1 {
            value *= 2;
            if value > 9 {
                value -= 9;
            }
        }
        sum += value;
    }

    let expected = (10 - (sum % 10)) % 10;
    expected == u32::from(digits[ID_NUMBER_LENGTH - 1])
}

/// Derives gender from the sequence digits at offsets 6..10
///
/// Returns `None` for anything that is not exactly 13 ASCII digits. The
/// check digit is not consulted; gender is derivable from a number whose
/// checksum has not been verified yet.
pub fn extract_gender(id: &str) -> Option<Gender> {
    let digits = parse_digits(id)?;
    let sequence = digits[6..10]
        .iter()
        .fold(0u32, |acc, &d| acc * 10 + u32::from(d));

    if sequence > MALE_SEQUENCE_THRESHOLD {
        Some(Gender::Male)
    } else {
        Some(Gender::Female)
    }
}

/// Derives the date of birth from the leading six digits
///
/// Evaluates against the current calendar date; see
/// [`extract_birth_date_at`] for the century resolution rule.
pub fn extract_birth_date(id: &str) -> Option<NaiveDate> {
    extract_birth_date_at(id, Utc::now().date_naive())
}

/// Derives the date of birth, evaluated as of `today`
///
/// Two-digit years at or below `today`'s final two digits resolve to the
/// current century; all others resolve to the previous century, so the
/// derived year is never in the future. Returns `None` when the month is
/// outside 1..=12, the day is outside 1..=31 or invalid for the month, or
/// the resulting date lies strictly after `today`.
pub fn extract_birth_date_at(id: &str, today: NaiveDate) -> Option<NaiveDate> {
    let digits = parse_digits(id)?;

    let yy = i32::from(digits[0]) * 10 + i32::from(digits[1]);
    let month = u32::from(digits[2]) * 10 + u32::from(digits[3]);
    let day = u32::from(digits[4]) * 10 + u32::from(digits[5]);

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let century_base = today.year() - today.year() % 100;
    let year = if yy <= today.year() % 100 {
        century_base + yy
    } else {
        century_base - 100 + yy
    };

    // from_ymd_opt also rejects days invalid for the month (e.g. Feb 30)
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if date > today {
        return None;
    }
    Some(date)
}

/// Derives the full attribute set from a checksum-valid national ID number
///
/// Returns `None` unless the number is well-formed, passes the checksum,
/// and encodes a derivable birth date. Used by the registration workflow to
/// seed later form steps after a successful lookup.
pub fn derive_attributes(id: &str) -> Option<DerivedIdentityAttributes> {
    derive_attributes_at(id, Utc::now().date_naive())
}

/// Derives the full attribute set, evaluated as of `today`
pub fn derive_attributes_at(id: &str, today: NaiveDate) -> Option<DerivedIdentityAttributes> {
    if !validate_checksum(id) {
        return None;
    }
    Some(DerivedIdentityAttributes {
        gender: extract_gender(id)?,
        birth_date: extract_birth_date_at(id, today)?,
    })
}
