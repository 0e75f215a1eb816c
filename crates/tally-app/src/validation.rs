// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use regex::Regex;
use std::sync::LazyLock;
use time::macros::format_description;
use time::{Date, Time};

pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address!";
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.]+@[A-Za-z0-9_]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

/// Anything that is neither a letter nor a number counts as special.
static SPECIAL_CHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]").expect("special pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    MissingSpecialChar,
    MissingDigit,
    AllNumeric,
    TooShort,
    Mismatch,
}

impl PasswordError {
    pub const fn field(self) -> PasswordField {
        match self {
            Self::Mismatch => PasswordField::Second,
            _ => PasswordField::First,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingSpecialChar => "Password must contain at least 1 special character",
            Self::MissingDigit => "Password must contain a number",
            Self::AllNumeric => "Password cannot be all numbers",
            Self::TooShort => "Password must be at least 8 characters",
            Self::Mismatch => "Passwords do not match",
        }
    }
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PasswordError {}

/// Checks a new password and its confirmation. The first failing rule wins.
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), PasswordError> {
    if !SPECIAL_CHAR_REGEX.is_match(password) {
        return Err(PasswordError::MissingSpecialChar);
    }
    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }
    if password.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(PasswordError::AllNumeric);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }
    if password != confirmation {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

pub fn is_valid_password(password: &str, confirmation: &str) -> bool {
    validate_password(password, confirmation).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    InvalidDate(RangeBound),
    InvalidTime(RangeBound),
    Reversed,
}

impl RangeError {
    /// The bound whose input the message belongs under.
    pub const fn bound(self) -> RangeBound {
        match self {
            Self::InvalidDate(bound) | Self::InvalidTime(bound) => bound,
            Self::Reversed => RangeBound::To,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidDate(_) => "Enter a valid date (YYYY-MM-DD)",
            Self::InvalidTime(_) => "Enter a valid time (HH:MM)",
            Self::Reversed => "End must be on or after start",
        }
    }
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for RangeError {}

pub fn parse_optional_date(input: &str) -> Option<Result<Date, time::error::Parse>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Date::parse(trimmed, format_description!("[year]-[month]-[day]")))
}

pub fn parse_optional_time(input: &str) -> Option<Result<Time, time::error::Parse>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Time::parse(trimmed, format_description!("[hour]:[minute]")))
}

/// Empty bounds are unset; set bounds must parse and must not be reversed.
pub fn validate_date_range(from: &str, to: &str) -> Result<(), RangeError> {
    let from = parse_optional_date(from)
        .transpose()
        .map_err(|_| RangeError::InvalidDate(RangeBound::From))?;
    let to = parse_optional_date(to)
        .transpose()
        .map_err(|_| RangeError::InvalidDate(RangeBound::To))?;
    if let (Some(from), Some(to)) = (from, to)
        && to < from
    {
        return Err(RangeError::Reversed);
    }
    Ok(())
}

pub fn validate_time_range(from: &str, to: &str) -> Result<(), RangeError> {
    let from = parse_optional_time(from)
        .transpose()
        .map_err(|_| RangeError::InvalidTime(RangeBound::From))?;
    let to = parse_optional_time(to)
        .transpose()
        .map_err(|_| RangeError::InvalidTime(RangeBound::To))?;
    if let (Some(from), Some(to)) = (from, to)
        && to < from
    {
        return Err(RangeError::Reversed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        PasswordError, PasswordField, RangeBound, RangeError, is_valid_email, is_valid_password,
        validate_date_range, validate_password, validate_time_range,
    };

    #[test]
    fn email_accepts_dotted_local_part() {
        assert!(is_valid_email("a.b@c.com"));
        assert!(is_valid_email("shop_owner@retail.io"));
    }

    #[test]
    fn email_rejects_missing_tld_and_double_at() {
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a-b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn password_accepts_valid_pair() {
        assert!(is_valid_password("abc12345!", "abc12345!"));
    }

    #[test]
    fn any_non_alphanumeric_counts_as_special() {
        assert!(is_valid_password("abc12345~", "abc12345~"));
        assert!(is_valid_password("abc12345`", "abc12345`"));
        assert!(is_valid_password("abc12345€", "abc12345€"));
        assert_eq!(
            validate_password("abcé1234", "abcé1234"),
            Err(PasswordError::MissingSpecialChar)
        );
    }

    #[test]
    fn all_numeric_password_is_rejected() {
        assert!(!is_valid_password("12345678", "12345678"));
        // A digit string with a special character is not all numeric.
        assert_eq!(
            validate_password("1234567!", "1234567!"),
            Ok(())
        );
    }

    #[test]
    fn password_without_digit_or_special_is_rejected() {
        assert_eq!(
            validate_password("abcdefgh", "abcdefgh"),
            Err(PasswordError::MissingSpecialChar)
        );
        assert_eq!(
            validate_password("abcdefg!", "abcdefg!"),
            Err(PasswordError::MissingDigit)
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        assert_eq!(validate_password("a1!", "zzz"), Err(PasswordError::TooShort));
        assert_eq!(
            validate_password("x", "y"),
            Err(PasswordError::MissingSpecialChar)
        );
    }

    #[test]
    fn mismatch_attaches_to_second_field() {
        let error = validate_password("abc12345!", "abc12345?").expect_err("mismatch");
        assert_eq!(error, PasswordError::Mismatch);
        assert_eq!(error.field(), PasswordField::Second);
        assert_eq!(error.message(), "Passwords do not match");
        assert_eq!(PasswordError::TooShort.field(), PasswordField::First);
    }

    #[test]
    fn date_range_accepts_open_and_ordered_ranges() {
        assert_eq!(validate_date_range("", ""), Ok(()));
        assert_eq!(validate_date_range("2024-01-01", ""), Ok(()));
        assert_eq!(validate_date_range("2024-01-01", "2024-01-01"), Ok(()));
        assert_eq!(validate_date_range("2024-01-01", "2024-02-01"), Ok(()));
    }

    #[test]
    fn date_range_rejects_reversed_and_garbage() {
        assert_eq!(
            validate_date_range("2024-02-01", "2024-01-01"),
            Err(RangeError::Reversed)
        );
        let error = validate_date_range("2024-13-01", "").expect_err("bad month");
        assert_eq!(error.bound(), RangeBound::From);
        let error = validate_date_range("", "soon").expect_err("bad date");
        assert_eq!(error, RangeError::InvalidDate(RangeBound::To));
    }

    #[test]
    fn time_range_checks_order() {
        assert_eq!(validate_time_range("08:00", "17:30"), Ok(()));
        assert_eq!(
            validate_time_range("17:30", "08:00"),
            Err(RangeError::Reversed)
        );
        assert_eq!(
            validate_time_range("8am", ""),
            Err(RangeError::InvalidTime(RangeBound::From))
        );
    }
}
