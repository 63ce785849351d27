//! Profile field rules. Pure functions: no store access, first violation wins.

use crate::error::AppError;
use crate::model::USERNAME_MAX_LEN;
use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub const USERNAME_MIN_LEN: usize = 3;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static username pattern"))
}

fn earliest_birthdate() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date")
}

pub struct ProfileValidator;

impl ProfileValidator {
    /// 3..=50 characters from `[A-Za-z0-9_-]`.
    pub fn username(username: &str) -> Result<(), AppError> {
        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(AppError::Validation(format!(
                "Username must be between {} and {} characters (got {})",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN, len
            )));
        }
        if !username_pattern().is_match(username) {
            return Err(AppError::Validation(
                "Username may only contain letters, digits, underscore (_) and dash (-)".into(),
            ));
        }
        Ok(())
    }

    /// Strict `YYYY-MM-DD`, not after today (UTC), not before 1900-01-01. `None` is valid.
    pub fn birthdate(birthdate: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
        Self::birthdate_on(birthdate, Utc::now().date_naive())
    }

    pub fn birthdate_on(birthdate: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>, AppError> {
        let Some(s) = birthdate else {
            return Ok(None);
        };
        let date = parse_iso_date(s).ok_or_else(|| {
            AppError::Validation(format!("Birthdate must be in YYYY-MM-DD format (got: {})", s))
        })?;
        if date > today {
            return Err(AppError::Validation("Birthdate cannot be in the future".into()));
        }
        if date < earliest_birthdate() {
            return Err(AppError::Validation("Birthdate cannot be before 1900".into()));
        }
        Ok(Some(date))
    }

    /// Must start with `http://` or `https://`. `None` is valid.
    pub fn avatar_url(avatar_url: Option<&str>) -> Result<(), AppError> {
        match avatar_url {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => Err(
                AppError::Validation("Avatar URL must start with http:// or https://".into()),
            ),
            _ => Ok(()),
        }
    }
}

/// Exactly four digits, dash, two digits, dash, two digits, and a real calendar date.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let b = s.as_bytes();
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn is_validation<T: std::fmt::Debug>(r: Result<T, AppError>) -> bool {
        matches!(r, Err(AppError::Validation(_)))
    }

    #[test]
    fn username_length_bounds() {
        assert!(is_validation(ProfileValidator::username("ab")));
        assert!(is_validation(ProfileValidator::username(&"a".repeat(51))));
        assert!(ProfileValidator::username("abc").is_ok());
        assert!(ProfileValidator::username(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn username_length_message_reports_actual_length() {
        match ProfileValidator::username("ab") {
            Err(AppError::Validation(msg)) => assert!(msg.contains("got 2"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn username_charset() {
        for bad in ["user@name", "white space", "dot.ted", "ümlaut", "tab\tbed", "line\n"] {
            assert!(is_validation(ProfileValidator::username(bad)), "{bad:?}");
        }
        for good in ["john_doe", "jane-doe", "ABC123", "___", "---"] {
            assert!(ProfileValidator::username(good).is_ok(), "{good:?}");
        }
    }

    #[test]
    fn birthdate_absent_is_valid() {
        assert_eq!(ProfileValidator::birthdate_on(None, today()).unwrap(), None);
    }

    #[test]
    fn birthdate_format_is_strict() {
        for bad in ["01-01-1990", "1990/01/01", "1990-1-1", "1990-01-01T00:00", " 1990-01-01", "+1990-01-01", "1990-02-30", "", "abcd-ef-gh"] {
            assert!(is_validation(ProfileValidator::birthdate_on(Some(bad), today())), "{bad:?}");
        }
        assert_eq!(
            ProfileValidator::birthdate_on(Some("1990-01-01"), today()).unwrap(),
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
    }

    #[test]
    fn birthdate_bounds_are_inclusive() {
        assert!(ProfileValidator::birthdate_on(Some("2024-06-15"), today()).is_ok());
        assert!(ProfileValidator::birthdate_on(Some("1900-01-01"), today()).is_ok());
        assert!(is_validation(ProfileValidator::birthdate_on(Some("2024-06-16"), today())));
        assert!(is_validation(ProfileValidator::birthdate_on(Some("1899-12-31"), today())));
    }

    #[test]
    fn birthdate_uses_current_date() {
        assert!(is_validation(ProfileValidator::birthdate(Some("2999-01-01"))));
        assert!(is_validation(ProfileValidator::birthdate(Some("1800-01-01"))));
    }

    #[test]
    fn avatar_url_prefix() {
        assert!(ProfileValidator::avatar_url(None).is_ok());
        assert!(ProfileValidator::avatar_url(Some("http://a.example/x.png")).is_ok());
        assert!(ProfileValidator::avatar_url(Some("https://a.example/x.png")).is_ok());
        for bad in ["ftp://a.example/x.png", "HTTP://a.example", "a.example", "", "https:/x"] {
            assert!(is_validation(ProfileValidator::avatar_url(Some(bad))), "{bad:?}");
        }
    }
}
