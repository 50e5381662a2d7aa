//! Expiration-date detection.
//!
//! Signage phrases its expiry in a handful of ways ("exp 12/31/24", "valid
//! until 1/5/2025", "offer ends 3-1-24"), and often carries unrelated dates as
//! well. Labeled phrasings are tried first, in a fixed order, before falling
//! back to any bare date token in the text.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Two-digit years that land before this year are moved forward a century.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 1950;

/// `M/D/Y` with one- or two-digit month and day and a two-to-four digit year,
/// separated by `/` or `-`. ASCII digits only.
const DATE_TOKEN: &str = r"([0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4})";

/// A labeled expiration phrasing. Lower `priority` is tried first.
struct ExpirationPattern {
    label: &'static str,
    priority: u8,
    regex: Regex,
}

static EXPIRATION_PATTERNS: LazyLock<Vec<ExpirationPattern>> = LazyLock::new(|| {
    [
        ("expires", r"(?i)exp(?:ires?)?\s*:?\s*"),
        ("valid_until", r"(?i)valid\s+until\s+"),
        ("good_through", r"(?i)good\s+through\s+"),
        ("offer_ends", r"(?i)(?:offer\s+)?ends?\s+"),
        ("standalone", ""),
    ]
    .into_iter()
    .zip(1u8..)
    .map(|((label, prefix), priority)| ExpirationPattern {
        label,
        priority,
        regex: Regex::new(&format!("{prefix}{DATE_TOKEN}")).expect("valid expiration regex"),
    })
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearDigits {
    Four,
    Two,
}

/// One accepted numeric date layout (month first).
///
/// Unpadded month/day fields accept one or two digits; padded fields require
/// exactly two.
#[derive(Debug, Clone, Copy)]
struct DateFormat {
    separator: char,
    year: YearDigits,
    padded: bool,
}

const fn layout(separator: char, year: YearDigits, padded: bool) -> DateFormat {
    DateFormat {
        separator,
        year,
        padded,
    }
}

/// Tried in order; the first layout that consumes the whole token wins.
const DATE_FORMATS: [DateFormat; 8] = [
    layout('/', YearDigits::Four, false),
    layout('/', YearDigits::Four, true),
    layout('/', YearDigits::Two, false),
    layout('/', YearDigits::Two, true),
    layout('-', YearDigits::Four, false),
    layout('-', YearDigits::Four, true),
    layout('-', YearDigits::Two, false),
    layout('-', YearDigits::Two, true),
];

impl DateFormat {
    fn parse(self, token: &str) -> Option<NaiveDate> {
        let mut parts = token.split(self.separator);
        let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let month = self.month_or_day(month)?;
        let day = self.month_or_day(day)?;
        let year = self.full_year(year)?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn month_or_day(self, field: &str) -> Option<u32> {
        let width_ok = if self.padded {
            field.len() == 2
        } else {
            (1..=2).contains(&field.len())
        };
        if !width_ok || !is_digits(field) {
            return None;
        }
        field.parse().ok()
    }

    fn full_year(self, field: &str) -> Option<i32> {
        let width = match self.year {
            YearDigits::Four => 4,
            YearDigits::Two => 2,
        };
        if field.len() != width || !is_digits(field) {
            return None;
        }
        let value: i32 = field.parse().ok()?;
        Some(match self.year {
            YearDigits::Four => value,
            YearDigits::Two => resolve_two_digit_year(value),
        })
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Maps `yy` onto `19yy`, then moves anything before the pivot into the
/// 2000s: `24` → 2024, `49` → 2049, `50` → 1950.
fn resolve_two_digit_year(yy: i32) -> i32 {
    let year = 1900 + yy;
    if year < TWO_DIGIT_YEAR_PIVOT {
        year + 100
    } else {
        year
    }
}

/// Parses a date token against [`DATE_FORMATS`], in order.
fn parse_date_token(token: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|layout| layout.parse(token))
}

/// An expiration date together with the phrasing that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationMatch {
    pub date: NaiveDate,
    /// Label of the matching phrasing, e.g. `"valid_until"` or `"standalone"`.
    pub rule: &'static str,
    pub priority: u8,
}

/// Finds the expiration date in `text`, reporting which phrasing matched.
///
/// For each phrasing in priority order, only its first occurrence is
/// considered. If that occurrence is not a real calendar date the search
/// moves on to the next phrasing.
#[must_use]
pub fn find_expiration(text: &str) -> Option<ExpirationMatch> {
    EXPIRATION_PATTERNS.iter().find_map(|pattern| {
        let token = pattern.regex.captures(text)?.get(1)?.as_str();
        parse_date_token(token).map(|date| ExpirationMatch {
            date,
            rule: pattern.label,
            priority: pattern.priority,
        })
    })
}

/// Returns the expiration date found in `text`, if any.
#[must_use]
pub fn extract_expiration(text: &str) -> Option<NaiveDate> {
    find_expiration(text).map(|m| m.date)
}

#[cfg(test)]
#[path = "date_test.rs"]
mod tests;
