//! Price and business-name heuristics.
//!
//! Each extractor looks at the first match of a single pattern and falls back
//! to an empty value. Neither tries to understand the text.

use std::sync::LazyLock;

use regex::Regex;

/// `$` followed by whole dollars and an optional two-digit cents part, in
/// ASCII digits.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([0-9]+(?:\.[0-9]{2})?)").expect("valid price regex"));

/// A run of capitalised words (`Title Case Words`) joined by single spaces.
static BUSINESS_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Z][a-z]+(?: [A-Z][a-z]+)*").expect("valid business name regex")
});

/// Returns the first dollar amount in `text`, or `0.0` when there is none.
///
/// Thousands separators are not understood: `"$1,200"` reads as `1.0`.
#[must_use]
pub fn extract_price(text: &str) -> f64 {
    PRICE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|amount| amount.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Returns the first run of capitalised words in `text`, or an empty string.
///
/// Case matters, so callers must pass the original text, not a lower-cased
/// copy. Sentence-initial words and unrelated proper nouns are common false
/// positives.
#[must_use]
pub fn extract_business_name(text: &str) -> String {
    BUSINESS_NAME_RE
        .find(text)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // extract_price
    // -----------------------------------------------------------------------

    #[test]
    fn price_whole_dollars() {
        assert_eq!(extract_price("burgers $5 today"), 5.0);
    }

    #[test]
    fn price_with_cents() {
        assert_eq!(extract_price("lunch special $12.50"), 12.5);
    }

    #[test]
    fn price_uses_first_amount_only() {
        assert_eq!(extract_price("$12.50 was $20.00"), 12.5);
    }

    #[test]
    fn price_single_cent_digit_is_ignored() {
        assert_eq!(extract_price("now $12.5!"), 12.0);
    }

    #[test]
    fn price_extra_cent_digits_are_truncated() {
        assert_eq!(extract_price("$3.999"), 3.99);
    }

    #[test]
    fn price_thousands_separator_reads_leading_digits() {
        assert_eq!(extract_price("sofa $1,200"), 1.0);
    }

    #[test]
    fn price_skips_non_ascii_digits() {
        assert_eq!(extract_price("$\u{ff15} off, combo $5"), 5.0);
        assert_eq!(extract_price("$\u{0665}"), 0.0);
    }

    #[test]
    fn price_stops_at_non_ascii_digit() {
        assert_eq!(extract_price("$1\u{0665}"), 1.0);
        assert_eq!(extract_price("$2.5\u{ff10}"), 2.0);
    }

    #[test]
    fn price_absent_is_zero() {
        assert_eq!(extract_price("half off all pastries"), 0.0);
        assert_eq!(extract_price(""), 0.0);
        assert_eq!(extract_price("just a $ sign"), 0.0);
    }

    // -----------------------------------------------------------------------
    // extract_business_name
    // -----------------------------------------------------------------------

    #[test]
    fn business_name_multi_word_run() {
        assert_eq!(
            extract_business_name("Blue Bottle Coffee 2 for 1 lattes"),
            "Blue Bottle Coffee"
        );
    }

    #[test]
    fn business_name_apostrophe_ends_run() {
        assert_eq!(extract_business_name("Joe's Pizza expires 12/31/24"), "Joe");
    }

    #[test]
    fn business_name_skips_leading_lowercase() {
        assert_eq!(
            extract_business_name("today only at Corner Deli $5 subs"),
            "Corner Deli"
        );
    }

    #[test]
    fn business_name_all_caps_words_do_not_match() {
        assert_eq!(extract_business_name("SALE TODAY"), "");
    }

    #[test]
    fn business_name_words_must_be_single_space_separated() {
        assert_eq!(extract_business_name("Taco  Stand"), "Taco");
        assert_eq!(extract_business_name("Taco\nStand"), "Taco");
    }

    #[test]
    fn business_name_absent_is_empty() {
        assert_eq!(extract_business_name("buy one get one"), "");
        assert_eq!(extract_business_name(""), "");
    }

    #[test]
    fn business_name_single_capital_letter_is_not_a_word() {
        assert_eq!(extract_business_name("A sale at Main Street"), "Main Street");
    }
}
