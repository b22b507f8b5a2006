use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// Date format used on both the listing and the detail pages.
pub const PAGE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Digits, ASCII letters and ASCII punctuation.
pub const ALLOWED_CHARS: &str = concat!(
    "0123456789",
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
);

static NEWLINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r]+").expect("Invalid newline regex"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("Invalid whitespace regex"));

/// Any run of line breaks becomes a single `\n`.
pub fn collapse_newlines(text: &str) -> String {
    NEWLINE_RUN.replace_all(text, "\n").into_owned()
}

/// Any run of two or more whitespace characters becomes a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Splits `value` into maximal runs that are either all inside or all outside
/// `class_chars`, keeping order.
pub fn split_by_char_class(value: &str, class_chars: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current_in_class = None;

    for c in value.chars() {
        let in_class = class_chars.contains(c);
        match runs.last_mut() {
            Some(run) if current_in_class == Some(in_class) => run.push(c),
            _ => {
                runs.push(c.to_string());
                current_in_class = Some(in_class);
            }
        }
    }

    runs
}

/// Replaces every character not in `allowed` with a space, then trims.
pub fn filter_allowed_chars(value: Option<&str>, allowed: &str) -> String {
    let Some(value) = value else {
        return String::new();
    };

    value
        .chars()
        .map(|c| if allowed.contains(c) { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Storage-safe rendition of free text: curly apostrophes become `'`, line
/// breaks become spaces, anything outside [`ALLOWED_CHARS`] is blanked.
pub fn normalise_text(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return String::new();
    };

    let flattened = value.replace('\u{2019}', "'").replace(['\n', '\r'], " ");
    filter_allowed_chars(Some(flattened.trim()), ALLOWED_CHARS)
}

pub fn parse_date(text: &str, pattern: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(text, pattern).map_err(|_| ParseError::DateFormat {
        text: text.to_string(),
        pattern: pattern.to_string(),
    })
}
