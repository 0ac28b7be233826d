//! German (de-DE) locale conventions.
//!
//! Member names are ordered with base-letter sensitivity: case and
//! diacritics do not affect the order, so "anna", "Anna" and "Änna" compare
//! equal and keep their relative order under a stable sort. Dates render as
//! a two-digit day, the abbreviated German month and the full year.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

const MONTHS_SHORT: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez.",
];

/// Compare two strings the way a de-DE collator with base sensitivity does
pub fn collate(left: &str, right: &str) -> Ordering {
    base_letters(left).cmp(base_letters(right))
}

/// Reduce a string to lowercase base letters
pub fn fold(value: &str) -> String {
    base_letters(value).collect()
}

fn base_letters(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().flat_map(fold_char)
}

fn fold_char(ch: char) -> FoldedChar {
    let folded = match ch {
        'ß' | 'ẞ' => return FoldedChar::Two('s', 's'),
        'Æ' | 'æ' => return FoldedChar::Two('a', 'e'),
        'Œ' | 'œ' => return FoldedChar::Two('o', 'e'),
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' | 'à' | 'á' | 'â' | 'ã' | 'ä'
        | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'Ç' | 'Ć' | 'Č' | 'ç' | 'ć' | 'č' => 'c',
        'Ď' | 'ď' | 'Đ' | 'đ' => 'd',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' | 'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė'
        | 'ę' | 'ě' => 'e',
        'Ğ' | 'ğ' => 'g',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'İ' | 'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => 'i',
        'Ł' | 'ł' => 'l',
        'Ñ' | 'Ń' | 'Ň' | 'ñ' | 'ń' | 'ň' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' | 'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø'
        | 'ō' | 'ő' => 'o',
        'Ř' | 'ř' => 'r',
        'Ś' | 'Š' | 'Ş' | 'ś' | 'š' | 'ş' => 's',
        'Ť' | 'ť' | 'Ţ' | 'ţ' => 't',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'Ý' | 'Ÿ' | 'ý' | 'ÿ' => 'y',
        'Ź' | 'Ż' | 'Ž' | 'ź' | 'ż' | 'ž' => 'z',
        other => {
            let mut lower = other.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(first), None) => first,
                (Some(first), Some(second)) => return FoldedChar::Two(first, second),
                _ => other,
            }
        }
    };
    FoldedChar::One(folded)
}

enum FoldedChar {
    One(char),
    Two(char, char),
    Done,
}

impl Iterator for FoldedChar {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match std::mem::replace(self, FoldedChar::Done) {
            FoldedChar::One(ch) => Some(ch),
            FoldedChar::Two(first, second) => {
                *self = FoldedChar::One(second);
                Some(first)
            }
            FoldedChar::Done => None,
        }
    }
}

/// Case-insensitive substring match used by the participant search
pub fn matches_search(name: &str, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle)
}

/// Format a date like `10. Jan. 2024`
pub fn format_date(date: NaiveDate) -> String {
    let month = MONTHS_SHORT[date.month0() as usize];
    format!("{:02}. {} {}", date.day(), month, date.year())
}
