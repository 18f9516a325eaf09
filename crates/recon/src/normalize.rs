//! Title normalization.
//!
//! Turns a raw title cell into the key used to join the statement against
//! both catalogs. The cleaning pass strips volume/episode markers, bracketed
//! annotations, edition keywords, digits, punctuation and whitespace. The
//! pass is repeated until the title stops changing, which makes
//! [`TitleNormalizer::normalize`] idempotent.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::KeywordOrder;
use crate::model::TitleValue;

/// Literal fixes applied before bracket removal. Order matters: the compound
/// word must be repaired before `-` is dropped on its own.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Un-holyNight", "UnholyNight"),
    ("?", ""),
    ("~", ""),
    (",", ""),
    ("-", ""),
    ("_", ""),
];

/// Edition / format keywords, in their historical order.
pub const EDITION_KEYWORDS: &[&str] = &[
    "개정판 l",
    "개정판",
    "외전",
    "무삭제본",
    "무삭제판",
    "합본",
    "단행본",
    "시즌",
    "세트",
    "연재",
    "특별",
    "최종화",
    "완결",
    "2부",
    "무삭제",
    "완전판",
    "세개정판",
    "19세개정판",
];

const SPECIAL_SUFFIX: &str = "특별";

const SYMBOLS: &[char] = &[
    '.', '~', '-', '–', '—', '!', '@', '#', '$', '%', '^', '&', '*', '_', '=', '+', '\\', '|', '/',
    ':', ';', '"', '\'', '’', '`', '<', '>', '?', '，', '｡', '､', '{', '}', '[', ']', '(', ')',
];

static DEFAULT: Lazy<TitleNormalizer> = Lazy::new(TitleNormalizer::default);

/// Normalize with the default (longest-first) keyword order.
pub fn normalize(value: &TitleValue) -> String {
    DEFAULT.normalize(value)
}

/// Normalize a plain text title with the default keyword order.
pub fn normalize_str(value: &str) -> String {
    DEFAULT.normalize_str(value)
}

#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    date_form: Regex,
    volume_marker: Regex,
    parenthesized: Regex,
    bracketed: Regex,
    unit_suffix: Regex,
    digits: Regex,
    keywords: Vec<&'static str>,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new(KeywordOrder::default())
    }
}

impl TitleNormalizer {
    pub fn new(order: KeywordOrder) -> Self {
        let mut keywords = EDITION_KEYWORDS.to_vec();
        if order == KeywordOrder::LongestFirst {
            // Stable: equal-length keywords keep their listed order.
            keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
        }

        Self {
            date_form: pattern(r"^[0-9]+월[0-9]+일$"),
            volume_marker: pattern(r"\s*제\s*\d+\s*[권화]"),
            parenthesized: pattern(r"\([^)]*\)"),
            bracketed: pattern(r"\[[^\]]*\]"),
            unit_suffix: pattern(r"\d+[권화부회]"),
            digits: pattern(r"\d+"),
            keywords,
        }
    }

    /// Keywords in the order they are stripped.
    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }

    /// Canonical join key for a title cell. Total: never fails, and the
    /// empty string is a valid result.
    pub fn normalize(&self, value: &TitleValue) -> String {
        match value {
            TitleValue::Date(d) => format!("{}월{}일", d.month(), d.day()),
            TitleValue::Text(s) => self.normalize_str(s),
        }
    }

    pub fn normalize_str(&self, value: &str) -> String {
        if self.date_form.is_match(value) {
            return value.to_string();
        }

        // Every pass only deletes characters, so this reaches a fixed point.
        let mut current = self.clean_pass(value);
        loop {
            let next = self.clean_pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_pass(&self, value: &str) -> String {
        let mut t = self.volume_marker.replace_all(value, "").into_owned();

        for (from, to) in SUBSTITUTIONS {
            t = t.replace(from, to);
        }

        t = self.parenthesized.replace_all(&t, "").into_owned();
        t = self.bracketed.replace_all(&t, "").into_owned();
        t = self.unit_suffix.replace_all(&t, "").into_owned();

        for kw in &self.keywords {
            t = t.replace(kw, "");
        }

        t = self.digits.replace_all(&t, "").into_owned();
        if let Some(stripped) = t.strip_suffix('.') {
            t = stripped.to_string();
        }

        t.retain(|c| !SYMBOLS.contains(&c));

        if let Some(stripped) = t.strip_suffix(SPECIAL_SUFFIX) {
            t = stripped.to_string();
        }

        t.retain(|c| !c.is_whitespace());
        t.trim().to_string()
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("normalization patterns are valid")
}
