//! Shared helpers used across the analysis stages.

use unicode_segmentation::UnicodeSegmentation;

/// Normalize party names by trimming punctuation, lowercasing, and removing
/// leading articles so we can compare display texts consistently.
pub(crate) fn normalize_party_name(name: &str) -> String {
    let trimmed = name
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | ',' | '.'))
        .trim()
        .to_lowercase();

    for article in ["the ", "a ", "an "] {
        if let Some(rest) = trimmed.strip_prefix(article) {
            return rest.to_string();
        }
    }

    trimmed
}

/// Words of `text` with their byte offsets, per UAX #29 word boundaries.
pub(crate) fn word_indices(text: &str) -> Vec<(usize, &str)> {
    text.unicode_word_indices().collect()
}

/// Parse a Roman numeral from text.
///
/// Returns `(numeric_value, is_uppercase)` or `None` if not a valid Roman numeral.
/// Supports numerals up to 3999 (MMMCMXCIX).
///
/// # Examples
/// ```ignore
/// assert_eq!(parse_roman("IV"), Some((4, true)));
/// assert_eq!(parse_roman("xii"), Some((12, false)));
/// assert_eq!(parse_roman("MCMXCIV"), Some((1994, true)));
/// ```
pub(crate) fn parse_roman(text: &str) -> Option<(u32, bool)> {
    if text.is_empty() {
        return None;
    }

    let uppercase = text.chars().next()?.is_uppercase();
    let upper = text.to_uppercase();

    if !upper
        .chars()
        .all(|c| matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'))
    {
        return None;
    }

    fn roman_value(c: char) -> u32 {
        match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => 0,
        }
    }

    // Subtractive principle, right to left
    let mut total: u32 = 0;
    let mut prev_value: u32 = 0;

    for c in upper.chars().rev() {
        let value = roman_value(c);
        if value < prev_value {
            total = total.checked_sub(value)?;
        } else {
            total = total.checked_add(value)?;
        }
        prev_value = value;
    }

    if total == 0 || total > 3999 {
        return None;
    }

    Some((total, uppercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_articles_and_quotes() {
        assert_eq!(normalize_party_name("the Employer"), "employer");
        assert_eq!(normalize_party_name("\"Company\""), "company");
        assert_eq!(normalize_party_name("ABC Pvt. Ltd."), "abc pvt. ltd");
    }

    #[test]
    fn parses_roman_numerals() {
        assert_eq!(parse_roman("IV"), Some((4, true)));
        assert_eq!(parse_roman("xii"), Some((12, false)));
        assert_eq!(parse_roman("MCMXCIV"), Some((1994, true)));
        assert_eq!(parse_roman("abc"), None);
        assert_eq!(parse_roman(""), None);
    }

    #[test]
    fn word_indices_keep_offsets() {
        let words = word_indices("Employee shall pay ₹100,000.");
        assert_eq!(words[0], (0, "Employee"));
        assert_eq!(words[1], (9, "shall"));
        assert_eq!(words.last().map(|(_, w)| *w), Some("100,000"));
    }
}
