//! Hindi contract vocabulary.
//!
//! Bilingual contracts often name the instrument or the parties in Hindi
//! ("रोजगार करार", "कर्मचारी"). Those words are replaced by their English
//! equivalents before phrase-based classification. Clause text itself is
//! never rewritten; only the copy fed to the classifiers is.

use std::borrow::Cow;

/// Hindi words and the English term each one stands for.
const HINDI_TERMS: [(&str, &str); 14] = [
    ("करार", "agreement"),
    ("अनुबंध", "contract"),
    ("पार्टी", "party"),
    ("कंपनी", "company"),
    ("कर्मचारी", "employee"),
    ("नियोक्ता", "employer"),
    ("रोजगार", "employment"),
    ("वेतन", "salary"),
    ("किराया", "rent"),
    ("परिसर", "premises"),
    ("गोपनीयता", "confidentiality"),
    ("साझेदारी", "partnership"),
    ("भुगतान", "payment"),
    ("समाप्ति", "termination"),
];

/// Replace known Hindi terms in `text` with English. Borrows when there is
/// nothing to replace.
pub fn normalize_hindi_terms(text: &str) -> Cow<'_, str> {
    // Devanagari block
    if !text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)) {
        return Cow::Borrowed(text);
    }

    let mut out = text.to_string();
    for (hindi, english) in HINDI_TERMS {
        if out.contains(hindi) {
            out = out.replace(hindi, english);
        }
    }
    Cow::Owned(out)
}
