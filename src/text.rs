//! String normalisation shared by header mapping, entity identity and subject
//! alias lookup.

const VIETNAMESE_FOLDS: &[(&str, char)] = &[
    ("àáảãạăằắẳẵặâầấẩẫậ", 'a'),
    ("èéẻẽẹêềếểễệ", 'e'),
    ("ìíỉĩị", 'i'),
    ("òóỏõọôồốổỗộơờớởỡợ", 'o'),
    ("ùúủũụưừứửữự", 'u'),
    ("ỳýỷỹỵ", 'y'),
    ("đ", 'd'),
];

/// Title-cases `value` the way spreadsheet names are usually written: the first
/// letter of every alphabetic run is upper-cased, the rest lower-cased.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

pub fn normalize_name(value: &str) -> String {
    title_case(value.trim())
}

pub fn normalize_class(value: &str) -> String {
    value.trim().to_uppercase()
}

pub fn normalize_subject(value: &str) -> String {
    title_case(value.trim())
}

/// Lower-cases, strips Vietnamese diacritics and collapses inner whitespace.
/// Only used to build lookup keys; never for display.
pub fn fold_key(value: &str) -> String {
    let mut folded = String::with_capacity(value.len());
    for ch in value.trim().chars().flat_map(char::to_lowercase) {
        if is_combining_mark(ch) {
            continue;
        }
        folded.push(fold_char(ch));
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fold_char(ch: char) -> char {
    if ch.is_ascii() {
        return ch;
    }
    VIETNAMESE_FOLDS
        .iter()
        .find(|(group, _)| group.contains(ch))
        .map(|(_, base)| *base)
        .unwrap_or(ch)
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036f}')
}

/// True when the trimmed value is non-empty and made only of ASCII digits.
pub fn is_all_digits(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit())
}
