//! Language code typo correction and shape validation.

/// Fixes the formatting mistakes commonly seen in `lang` attributes and
/// `Content-Language` headers.
///
/// Only the first entry of a comma separated list is kept, surrounding
/// whitespace is trimmed, the first `_` becomes `-`, the primary tag is
/// lowercased and everything from the first `-` onward is uppercased.
pub fn correct_typo(code: &str) -> String {
    let first = match code.find(',') {
        Some(comma) => &code[..comma],
        None => code,
    };
    let mut out = first.trim_ascii().replacen('_', "-", 1);

    match out.find('-') {
        Some(dash) => {
            let (main, tail) = out.split_at(dash);
            out = format!("{}{}", main.to_ascii_lowercase(), tail.to_ascii_uppercase());
        }
        None => out.make_ascii_lowercase(),
    }

    out
}

/// Roughly checks `code` against `[a-zA-Z]{1,3}(-[a-zA-Z]{2})?`.
pub fn is_valid(code: &str) -> bool {
    let mut chunks = code.split('-');
    let main = chunks.next().unwrap_or_default();
    let sub = chunks.next();
    if chunks.next().is_some() {
        return false;
    }

    if main.is_empty() || main.len() > 3 || !main.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }

    match sub {
        None => true,
        Some(sub) => sub.len() == 2 && sub.bytes().all(|b| b.is_ascii_alphabetic()),
    }
}

/// Splits `code` into its primary tag and the remainder starting at `-`.
pub(crate) fn split_main_and_tail(code: &str) -> (&str, &str) {
    match code.find('-') {
        Some(dash) => code.split_at(dash),
        None => (code, ""),
    }
}
