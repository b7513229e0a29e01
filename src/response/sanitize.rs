//! File name sanitization for exported responses.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::defaults::{MAX_FILE_NAME_LEN, PLACEHOLDER_FILE_NAME};

/// Characters that are illegal in file names on at least one major platform,
/// plus ASCII control characters.
static ILLEGAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("illegal-character pattern is valid")
});

/// Device names Windows reserves regardless of extension.
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turns an arbitrary endpoint name into a safe, single-component file name.
///
/// - path separators and `..` sequences are removed
/// - remaining illegal characters become `_`
/// - trailing dots and spaces are trimmed
/// - an empty result becomes `file`
/// - reserved device names get a `_` prefix (`CON` becomes `_CON`)
/// - the result is cut to at most 255 bytes on a character boundary
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let mut cleaned: String = name.chars().filter(|c| !matches!(c, '/' | '\\')).collect();
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }

    let replaced = ILLEGAL_CHARS.replace_all(&cleaned, "_");
    let mut result = replaced.trim_end_matches(['.', ' ']).to_string();

    if result.is_empty() {
        result = PLACEHOLDER_FILE_NAME.to_string();
    }

    if RESERVED_NAMES.contains(&result.to_ascii_uppercase().as_str()) {
        result.insert(0, '_');
    }

    truncate_at_char_boundary(&mut result, MAX_FILE_NAME_LEN);
    result
}

pub(super) fn truncate_at_char_boundary(s: &mut String, max_len: usize) {
    if s.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
