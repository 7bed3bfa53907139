//! Input filters for the edit form's text fields.

/// Keep only decimal digits and truncate to ten characters.
///
/// Applied on every keystroke to both the bound value and the rendered
/// input, so it must be idempotent.
pub fn filter_phone(raw: &str) -> String {
  raw.chars().filter(|c| c.is_ascii_digit()).take(10).collect()
}

/// Accepted characters for name fields: ASCII letters, the Spanish
/// accented vowels, `ñ`/`Ñ`, and whitespace. The form blocks anything else
/// and signals a notice.
pub fn letter_allowed(c: char) -> bool {
  c.is_ascii_alphabetic()
    || matches!(
      c,
      'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'Ñ' | 'ñ'
    )
    || c.is_whitespace()
}

/// Accepted characters for numeric fields: the ASCII digit range 48–57.
pub fn digit_allowed(c: char) -> bool { c.is_ascii_digit() }
