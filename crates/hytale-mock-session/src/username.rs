//! Username normalization.

use crate::RegistryError;

/// Longest username kept after normalization, in characters.
pub const MAX_USERNAME_CHARS: usize = 32;

/// Trims surrounding whitespace and truncates to [`MAX_USERNAME_CHARS`].
///
/// `None` stands for "the client did not send a string" (missing field,
/// `null`, a number...). Truncation counts `char`s, so a multi-byte
/// character is never split.
///
/// # Errors
/// [`RegistryError::InvalidInput`] if `raw` is `None` or nothing is left
/// after trimming.
pub fn normalize_username(raw: Option<&str>) -> Result<String, RegistryError> {
    let trimmed = raw.ok_or(RegistryError::InvalidInput)?.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::InvalidInput);
    }
    Ok(trimmed.chars().take(MAX_USERNAME_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_username(Some("  steve \t")).unwrap(), "steve");
    }

    #[test]
    fn test_normalize_truncates_to_32_chars() {
        let long = "a".repeat(40);
        let name = normalize_username(Some(&long)).unwrap();
        assert_eq!(name.chars().count(), MAX_USERNAME_CHARS);
    }

    #[test]
    fn test_normalize_truncates_by_char_not_byte() {
        // 40 two-byte characters: truncation must land on a char boundary.
        let long = "é".repeat(40);
        let name = normalize_username(Some(&long)).unwrap();
        assert_eq!(name, "é".repeat(32));
    }

    #[test]
    fn test_normalize_keeps_exactly_32_chars_untouched() {
        let exact = "b".repeat(32);
        assert_eq!(normalize_username(Some(&exact)).unwrap(), exact);
    }

    #[test]
    fn test_normalize_empty_returns_invalid_input() {
        assert_eq!(normalize_username(Some("")), Err(RegistryError::InvalidInput));
    }

    #[test]
    fn test_normalize_blank_returns_invalid_input() {
        assert_eq!(
            normalize_username(Some("   \n ")),
            Err(RegistryError::InvalidInput)
        );
    }

    #[test]
    fn test_normalize_none_returns_invalid_input() {
        assert_eq!(normalize_username(None), Err(RegistryError::InvalidInput));
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(normalize_username(Some("SteVe")).unwrap(), "SteVe");
    }
}
