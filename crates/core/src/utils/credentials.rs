//! Credential sanitation.

/// Strip every whitespace character (NBSP included) and every non-ASCII
/// character from a credential.
///
/// App passwords copied from web pages often carry spaces or non-breaking
/// spaces that SMTP and HTTP headers reject.
pub fn clean_credential(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii() && !c.is_whitespace())
        .collect()
}

/// Clean an optional credential, treating a value that cleans to nothing as absent.
pub fn clean_optional_credential(value: Option<&str>) -> Option<String> {
    value.map(clean_credential).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_credential_strips_whitespace_and_non_ascii() {
        assert_eq!(clean_credential(" abcd efgh\u{a0}ijkl\tmnop\n"), "abcdefghijklmnop");
        assert_eq!(clean_credential("pässwörd"), "psswrd");
        assert_eq!(clean_credential("user@example.com"), "user@example.com");
    }

    #[test]
    fn test_clean_optional_credential() {
        assert_eq!(clean_optional_credential(None), None);
        assert_eq!(clean_optional_credential(Some(" \u{a0} ")), None);
        assert_eq!(
            clean_optional_credential(Some(" sk-ant-123 ")),
            Some("sk-ant-123".to_string())
        );
    }
}
