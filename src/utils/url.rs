// src/utils/url.rs

//! URL manipulation utilities.

/// Return the text between the first and second `'` characters.
///
/// # Examples
/// ```
/// use apot::utils::url::quoted_segment;
///
/// assert_eq!(quoted_segment("javascript:viewDetail('55');"), Some("55"));
/// assert_eq!(quoted_segment("viewDetail(55)"), None);
/// ```
pub fn quoted_segment(text: &str) -> Option<&str> {
    let start = text.find('\'')? + 1;
    let len = text[start..].find('\'')?;
    Some(&text[start..start + len])
}

/// Substitute `{name}` in a URL template.
pub fn fill_template(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_segment() {
        assert_eq!(quoted_segment("f('a', 'b')"), Some("a"));
        assert_eq!(quoted_segment("f('')"), Some(""));
        assert_eq!(quoted_segment("f('unterminated"), None);
        assert_eq!(quoted_segment(""), None);
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(
            fill_template("https://example.com/{id}/view", "id", "7"),
            "https://example.com/7/view"
        );
    }
}
