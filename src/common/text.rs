//! Text manipulation utilities

/// Reserved words that can never be used as Python identifiers
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Capitalizes the first character of a string
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Splits an identifier into lowercase words.
///
/// Word boundaries are non-alphanumeric characters and case changes, so
/// `validate_email`, `validateEmail` and `ValidateEmail` all yield
/// `["validate", "email"]`. Runs of capitals stay together until the last
/// capital that starts a lowercase word (`HTTPServer` -> `http`, `server`).
pub fn split_identifier(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush_word(&mut current, &mut words);
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                flush_word(&mut current, &mut words);
            }
        }

        current.extend(c.to_lowercase());
    }
    flush_word(&mut current, &mut words);

    words
}

fn flush_word(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

pub fn snake_case(name: &str) -> String {
    split_identifier(name).join("_")
}

pub fn pascal_case(name: &str) -> String {
    split_identifier(name)
        .iter()
        .map(|w| capitalize_first(w))
        .collect()
}

/// ASCII Python identifier that is not a keyword.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !PYTHON_KEYWORDS.contains(&s)
}

/// Dotted path whose every segment is an identifier.
pub fn is_module_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first_empty_string() {
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_capitalize_first_lowercase_word() {
        assert_eq!(capitalize_first("hello"), "Hello");
        assert_eq!(capitalize_first("_private"), "_private");
    }

    #[test]
    fn test_split_snake_case() {
        assert_eq!(split_identifier("validate_email"), vec!["validate", "email"]);
        assert_eq!(split_identifier("__init__"), vec!["init"]);
    }

    #[test]
    fn test_split_camel_and_pascal_case() {
        assert_eq!(split_identifier("validateEmail"), vec!["validate", "email"]);
        assert_eq!(split_identifier("UserAccount"), vec!["user", "account"]);
        assert_eq!(split_identifier("HTTPServer"), vec!["http", "server"]);
        assert_eq!(split_identifier("calc2Area"), vec!["calc2", "area"]);
    }

    #[test]
    fn test_split_other_separators() {
        assert_eq!(split_identifier("my-tool.v2"), vec!["my", "tool", "v2"]);
        assert!(split_identifier("___").is_empty());
    }

    #[test]
    fn test_snake_and_pascal() {
        assert_eq!(snake_case("UserAccount"), "user_account");
        assert_eq!(pascal_case("sample_for_test"), "SampleForTest");
        assert_eq!(pascal_case("my-tool"), "MyTool");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("calculate_area"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier("my-tool"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_module_paths() {
        assert!(is_module_path("pkg.sample"));
        assert!(!is_module_path("pkg..sample"));
        assert!(!is_module_path("pkg.my-tool"));
        assert!(!is_module_path(""));
    }
}
