//! Placeholder extraction from template bodies.
//!
//! Template bodies mark variables as `((name))`. A conditional block
//! `((name??shown when set))` contributes its name only.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\(([^()]+)\)\)").expect("placeholder pattern"));

/// Distinct placeholder names in first-occurrence order.
#[must_use]
pub fn names(body: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for capture in PLACEHOLDER.captures_iter(body) {
        let raw = &capture[1];
        let name = raw.split("??").next().unwrap_or(raw).trim();
        if name.is_empty() {
            continue;
        }
        if !found
            .iter()
            .any(|existing| normalize(existing) == normalize(name))
        {
            found.push(name.to_string());
        }
    }
    found
}

/// Canonical key for matching placeholder names against stored values:
/// lowercased with spaces, hyphens and underscores removed.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_keeps_first_occurrence_order() {
        let body = "Hello ((name)), your code is ((code)). Bye ((name))";
        assert_eq!(names(body), vec!["name".to_string(), "code".to_string()]);
    }

    #[test]
    fn names_deduplicates_by_normalised_form() {
        let body = "((First Name)) and ((first_name)) and ((first-name))";
        assert_eq!(names(body), vec!["First Name".to_string()]);
    }

    #[test]
    fn names_strips_conditional_text() {
        let body = "((weekend??See you on Monday))";
        assert_eq!(names(body), vec!["weekend".to_string()]);
    }

    #[test]
    fn names_ignores_empty_bodies() {
        assert!(names("No placeholders here").is_empty());
        assert!(names("").is_empty());
    }

    #[test]
    fn normalize_collapses_separators_and_case() {
        assert_eq!(normalize("Phone Number"), "phonenumber");
        assert_eq!(normalize("phone_number"), "phonenumber");
        assert_eq!(normalize("PHONE-NUMBER"), "phonenumber");
    }
}
