//! Synthesizes `Programming Language :: Python :: 3.N` classifiers from `requires-python`.

use std::cmp::Ordering;

use crate::interpreter::{satisfying_versions, Constraint};
use crate::settings::Settings;

const ONLY: &str = "Programming Language :: Python :: 3 :: Only";
const PREFIX: &str = "Programming Language :: Python :: 3.";

fn parse_minor(classifier: &str) -> Option<u8> {
    classifier.strip_prefix(PREFIX)?.parse().ok()
}

/// Orders classifiers ascending, the same way the rest of the list sorts lexicographically,
/// except that two `Programming Language :: Python :: 3.N` entries compare by `N` numerically
/// rather than as text — otherwise `"3.10"` would sort before `"3.7"` (`'1' < '7'`).
pub(crate) fn cmp(a: &str, b: &str) -> Ordering {
    match (parse_minor(a), parse_minor(b)) {
        (Some(a_minor), Some(b_minor)) => a_minor.cmp(&b_minor).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

/// Replaces every `Programming Language :: Python :: 3*` entry in `classifiers` with a freshly
/// synthesized set derived from `requires_python`; every other classifier is left untouched and
/// keeps its position relative to the other untouched classifiers. The caller is responsible for
/// the final ascending sort of the whole list (classifiers are always sorted, synthesized or
/// not, so sorting is not repeated here).
///
/// Returns `None` when `requires_python` is absent or fails to parse, in which case the caller
/// should leave `classifiers` exactly as it found it.
pub(crate) fn synthesize(classifiers: &[String], requires_python: Option<&str>, settings: &Settings) -> Option<Vec<String>> {
    let requires_python = requires_python?;
    let constraint = Constraint::parse(requires_python).ok()?;

    let existing: Vec<(u8, u8)> = classifiers.iter().filter_map(|c| parse_minor(c)).map(|minor| (3, minor)).collect();

    let satisfying = satisfying_versions(&constraint, settings.min_supported_python, settings.max_supported_python, &existing);

    let mut merged: Vec<String> = classifiers.iter().filter(|c| c.as_str() != ONLY && parse_minor(c).is_none()).cloned().collect();
    merged.push(ONLY.to_string());
    merged.extend(satisfying.into_iter().map(|(_, minor)| format!("{PREFIX}{minor}")));
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_from_a_range() {
        let settings = Settings::default();
        let result = synthesize(&[], Some(">=3.7,<3.13"), &settings).unwrap();
        assert_eq!(
            result,
            vec![
                ONLY.to_string(),
                "Programming Language :: Python :: 3.7".to_string(),
                "Programming Language :: Python :: 3.8".to_string(),
                "Programming Language :: Python :: 3.9".to_string(),
                "Programming Language :: Python :: 3.10".to_string(),
                "Programming Language :: Python :: 3.11".to_string(),
                "Programming Language :: Python :: 3.12".to_string(),
            ]
        );
    }

    #[test]
    fn preserves_unrelated_classifiers_and_duplicates() {
        let settings = Settings::default();
        let existing = vec!["License :: OSI Approved :: MIT License".to_string(), "License :: OSI Approved :: MIT License".to_string()];
        let result = synthesize(&existing, Some(">=3.8"), &settings).unwrap();
        assert_eq!(result.iter().filter(|c| c.as_str() == "License :: OSI Approved :: MIT License").count(), 2);
    }

    #[test]
    fn absent_requires_python_leaves_classifiers_untouched() {
        let settings = Settings::default();
        assert!(synthesize(&["X".to_string()], None, &settings).is_none());
    }

    #[test]
    fn unparsable_requires_python_leaves_classifiers_untouched() {
        let settings = Settings::default();
        assert!(synthesize(&["X".to_string()], Some("not a constraint"), &settings).is_none());
    }

    #[test]
    fn cmp_orders_python_versions_numerically_not_lexicographically() {
        let mut classifiers = vec![
            "Programming Language :: Python :: 3.10".to_string(),
            "Programming Language :: Python :: 3.9".to_string(),
            "Programming Language :: Python :: 3.7".to_string(),
            ONLY.to_string(),
        ];
        classifiers.sort_by(|a, b| cmp(a, b));
        assert_eq!(
            classifiers,
            vec![
                ONLY.to_string(),
                "Programming Language :: Python :: 3.7".to_string(),
                "Programming Language :: Python :: 3.9".to_string(),
                "Programming Language :: Python :: 3.10".to_string(),
            ]
        );
    }

    #[test]
    fn cmp_falls_back_to_lexicographic_for_non_version_classifiers() {
        let mut classifiers = vec!["License :: OSI Approved :: MIT License".to_string(), "Development Status :: 5 - Production/Stable".to_string()];
        classifiers.sort_by(|a, b| cmp(a, b));
        assert_eq!(classifiers, vec!["Development Status :: 5 - Production/Stable".to_string(), "License :: OSI Approved :: MIT License".to_string()]);
    }
}
