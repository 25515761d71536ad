//! Loose version comparison for dependency constraints.
//!
//! Manifest constraints arrive in many notations ("~> 0.52", ">=2.0",
//! "1.9"). Each side is normalized to its integer components and compared
//! component by component; anything that cannot be normalized counts as
//! a match, erring toward inclusion.

/// Integer components of a version string, with constraint punctuation
/// stripped. `None` when nothing numeric remains.
pub fn normalize(version: &str) -> Option<Vec<u64>> {
    let cleaned: String = version
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let components: Vec<u64> = cleaned
        .split('.')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if components.is_empty() {
        None
    } else {
        Some(components)
    }
}

/// Whether `a >= b` component-wise, with missing components treated as
/// zero.
pub fn is_newer_or_equal(a: &str, b: &str) -> bool {
    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => {
            let width = a.len().max(b.len());
            let component = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
            for i in 0..width {
                match component(&a, i).cmp(&component(&b, i)) {
                    std::cmp::Ordering::Greater => return true,
                    std::cmp::Ordering::Less => return false,
                    std::cmp::Ordering::Equal => {}
                }
            }
            true
        }
        // Unparseable on either side counts as satisfied.
        _ => true,
    }
}

/// Whether a project dependency constraint is acceptable for a plugin
/// that declares `required` as its minimum. Missing version information
/// on either side is a match.
pub fn constraint_satisfies(required: Option<&str>, declared: Option<&str>) -> bool {
    match (required, declared) {
        (Some(required), Some(declared)) => is_newer_or_equal(required, declared),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions_compare_newer_or_equal() {
        assert!(is_newer_or_equal("2.1.1", "2.1.1"));
    }

    #[test]
    fn components_compare_as_integers_not_text() {
        assert!(!is_newer_or_equal("1.9", "1.10"));
        assert!(is_newer_or_equal("1.10", "1.9"));
    }

    #[test]
    fn shorter_versions_are_zero_padded() {
        assert!(is_newer_or_equal("2", "1.9.9"));
        assert!(is_newer_or_equal("2.0", "2"));
        assert!(!is_newer_or_equal("2", "2.0.1"));
    }

    #[test]
    fn constraint_punctuation_is_stripped() {
        assert_eq!(normalize("~> 0.52"), Some(vec![0, 52]));
        assert_eq!(normalize(">=2.0"), Some(vec![2, 0]));
        assert_eq!(normalize("latest"), None);
    }

    #[test]
    fn unparseable_versions_always_match() {
        assert!(is_newer_or_equal("latest", "2.0"));
        assert!(is_newer_or_equal("2.0", "*"));
        assert!(constraint_satisfies(None, Some("3.0")));
        assert!(constraint_satisfies(Some("1.0"), None));
    }

    #[test]
    fn constraint_rejects_a_declared_version_newer_than_the_minimum() {
        assert!(constraint_satisfies(Some("2.0"), Some("~1.4")));
        assert!(!constraint_satisfies(Some("2.0"), Some("2.1")));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn version_string() -> impl Strategy<Value = String> {
            proptest::collection::vec(0u64..1000, 1..4)
                .prop_map(|parts| {
                    parts
                        .iter()
                        .map(u64::to_string)
                        .collect::<Vec<_>>()
                        .join(".")
                })
        }

        proptest! {
            #[test]
            fn comparison_is_total(a in version_string(), b in version_string()) {
                prop_assert!(is_newer_or_equal(&a, &b) || is_newer_or_equal(&b, &a));
            }

            #[test]
            fn every_version_is_newer_or_equal_to_itself(v in version_string()) {
                prop_assert!(is_newer_or_equal(&v, &v));
            }

            #[test]
            fn trailing_zero_components_do_not_matter(v in version_string()) {
                let padded = format!("{v}.0");
                prop_assert!(is_newer_or_equal(&v, &padded));
                prop_assert!(is_newer_or_equal(&padded, &v));
            }
        }
    }
}
