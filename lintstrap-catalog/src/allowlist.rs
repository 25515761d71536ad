use std::collections::{BTreeMap, BTreeSet};

/// Per-language allowlist of plugins considered important enough to
/// select unconditionally. Languages absent from this table get their
/// whole pool seeded instead.
///
/// The table is plain data handed to the selection engine at
/// construction, so tests can substitute their own.
pub fn important_plugins() -> BTreeMap<String, BTreeSet<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            "All",
            &["FilenameLint", "BrokenLinkLint", "LineCountLint", "KeywordLint"],
        ),
        ("C", &["IndentLint", "CSecurityLint", "ClangComplexityLint"]),
        ("C#", &["DuplicationLint", "CSharpStyleLint", "SpaceConsistencyLint"]),
        (
            "C++",
            &["IndentLint", "DuplicationLint", "CppCheckLint", "ClangComplexityLint"],
        ),
        ("CMake", &["CMakeStyleLint", "SpaceConsistencyLint"]),
        ("CSS", &["CssHintLint", "SpaceConsistencyLint"]),
        ("Java", &["JavaPmdLint", "CheckstyleLint"]),
        ("JavaScript", &["JsHintLint", "JsComplexityLint"]),
        ("Python", &["Pep8Lint"]),
        ("Ruby", &["RubocopLint"]),
    ];

    table
        .iter()
        .map(|(lang, plugins)| {
            (
                lang.to_string(),
                plugins.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_covers_the_all_pool() {
        let table = important_plugins();
        assert!(table.contains_key("All"));
        assert!(table["Python"].contains("Pep8Lint"));
    }
}
