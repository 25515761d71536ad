use std::collections::{BTreeMap, BTreeSet};

/// Extension to language table for the languages lintstrap knows plugins
/// for. Unknown extensions are ignored by the splitters.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (".c", "C"),
    (".h", "C"),
    (".cpp", "C++"),
    (".cc", "C++"),
    (".cxx", "C++"),
    (".hpp", "C++"),
    (".cs", "C#"),
    (".cmake", "CMake"),
    (".css", "CSS"),
    (".java", "Java"),
    (".js", "JavaScript"),
    (".jsx", "JavaScript"),
    (".py", "Python"),
    (".pyw", "Python"),
    (".rb", "Ruby"),
];

pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    EXTENSION_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}

fn extension_of(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rfind('.').map(|idx| &file[idx..])
}

/// Split project files by language. Files with unknown extensions are
/// ignored.
pub fn split_by_language(project_files: &[String]) -> BTreeMap<String, BTreeSet<String>> {
    let mut by_language: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for file in project_files {
        let Some(ext) = extension_of(file) else {
            continue;
        };
        if let Some(lang) = language_for_extension(ext) {
            by_language
                .entry(lang.to_string())
                .or_default()
                .insert(file.clone());
        }
    }
    by_language
}

/// Per-language set of extensions actually used by the project files.
pub fn extensions_by_language(project_files: &[String]) -> BTreeMap<String, BTreeSet<String>> {
    let mut extset: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for file in project_files {
        let Some(ext) = extension_of(file) else {
            continue;
        };
        if let Some(lang) = language_for_extension(ext) {
            extset
                .entry(lang.to_string())
                .or_default()
                .insert(ext.to_string());
        }
    }
    extset
}
