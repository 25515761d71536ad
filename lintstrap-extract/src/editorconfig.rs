//! Style-config (`.editorconfig`) extraction.
//!
//! Line-oriented `section -> key=value` syntax where section headers are
//! file globs. Facts derived from a section carry that section's glob as
//! their scope, so a later section's keys only override earlier ones
//! within the same glob scope.

use camino::Utf8Path;
use regex::Regex;
use tracing::warn;

use lintstrap_types::{ExtractorKind, Fact, FactKind, FactValue};

use crate::{ExtractError, Extractor};

pub struct EditorconfigExtractor;

impl Extractor for EditorconfigExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Editorconfig
    }

    fn target_globs(&self) -> &[&str] {
        &[".editorconfig"]
    }

    fn supported_globs(&self) -> &[&str] {
        &[".editorconfig"]
    }

    fn declared_kinds(&self) -> &[FactKind] {
        &[
            FactKind::IndentStyle,
            FactKind::IndentSize,
            FactKind::TrailingWhitespace,
            FactKind::FinalNewline,
            FactKind::Charset,
            FactKind::LineBreaks,
        ]
    }

    fn extract(&self, source: &Utf8Path, content: &str) -> Result<Vec<Fact>, ExtractError> {
        let mut facts = Vec::new();

        for section in parse(content) {
            let scope = Some(section.glob.clone());
            let fact = |kind: FactKind, value: FactValue| {
                Fact::new(kind, source.to_path_buf(), value, scope.clone(), self.kind())
            };

            for (key, value) in section.effective_entries() {
                match key.as_str() {
                    "indent_style" if value == "tab" || value == "space" => {
                        facts.push(fact(FactKind::IndentStyle, FactValue::Str(value))?);
                    }
                    "indent_size" => {
                        // "tab" defers to tab_width when one is given.
                        let size = if value == "tab" {
                            section.lookup("tab_width")
                        } else {
                            Some(value)
                        };
                        match size.map(|s| s.parse::<i64>()) {
                            Some(Ok(n)) => {
                                facts.push(fact(FactKind::IndentSize, FactValue::Int(n))?);
                            }
                            Some(Err(_)) => {
                                warn!(source = %source, "unparseable indent_size, skipping");
                            }
                            None => {}
                        }
                    }
                    "trim_trailing_whitespace" => {
                        if let Ok(b) = value.parse::<bool>() {
                            facts.push(fact(FactKind::TrailingWhitespace, FactValue::Bool(b))?);
                        }
                    }
                    "insert_final_newline" => {
                        if let Ok(b) = value.parse::<bool>() {
                            facts.push(fact(FactKind::FinalNewline, FactValue::Bool(b))?);
                        }
                    }
                    "charset" => {
                        facts.push(fact(FactKind::Charset, FactValue::Str(value))?);
                    }
                    "end_of_line" if ["lf", "cr", "crlf"].contains(&value.as_str()) => {
                        facts.push(fact(FactKind::LineBreaks, FactValue::Str(value))?);
                    }
                    _ => {}
                }
            }
        }

        Ok(facts)
    }
}

/// One `[glob]` section with its key/value entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub glob: String,
    pub entries: Vec<(String, String)>,
}

impl Section {
    /// Entries with later duplicates overriding earlier ones, original
    /// key order preserved.
    fn effective_entries(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        for (key, value) in &self.entries {
            if let Some(slot) = out.iter_mut().find(|(k, _)| k == key) {
                slot.1 = value.clone();
            } else {
                out.push((key.clone(), value.clone()));
            }
        }
        out
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

/// Parse style-config content into sections. Keys outside any section
/// and unrecognized lines are skipped.
pub fn parse(content: &str) -> Vec<Section> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sections: Vec<Section> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            sections.push(Section {
                glob: header.to_string(),
                entries: Vec::new(),
            });
            continue;
        }

        let Some(sep) = line.find(['=', ':']) else {
            continue;
        };
        let key = line[..sep].trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        let mut value = line[sep + 1..].trim().to_string();
        // ';' and '#' open a comment only when preceded by whitespace.
        if let Some(pos) = value.find(" ;").or_else(|| value.find(" #")) {
            value = value[..pos].trim_end().to_string();
        }
        if value == "\"\"" {
            value.clear();
        }
        if let Some(section) = sections.last_mut() {
            section.entries.push((key, value.to_lowercase()));
        }
    }

    sections
}

/// A compiled style-config section glob.
///
/// Supports `*` (anything but a path separator), `**` (anything), `?`,
/// bracket classes with `!`/`^` negation, brace alternation, and
/// `{lo..hi}` numeric ranges.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    regex: Regex,
    /// Bounds for each `{lo..hi}` capture group, in order.
    ranges: Vec<(i64, i64)>,
    file_name_only: bool,
}

impl GlobPattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let (body, ranges) = translate(pattern);
        let regex = Regex::new(&format!("(?s)^{body}$"))?;
        Ok(Self {
            regex,
            ranges,
            file_name_only: !pattern.contains('/'),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        // A pattern without a separator matches the file name alone.
        let target = if self.file_name_only {
            path.rsplit('/').next().unwrap_or(path)
        } else {
            path
        };
        let Some(caps) = self.regex.captures(target) else {
            return false;
        };
        self.ranges.iter().enumerate().all(|(i, (lo, hi))| {
            caps.get(i + 1)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .is_some_and(|n| n >= *lo && n <= *hi)
        })
    }
}

/// Translate a section glob into a regex body plus numeric-range bounds.
fn translate(pattern: &str) -> (String, Vec<(i64, i64)>) {
    let chars: Vec<char> = pattern.chars().collect();
    let mut result = String::new();
    let mut ranges = Vec::new();
    let mut brace_level = 0usize;
    let mut in_brackets = false;
    let mut index = 0usize;

    let matching_braces =
        chars.iter().filter(|c| **c == '{').count() == chars.iter().filter(|c| **c == '}').count();

    while index < chars.len() {
        let current = chars[index];
        index += 1;
        match current {
            '*' => {
                if chars.get(index) == Some(&'*') {
                    result.push_str(".*");
                    index += 1;
                } else {
                    result.push_str("[^/]*");
                }
            }
            '?' => result.push('.'),
            '[' => {
                if in_brackets {
                    result.push_str("\\[");
                    continue;
                }
                let close = chars[index..].iter().position(|c| *c == ']');
                let has_slash = close.is_some_and(|end| chars[index..index + end].contains(&'/'));
                match (close, has_slash) {
                    (Some(end), true) => {
                        // A class containing a separator is a literal.
                        let literal: String = chars[index..index + end + 1].iter().collect();
                        result.push_str("\\[");
                        result.push_str(&regex::escape(&literal));
                        index += end + 1;
                    }
                    (Some(_), false) => {
                        if matches!(chars.get(index), Some('!') | Some('^')) {
                            index += 1;
                            result.push_str("[^");
                        } else {
                            result.push('[');
                        }
                        in_brackets = true;
                    }
                    (None, _) => result.push_str("\\["),
                }
            }
            ']' => {
                result.push(']');
                in_brackets = false;
            }
            '-' => {
                if in_brackets {
                    result.push('-');
                } else {
                    result.push_str("\\-");
                }
            }
            '{' => {
                let close = find_brace_close(&chars, index);
                let has_comma = close
                    .is_some_and(|end| chars[index..end].contains(&','));
                match (close, has_comma) {
                    (Some(end), false) => {
                        let inner: String = chars[index..end].iter().collect();
                        if let Some((lo, hi)) = parse_numeric_range(&inner) {
                            ranges.push((lo, hi));
                            result.push_str("([+-]?\\d+)");
                        } else {
                            let (inner_body, inner_ranges) = translate(&inner);
                            result.push_str("\\{");
                            result.push_str(&inner_body);
                            result.push_str("\\}");
                            ranges.extend(inner_ranges);
                        }
                        index = end + 1;
                    }
                    (Some(_), true) if matching_braces => {
                        result.push_str("(?:");
                        brace_level += 1;
                    }
                    _ => result.push_str("\\{"),
                }
            }
            ',' => {
                if brace_level > 0 {
                    result.push('|');
                } else {
                    result.push_str("\\,");
                }
            }
            '}' => {
                if brace_level > 0 {
                    result.push(')');
                    brace_level -= 1;
                } else {
                    result.push_str("\\}");
                }
            }
            '/' => {
                if chars.get(index..index + 3) == Some(&['*', '*', '/']) {
                    // "/**/" spans zero or more path segments.
                    result.push_str("(?:/|/.*/)");
                    index += 3;
                } else {
                    result.push('/');
                }
            }
            '\\' => {
                if let Some(next) = chars.get(index) {
                    result.push_str(&regex::escape(&next.to_string()));
                    index += 1;
                } else {
                    result.push_str("\\\\");
                }
            }
            other => {
                if in_brackets {
                    result.push(other);
                } else {
                    result.push_str(&regex::escape(&other.to_string()));
                }
            }
        }
    }

    (result, ranges)
}

fn find_brace_close(chars: &[char], from: usize) -> Option<usize> {
    let mut idx = from;
    while idx < chars.len() {
        match chars[idx] {
            '\\' => idx += 1,
            '}' => return Some(idx),
            _ => {}
        }
        idx += 1;
    }
    None
}

fn parse_numeric_range(inner: &str) -> Option<(i64, i64)> {
    let (lo, hi) = inner.split_once("..")?;
    Some((lo.trim().parse().ok()?, hi.trim().parse().ok()?))
}

/// Whether a fact scoped to `fact_scope` applies to a section whose
/// `files` globs describe its targets. Each section glob is reduced to a
/// representative path (wildcards become a generic stem) which is then
/// tested against the fact's scope pattern.
pub fn section_files_match(section_files: &[String], fact_scope: &str) -> bool {
    let Ok(pattern) = GlobPattern::compile(fact_scope) else {
        return false;
    };
    section_files.iter().any(|glob| {
        let sample = glob.replace("**", "file").replace('*', "file").replace('?', "x");
        pattern.matches(&sample)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_assertions::assert_eq;

    fn extract(content: &str) -> Vec<Fact> {
        EditorconfigExtractor
            .extract(Utf8Path::new(".editorconfig"), content)
            .unwrap()
    }

    #[test]
    fn derives_scoped_indent_facts() {
        let facts = extract("[*]\nindent_style = space\nindent_size = 4\n");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].kind(), FactKind::IndentStyle);
        assert_eq!(facts[0].value().as_str(), Some("space"));
        assert_eq!(facts[0].scope(), Some("*"));
        assert_eq!(facts[1].value().as_int(), Some(4));
    }

    #[test]
    fn indent_size_tab_uses_tab_width() {
        let facts = extract("[*]\nindent_size = tab\ntab_width = 8\n");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].kind(), FactKind::IndentSize);
        assert_eq!(facts[0].value().as_int(), Some(8));

        let none = extract("[*]\nindent_size = tab\n");
        assert!(none.is_empty());
    }

    #[test]
    fn duplicate_sections_produce_distinct_facts() {
        let facts = extract("[*]\nindent_style = space\n[*]\nindent_style = tab\n");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].value().as_str(), Some("space"));
        assert_eq!(facts[1].value().as_str(), Some("tab"));
    }

    #[test]
    fn later_keys_override_within_one_section_only() {
        let facts = extract(
            "[*.py]\nindent_style = tab\nindent_style = space\n[*.js]\nindent_style = tab\n",
        );
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].value().as_str(), Some("space"));
        assert_eq!(facts[0].scope(), Some("*.py"));
        assert_eq!(facts[1].value().as_str(), Some("tab"));
        assert_eq!(facts[1].scope(), Some("*.js"));
    }

    #[test]
    fn parser_handles_comments_and_empty_values() {
        let sections = parse("; preamble\n[*]\ncharset = utf-8 ; trailing\nquote = \"\"\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].entries,
            vec![
                ("charset".to_string(), "utf-8".to_string()),
                ("quote".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn boolean_keys_parse_and_bad_values_are_skipped() {
        let facts = extract("[*]\ntrim_trailing_whitespace = true\ninsert_final_newline = banana\n");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].kind(), FactKind::TrailingWhitespace);
        assert_eq!(facts[0].value().as_bool(), Some(true));
    }

    #[test]
    fn star_does_not_cross_separators() {
        let p = GlobPattern::compile("*.py").unwrap();
        assert!(p.matches("main.py"));
        assert!(p.matches("src/main.py")); // bare patterns match the file name
        let full = GlobPattern::compile("src/*.py").unwrap();
        assert!(full.matches("src/main.py"));
        assert!(!full.matches("src/deep/main.py"));
    }

    #[test]
    fn double_star_crosses_separators() {
        let p = GlobPattern::compile("src/**.py").unwrap();
        assert!(p.matches("src/main.py"));
        assert!(p.matches("src/deep/main.py"));
    }

    #[test]
    fn double_star_segment_spans_zero_or_more_directories() {
        let p = GlobPattern::compile("src/**/main.py").unwrap();
        assert!(p.matches("src/main.py"));
        assert!(p.matches("src/a/b/main.py"));
        assert!(!p.matches("lib/main.py"));
    }

    #[test]
    fn brace_alternation_and_classes() {
        let p = GlobPattern::compile("*.{js,py}").unwrap();
        assert!(p.matches("app.js"));
        assert!(p.matches("app.py"));
        assert!(!p.matches("app.rb"));

        let cls = GlobPattern::compile("file.[ch]").unwrap();
        assert!(cls.matches("file.c"));
        assert!(cls.matches("file.h"));
        assert!(!cls.matches("file.o"));

        let neg = GlobPattern::compile("file.[!o]").unwrap();
        assert!(neg.matches("file.c"));
        assert!(!neg.matches("file.o"));
    }

    #[test]
    fn numeric_ranges_check_bounds() {
        let p = GlobPattern::compile("v{1..12}.txt").unwrap();
        assert!(p.matches("v1.txt"));
        assert!(p.matches("v12.txt"));
        assert!(!p.matches("v13.txt"));
        assert!(!p.matches("v0.txt"));
    }

    #[test]
    fn question_mark_matches_a_single_character() {
        let p = GlobPattern::compile("a?.txt").unwrap();
        assert!(p.matches("ab.txt"));
        assert!(!p.matches("abc.txt"));
    }

    #[test]
    fn section_match_compares_section_globs_to_fact_scope() {
        let files = vec!["**.py".to_string()];
        assert!(section_files_match(&files, "*"));
        assert!(section_files_match(&files, "*.py"));
        assert!(!section_files_match(&files, "*.js"));
    }
}
