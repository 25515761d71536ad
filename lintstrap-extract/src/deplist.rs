//! Gemfile extraction: one dependency fact per `gem` line.

use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;

use lintstrap_types::{ExtractorKind, Fact, FactKind, FactValue};

use crate::{ExtractError, Extractor};

pub struct DependencyListExtractor;

impl Extractor for DependencyListExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::DependencyList
    }

    fn target_globs(&self) -> &[&str] {
        &["Gemfile"]
    }

    fn supported_globs(&self) -> &[&str] {
        &["Gemfile"]
    }

    fn declared_kinds(&self) -> &[FactKind] {
        &[FactKind::ProjectDependency]
    }

    fn extract(&self, source: &Utf8Path, content: &str) -> Result<Vec<Fact>, ExtractError> {
        let mut facts = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some(gem) = parse_gem_line(line) else {
                continue;
            };
            facts.push(Fact::new(
                FactKind::ProjectDependency,
                source.to_path_buf(),
                FactValue::Dependency {
                    name: gem.name,
                    version: gem.version,
                    url: gem.url,
                },
                None,
                self.kind(),
            )?);
        }
        Ok(facts)
    }
}

struct GemLine {
    name: String,
    version: Option<String>,
    url: Option<String>,
}

// `gem 'name'` with optional version constraint and options.
static GEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^gem\s+['"](?<name>[^'"]+)['"](?:\s*,\s*['"](?<version>[^'"]+)['"])?(?<rest>.*)$"#)
        .expect("invalid gem line regex")
});

static GEM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:git|source):\s*['"](?<url>[^'"]+)['"]"#).expect("invalid gem url regex")
});

fn parse_gem_line(line: &str) -> Option<GemLine> {
    let caps = GEM_LINE.captures(line)?;
    let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
    Some(GemLine {
        name: caps["name"].to_string(),
        version: caps.name("version").map(|m| m.as_str().to_string()),
        url: GEM_URL.captures(rest).map(|u| u["url"].to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_assertions::assert_eq;

    fn extract(content: &str) -> Vec<Fact> {
        DependencyListExtractor
            .extract(Utf8Path::new("Gemfile"), content)
            .unwrap()
    }

    fn dep(fact: &Fact) -> (&str, Option<&str>, Option<&str>) {
        match fact.value() {
            FactValue::Dependency { name, version, url } => {
                (name.as_str(), version.as_deref(), url.as_deref())
            }
            other => panic!("not a dependency value: {other:?}"),
        }
    }

    #[test]
    fn parses_plain_and_versioned_gems() {
        let facts = extract("source 'https://rubygems.org'\n\ngem 'rake'\ngem 'rubocop', '~> 0.52'\n");
        assert_eq!(facts.len(), 2);
        assert_eq!(dep(&facts[0]), ("rake", None, None));
        assert_eq!(dep(&facts[1]), ("rubocop", Some("~> 0.52"), None));
    }

    #[test]
    fn captures_git_sources() {
        let facts = extract("gem 'scss_lint', git: 'https://example.com/scss-lint.git'\n");
        assert_eq!(
            dep(&facts[0]),
            ("scss_lint", None, Some("https://example.com/scss-lint.git"))
        );
    }

    #[test]
    fn skips_comments_and_unrelated_lines() {
        let facts = extract("# gem 'not_me'\ngroup :test do\n  gem \"minitest\", \"5.0\"\nend\n");
        assert_eq!(facts.len(), 1);
        assert_eq!(dep(&facts[0]), ("minitest", Some("5.0"), None));
    }
}
