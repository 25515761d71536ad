//! `package.json` extraction: license, declared dependencies, shipped
//! file globs, and man pages.

use camino::Utf8Path;
use serde_json::Value;
use tracing::warn;

use lintstrap_types::{ExtractorKind, Fact, FactKind, FactValue};

use crate::{ExtractError, Extractor};

pub struct PackageManifestExtractor;

impl Extractor for PackageManifestExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::PackageManifest
    }

    fn target_globs(&self) -> &[&str] {
        &["package.json"]
    }

    fn supported_globs(&self) -> &[&str] {
        &["package.json"]
    }

    fn declared_kinds(&self) -> &[FactKind] {
        &[
            FactKind::LicenseUsed,
            FactKind::ProjectDependency,
            FactKind::IncludePaths,
            FactKind::ManFiles,
        ]
    }

    fn extract(&self, source: &Utf8Path, content: &str) -> Result<Vec<Fact>, ExtractError> {
        let root: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(err) => {
                warn!(source = %source, error = %err, "malformed package manifest, skipping");
                return Ok(Vec::new());
            }
        };
        let mut facts = Vec::new();
        let fact = |kind: FactKind, value: FactValue| {
            Fact::new(kind, source.to_path_buf(), value, None, self.kind())
        };

        if let Some(license) = root.get("license").and_then(Value::as_str) {
            facts.push(fact(FactKind::LicenseUsed, FactValue::Str(license.to_string()))?);
        }

        for table in ["dependencies", "devDependencies"] {
            let Some(deps) = root.get(table).and_then(Value::as_object) else {
                continue;
            };
            for (name, constraint) in deps {
                facts.push(fact(
                    FactKind::ProjectDependency,
                    FactValue::Dependency {
                        name: name.clone(),
                        version: constraint.as_str().map(str::to_string),
                        url: None,
                    },
                )?);
            }
        }

        if let Some(files) = root.get("files").and_then(Value::as_array) {
            let paths = string_items(files);
            if !paths.is_empty() {
                facts.push(fact(FactKind::IncludePaths, FactValue::List(paths))?);
            }
        }

        match root.get("man") {
            Some(Value::String(page)) => {
                facts.push(fact(FactKind::ManFiles, FactValue::Str(page.clone()))?);
            }
            Some(Value::Array(pages)) => {
                facts.push(fact(FactKind::ManFiles, FactValue::List(string_items(pages)))?);
            }
            _ => {}
        }

        Ok(facts)
    }
}

fn string_items(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}
