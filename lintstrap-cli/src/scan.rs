//! Project file discovery.
//!
//! Walks the project root and returns relative file paths, honoring
//! `.gitignore`-derived ignore globs plus the `.git` directory itself.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use glob::Pattern;
use tracing::{debug, warn};

/// What a project walk found.
#[derive(Debug, Clone, Default)]
pub struct ProjectScan {
    /// Relative paths of every non-ignored file.
    pub files: Vec<String>,
    /// The ignore globs that were in effect, `.git/**` included.
    pub ignore_globs: Vec<String>,
}

pub fn scan_project(project_dir: &Utf8Path) -> anyhow::Result<ProjectScan> {
    let ignore_globs = ignore_globs(project_dir);
    let ignore = compile_ignores(&ignore_globs);

    let mut files = Vec::new();
    let pattern = format!("{project_dir}/**/*");
    let entries = glob::glob(&pattern).with_context(|| format!("walk {}", project_dir))?;
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(error = %err, "unreadable entry during project walk, skipping");
                continue;
            }
        };
        if path.is_dir() {
            continue;
        }
        let Some(rel) = path
            .strip_prefix(project_dir.as_std_path())
            .ok()
            .and_then(|p| p.to_str())
        else {
            continue;
        };
        let rel = rel.replace('\\', "/");
        if is_ignored(&ignore, &rel) {
            continue;
        }
        files.push(rel);
    }
    files.sort();
    debug!(count = files.len(), "project files collected");

    Ok(ProjectScan {
        files,
        ignore_globs,
    })
}

/// Ignore globs for a project: the `.git` tree plus normalized
/// `.gitignore` entries. Negated entries are not supported and are
/// skipped.
fn ignore_globs(project_dir: &Utf8Path) -> Vec<String> {
    let mut globs = vec![".git/**".to_string()];
    let gitignore = project_dir.join(".gitignore");
    if !gitignore.exists() {
        return globs;
    }
    match fs::read_to_string(&gitignore) {
        Ok(content) => {
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                let mut glob = line.trim_start_matches('/').to_string();
                if glob.ends_with('/') {
                    glob.push_str("**");
                }
                globs.push(glob);
            }
        }
        Err(err) => warn!(error = %err, "unreadable .gitignore, ignoring it"),
    }
    globs
}

struct IgnorePattern {
    pattern: Pattern,
    /// Entries without a separator also match by file name, the way
    /// gitignore entries do.
    name_only: bool,
}

fn compile_ignores(globs: &[String]) -> Vec<IgnorePattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(IgnorePattern {
                pattern,
                name_only: !glob.contains('/'),
            }),
            Err(err) => {
                warn!(glob, error = %err, "invalid ignore glob, skipping");
                None
            }
        })
        .collect()
}

fn is_ignored(patterns: &[IgnorePattern], rel: &str) -> bool {
    patterns.iter().any(|ignore| {
        if ignore.pattern.matches(rel) {
            return true;
        }
        if ignore.name_only {
            let name = rel.rsplit('/').next().unwrap_or(rel);
            return ignore.pattern.matches(name);
        }
        false
    })
}
