//! Text rendering of generated sections, and the config file writer.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::info;

use lintstrap_domain::Section;

/// The config file lintstrap generates.
pub const CONF_FILE_NAME: &str = ".lintstrap.conf";

/// Render every section into the host tool's config file format: a
/// section header, comma-joined plugin and glob lists, then one line per
/// resolved setting.
pub fn render_sections(sections: &[Section], generated_at: &str) -> String {
    let mut out = format!("# Generated by lintstrap on {generated_at}.\n");
    for section in sections {
        out.push('\n');
        out.push_str(&format!("[{}]\n", section.name));
        if !section.plugins.is_empty() {
            let names: Vec<&str> = section.plugins.iter().map(|p| p.name.as_str()).collect();
            out.push_str(&format!("plugins = {}\n", names.join(", ")));
        }
        if !section.files.is_empty() {
            out.push_str(&format!("files = {}\n", section.files.join(", ")));
        }
        if !section.ignore.is_empty() {
            out.push_str(&format!("ignore = {}\n", section.ignore.join(", ")));
        }
        for setting in &section.settings {
            out.push_str(&format!("{} = {}\n", setting.key, setting.value));
        }
    }
    out
}

/// Write the rendered config at the project root. An existing file is
/// left untouched; the new content goes to a `.new`-suffixed path.
pub fn write_config(project_dir: &Utf8Path, content: &str) -> anyhow::Result<Utf8PathBuf> {
    let mut path = project_dir.join(CONF_FILE_NAME);
    if path.exists() {
        info!("{} already exists, writing alongside it", path);
        path = project_dir.join(format!("{CONF_FILE_NAME}.new"));
    }
    fs::write(&path, content).with_context(|| format!("write {}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    use lintstrap_types::{Plugin, SettingValue};

    fn plugin(name: &str) -> Plugin {
        Plugin {
            name: name.to_string(),
            languages: BTreeSet::new(),
            can_detect: BTreeSet::new(),
            can_fix: BTreeSet::new(),
            requirements: vec![],
            settings: vec![],
            dependencies: vec![],
            requirements_satisfied: true,
        }
    }

    #[test]
    fn sections_render_in_the_host_format() {
        let sections = vec![
            Section {
                name: "default".to_string(),
                files: vec!["**".to_string()],
                ignore: vec![".git/**".to_string()],
                plugins: vec![plugin("FilenameLint"), plugin("KeywordLint")],
                settings: vec![],
            },
            Section {
                name: "python".to_string(),
                files: vec!["**.py".to_string()],
                ignore: vec![],
                plugins: vec![plugin("Pep8Lint")],
                settings: vec![SettingValue::autofilled("use_spaces", "true")],
            },
        ];
        let text = render_sections(&sections, "2026-08-29");
        assert_eq!(
            text,
            "# Generated by lintstrap on 2026-08-29.\n\
             \n\
             [default]\n\
             plugins = FilenameLint, KeywordLint\n\
             files = **\n\
             ignore = .git/**\n\
             \n\
             [python]\n\
             plugins = Pep8Lint\n\
             files = **.py\n\
             use_spaces = true\n"
        );
    }

    #[test]
    fn existing_config_is_preserved_with_a_new_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join(CONF_FILE_NAME), "old").unwrap();

        let written = write_config(&root, "new content").unwrap();
        assert!(written.as_str().ends_with(".new"));
        assert_eq!(
            std::fs::read_to_string(root.join(CONF_FILE_NAME)).unwrap(),
            "old"
        );
        assert_eq!(std::fs::read_to_string(written).unwrap(), "new content");
    }

    #[test]
    fn fresh_config_is_written_in_place() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let written = write_config(&root, "content").unwrap();
        assert_eq!(written, root.join(CONF_FILE_NAME));
    }
}
