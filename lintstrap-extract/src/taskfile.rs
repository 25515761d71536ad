//! Gruntfile extraction.
//!
//! Gruntfiles are scripts, not data, so this does not evaluate anything.
//! A tolerant scanner locates `grunt.<method>(...)` calls and parses each
//! argument list as a JSON-like literal; function bodies and other
//! non-literal arguments become null placeholders. Facts are then derived
//! by structural lookup over the parsed arguments.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde_json::Value;
use tracing::warn;

use lintstrap_types::{ExtractorKind, Fact, FactKind, FactValue};

use crate::{ExtractError, Extractor};

/// Config keys naming paths a linter should cover.
const INCLUDE_KEYS: &[&str] = &["all", "main", "files", "src", "sources"];
/// Config keys naming paths a linter should skip.
const IGNORE_KEYS: &[&str] = &["ignore", "exclude"];

pub struct BuildTaskExtractor;

impl Extractor for BuildTaskExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::BuildTask
    }

    fn target_globs(&self) -> &[&str] {
        &["Gruntfile.js", "gruntfile.js"]
    }

    fn supported_globs(&self) -> &[&str] {
        &["Gruntfile.js", "gruntfile.js"]
    }

    fn declared_kinds(&self) -> &[FactKind] {
        &[FactKind::LintTask, FactKind::MentionedTasks]
    }

    fn extract(&self, source: &Utf8Path, content: &str) -> Result<Vec<Fact>, ExtractError> {
        let mut facts = Vec::new();

        let init_config = scan_calls(content, "initConfig")
            .into_iter()
            .filter_map(|args| args.into_iter().next())
            .find_map(|arg| match arg {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        for task in lint_subtasks(content) {
            let name = task.split(':').next().unwrap_or(&task).to_string();
            let mut include = Vec::new();
            let mut ignore = Vec::new();
            let mut config = BTreeMap::new();
            if let Some(Value::Object(section)) = init_config.get(&name) {
                collect_config(source, section, &mut include, &mut ignore, &mut config);
            }
            facts.push(Fact::new(
                FactKind::LintTask,
                source.to_path_buf(),
                FactValue::LintTask {
                    task: name,
                    include,
                    ignore,
                    config,
                },
                None,
                self.kind(),
            )?);
        }

        let mentioned: Vec<String> = scan_calls(content, "loadNpmTasks")
            .into_iter()
            .filter_map(|args| args.into_iter().next())
            .filter_map(|arg| match arg {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        if !mentioned.is_empty() {
            facts.push(Fact::new(
                FactKind::MentionedTasks,
                source.to_path_buf(),
                FactValue::List(mentioned),
                None,
                self.kind(),
            )?);
        }

        Ok(facts)
    }
}

/// Subtasks registered under the "lint" alias, in order.
fn lint_subtasks(content: &str) -> Vec<String> {
    for args in scan_calls(content, "registerTask") {
        let mut args = args.into_iter();
        if args.next().and_then(string_value) != Some("lint".to_string()) {
            continue;
        }
        if let Some(Value::Array(items)) = args.next() {
            return items.into_iter().filter_map(string_value).collect();
        }
    }
    Vec::new()
}

fn string_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Walk a linter's config section: include/ignore keys contribute path
/// globs at any nesting depth, other scalar leaves become stringified
/// settings. Non-scalar leftovers are dropped.
fn collect_config(
    source: &Utf8Path,
    section: &serde_json::Map<String, Value>,
    include: &mut Vec<String>,
    ignore: &mut Vec<String>,
    config: &mut BTreeMap<String, String>,
) {
    for (key, value) in section {
        if INCLUDE_KEYS.contains(&key.as_str()) {
            include.extend(path_globs(value));
        } else if IGNORE_KEYS.contains(&key.as_str()) {
            ignore.extend(path_globs(value));
        } else {
            match value {
                Value::Object(nested) => {
                    collect_config(source, nested, include, ignore, config);
                }
                Value::String(s) => {
                    config.insert(key.clone(), s.clone());
                }
                Value::Number(n) => {
                    config.insert(key.clone(), n.to_string());
                }
                Value::Bool(b) => {
                    config.insert(key.clone(), b.to_string());
                }
                _ => {
                    warn!(source = %source, key, "dropping non-literal task config value");
                }
            }
        }
    }
}

fn path_globs(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Value::Object(map) => map.values().flat_map(path_globs).collect(),
        _ => Vec::new(),
    }
}

/// All `grunt.<method>(...)` argument lists in the script, with each
/// argument parsed as a literal where possible.
fn scan_calls(content: &str, method: &str) -> Vec<Vec<Value>> {
    let needle = format!("grunt.{method}");
    let mut calls = Vec::new();
    let mut from = 0;
    while let Some(at) = content[from..].find(&needle) {
        let after = from + at + needle.len();
        let rest = content[after..].trim_start();
        if rest.starts_with('(') {
            let open = content.len() - rest.len();
            let mut parser = LiteralParser::new(&content[open + 1..]);
            match parser.parse_args() {
                Some(args) => calls.push(args),
                None => warn!(method, "unbalanced call arguments, skipping"),
            }
        }
        from = after;
    }
    calls
}

/// Recursive-descent parser for JS literal expressions, tolerant of
/// anything it cannot represent (functions, templates, concatenations),
/// which parse to null by consuming balanced tokens.
struct LiteralParser<'a> {
    chars: Vec<char>,
    pos: usize,
    text: &'a str,
}

impl<'a> LiteralParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            text,
        }
    }

    /// Parse a comma-separated argument list up to the closing paren.
    fn parse_args(&mut self) -> Option<Vec<Value>> {
        let mut args = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek()? {
                ')' => {
                    self.pos += 1;
                    return Some(args);
                }
                ',' => {
                    self.pos += 1;
                }
                _ => args.push(self.parse_value()?),
            }
        }
    }

    fn parse_value(&mut self) -> Option<Value> {
        self.skip_trivia();
        match self.peek()? {
            '"' | '\'' => self.parse_string().map(Value::String),
            '{' => self.parse_object(),
            '[' => self.parse_array(),
            c if c.is_ascii_digit() || c == '-' || c == '+' => Some(self.parse_number()),
            _ => Some(self.parse_bareword()),
        }
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.peek()?;
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '\\' => {
                    if let Some(escaped) = self.peek() {
                        self.pos += 1;
                        out.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            other => other,
                        });
                    }
                }
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
        None
    }

    fn parse_object(&mut self) -> Option<Value> {
        self.pos += 1; // past '{'
        let mut map = serde_json::Map::new();
        loop {
            self.skip_trivia();
            match self.peek()? {
                '}' => {
                    self.pos += 1;
                    return Some(Value::Object(map));
                }
                ',' => {
                    self.pos += 1;
                }
                _ => {
                    let key = match self.peek()? {
                        '"' | '\'' => self.parse_string()?,
                        _ => self.take_identifier(),
                    };
                    self.skip_trivia();
                    if self.peek()? != ':' {
                        return None;
                    }
                    self.pos += 1;
                    let value = self.parse_value()?;
                    map.insert(key, value);
                }
            }
        }
    }

    fn parse_array(&mut self) -> Option<Value> {
        self.pos += 1; // past '['
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek()? {
                ']' => {
                    self.pos += 1;
                    return Some(Value::Array(items));
                }
                ',' => {
                    self.pos += 1;
                }
                _ => items.push(self.parse_value()?),
            }
        }
    }

    fn parse_number(&mut self) -> Value {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(n) = text.parse::<i64>() {
            return Value::from(n);
        }
        if let Ok(f) = text.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Value::Number(n);
            }
        }
        Value::Null
    }

    /// Identifiers, function expressions, and anything else non-literal:
    /// `true`/`false`/`null` keep their meaning, the rest is consumed as
    /// one balanced token run and becomes null.
    fn parse_bareword(&mut self) -> Value {
        let word = self.take_identifier();
        match word.as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }
        self.consume_balanced();
        Value::Null
    }

    fn take_identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// Consume up to the next top-level ',' or closer, balancing nested
    /// brackets and skipping string contents.
    fn consume_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '(' | '{' | '[' => {
                    depth += 1;
                    self.pos += 1;
                }
                ')' | '}' | ']' => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.pos += 1;
                }
                ',' if depth == 0 => return,
                '"' | '\'' => {
                    let _ = self.parse_string();
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.pos += 1;
            }
            if self.starts_with("//") {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.pos += 1;
                }
            } else if self.starts_with("/*") {
                self.pos += 2;
                while self.peek().is_some() && !self.starts_with("*/") {
                    self.pos += 1;
                }
                self.pos += 2.min(self.chars.len().saturating_sub(self.pos));
            } else {
                return;
            }
        }
    }

    fn starts_with(&self, token: &str) -> bool {
        self.text
            .get(self.byte_offset()..)
            .is_some_and(|rest| rest.starts_with(token))
    }

    fn byte_offset(&self) -> usize {
        self.chars[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use pretty_assertions::assert_eq;

    const GRUNTFILE: &str = r#"
module.exports = function(grunt) {
    grunt.initConfig({
        pkg: grunt.file.readJSON('package.json'),
        coffeelint: {
            main: ['src/**/*.coffee'],
            exclude: ['vendor/**'],
            options: {
                max_line_length: 100,
                no_tabs: true
            }
        },
        jshint: {
            all: 'lib/*.js'
        }
    });

    grunt.loadNpmTasks('grunt-coffeelint');
    grunt.loadNpmTasks('grunt-contrib-jshint');

    grunt.registerTask('lint', ['coffeelint:main', 'jshint']);
    grunt.registerTask('default', ['lint']);
};
"#;

    fn extract(content: &str) -> Vec<Fact> {
        BuildTaskExtractor
            .extract(Utf8Path::new("Gruntfile.js"), content)
            .unwrap()
    }

    #[test]
    fn lint_alias_yields_one_task_fact_per_subtask() {
        let facts = extract(GRUNTFILE);
        let tasks: Vec<&FactValue> = facts
            .iter()
            .filter(|f| f.kind() == FactKind::LintTask)
            .map(Fact::value)
            .collect();
        assert_eq!(tasks.len(), 2);
        assert_eq!(
            tasks[0],
            &FactValue::LintTask {
                task: "coffeelint".to_string(),
                include: vec!["src/**/*.coffee".to_string()],
                ignore: vec!["vendor/**".to_string()],
                config: [
                    ("max_line_length".to_string(), "100".to_string()),
                    ("no_tabs".to_string(), "true".to_string()),
                ]
                .into_iter()
                .collect(),
            }
        );
        assert_eq!(
            tasks[1],
            &FactValue::LintTask {
                task: "jshint".to_string(),
                include: vec!["lib/*.js".to_string()],
                ignore: Vec::new(),
                config: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn npm_task_packages_are_reported_together() {
        let facts = extract(GRUNTFILE);
        let mentioned = facts
            .iter()
            .find(|f| f.kind() == FactKind::MentionedTasks)
            .map(Fact::value);
        assert_eq!(
            mentioned,
            Some(&FactValue::List(vec![
                "grunt-coffeelint".to_string(),
                "grunt-contrib-jshint".to_string(),
            ]))
        );
    }

    #[test]
    fn scripts_without_a_lint_alias_yield_no_task_facts() {
        let facts = extract("grunt.registerTask('default', ['uglify']);\n");
        assert!(facts.is_empty());
    }

    #[test]
    fn non_literal_arguments_become_null_placeholders() {
        let calls = scan_calls(
            "grunt.initConfig({ watch: { tasks: someVar, fn: function(a) { return a; } } });",
            "initConfig",
        );
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0][0],
            serde_json::json!({ "watch": { "tasks": null, "fn": null } })
        );
    }

    #[test]
    fn parser_handles_comments_and_nested_quotes() {
        let calls = scan_calls(
            "grunt.registerTask('lint', /* alias */ ['a:b', \"c\"]); // done",
            "registerTask",
        );
        assert_eq!(
            calls[0],
            vec![
                Value::String("lint".to_string()),
                serde_json::json!(["a:b", "c"]),
            ]
        );
    }
}
