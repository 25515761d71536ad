mod config;
mod render;
mod scan;

use std::collections::BTreeMap;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::Parser;
use config::ConfigMerger;
use fs_err as fs;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use lintstrap_catalog::{
    PluginCatalog, builtin_catalog, catalog_from_json, extensions_by_language, partition_pools,
    split_by_language,
};
use lintstrap_domain::{
    MappingTable, RandomTieBreak, SelectionConfig, SelectionEngine, SettingsResolver,
    generate_sections, prompt_coverage_target,
};
use lintstrap_extract::collect_facts;
use lintstrap_prompt::ConsolePrompt;
use lintstrap_types::Capability;

#[derive(Debug, Parser)]
#[command(
    name = "lintstrap",
    version,
    about = "Sets up a lint-host configuration by mining your project's manifests."
)]
struct Cli {
    /// Project root to analyze (default: current directory).
    #[arg(long, default_value = ".")]
    project_dir: Utf8PathBuf,

    /// Plugin catalog JSON file (default: the built-in catalog).
    #[arg(long)]
    catalog: Option<Utf8PathBuf>,

    /// Suppress all prompts; anything that would need input is dropped.
    #[arg(long, default_value_t = false)]
    non_interactive: bool,

    /// Skip capability filtering; select by allowlist and proposals alone.
    #[arg(long, default_value_t = false)]
    no_filter_by_capabilities: bool,

    /// Write the generated configuration next to the project instead of
    /// printing it.
    #[arg(long, default_value_t = false)]
    write: bool,

    /// Leave the sections without resolved settings.
    #[arg(long, default_value_t = false)]
    incomplete_sections: bool,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let project_dir = cli.project_dir;

    let file_config =
        config::load_or_default(&project_dir).context("load .lintstrap.toml config")?;
    let merged = ConfigMerger::new(file_config)
        .merge_args(cli.non_interactive, cli.no_filter_by_capabilities)?;
    debug!(
        interactive = merged.interactive,
        filter = merged.filter_by_capabilities,
        "merged configuration"
    );

    let catalog: Box<dyn PluginCatalog> = match &cli.catalog {
        Some(path) => {
            let contents =
                fs::read_to_string(path).with_context(|| format!("read catalog {}", path))?;
            Box::new(
                catalog_from_json(&contents)
                    .with_context(|| format!("parse catalog {}", path))?,
            )
        }
        None => Box::new(builtin_catalog()),
    };

    let facts = collect_facts(&project_dir)
        .with_context(|| format!("extract facts from {}", project_dir))?;
    info!(count = facts.len(), "facts mined from project manifests");

    let scan = scan::scan_project(&project_dir)?;
    let by_language = split_by_language(&scan.files);
    let languages: Vec<String> = by_language.keys().cloned().collect();
    info!(languages = ?languages, "languages detected");

    // Per-language file globs, "**<ext>" per extension in use.
    let globs_by_language: BTreeMap<String, Vec<String>> =
        extensions_by_language(&scan.files)
            .into_iter()
            .map(|(language, exts)| {
                let globs = exts.into_iter().map(|ext| format!("**{ext}")).collect();
                (language, globs)
            })
            .collect();

    let stdin = std::io::stdin();
    let mut prompt = ConsolePrompt::new(stdin.lock(), std::io::stdout())
        .with_max_retries(merged.max_retries);

    let coverage_target = match merged.coverage_target.clone() {
        Some(target) => target,
        None if merged.interactive && merged.filter_by_capabilities => {
            prompt_coverage_target(&mut prompt)?
        }
        None => Capability::default_targets(),
    };

    let pools = partition_pools(catalog.as_ref(), &languages);
    let mappings = MappingTable::builtin();
    let mut engine = SelectionEngine::new(
        SelectionConfig {
            allowlist: merged.allowlist.clone(),
            coverage_target,
            filter_by_capabilities: merged.filter_by_capabilities,
            interactive: merged.interactive,
        },
        &mappings,
        Box::new(RandomTieBreak),
    );
    let selection = engine.select(&pools, &facts, &globs_by_language, &mut prompt)?;

    let mut sections = generate_sections(&selection, &globs_by_language, |name| {
        catalog.get(name).cloned()
    });
    if let Some(default) = sections.first_mut() {
        default.ignore = scan.ignore_globs.clone();
    }

    if !cli.incomplete_sections {
        let resolver = SettingsResolver::new(&mappings, catalog.as_ref(), merged.interactive);
        for section in &mut sections {
            resolver.resolve(section, &facts, &mut prompt)?;
        }
    }

    let rendered = render::render_sections(&sections, &Utc::now().format("%Y-%m-%d").to_string());
    if cli.write {
        let path = render::write_config(&project_dir, &rendered)?;
        info!("configuration written to {}", path);
    } else {
        std::io::stdout().write_all(rendered.as_bytes())?;
    }

    Ok(())
}
