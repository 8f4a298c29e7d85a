//! Library interface for the `ffiweave` binary

pub mod config;

use anyhow::{Context, Result};
use ffiweave_codegen::{Codegen, DartCodegen};
use ffiweave_core::{ImportSpec, Library, TypeResolver};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::fs;
use std::path::Path;
use tracing::info;

pub use config::CliConfig;

/// Command-line values that take precedence over the description file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub preamble: Option<String>,
    pub library: Option<String>,
    pub part_of: Option<String>,
    pub parts: Vec<String>,
    /// Append a generation timestamp to the preamble
    pub timestamp: bool,
}

impl Overrides {
    /// Apply to `library`; `default_preamble` is used when a timestamp is
    /// requested and neither the flags nor the description carry a preamble
    pub fn apply(&self, library: &mut Library, default_preamble: &str) {
        if let Some(name) = &self.library {
            library.name = name.clone();
        }
        if let Some(parent) = &self.part_of {
            library.parent_module = Some(parent.clone());
        }
        if let Some(preamble) = &self.preamble {
            library.preamble = Some(preamble.clone());
        }
        library.parts.extend(self.parts.iter().cloned());

        if self.timestamp {
            let base = library
                .preamble
                .clone()
                .unwrap_or_else(|| default_preamble.to_string());
            library.preamble = Some(format!(
                "{}\n// Generated at: {}",
                base,
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
        }
    }
}

/// Parse `input` and generate the Dart source for it
pub fn generate_source(input: &Path, config: &CliConfig, overrides: &Overrides) -> Result<String> {
    let mut library = ffiweave_parser::parse_file(input)
        .with_context(|| format!("Failed to load description: {}", input.display()))?;
    overrides.apply(&mut library, &config.codegen.preamble);

    let mut codegen = DartCodegen::new().with_config(config.codegen.clone());
    let source = codegen
        .generate(&library)
        .with_context(|| format!("Failed to generate bindings for '{}'", library.name))?;
    Ok(source)
}

/// Generate bindings for `input` and write them to `output`
pub fn handle_generate(
    input: &Path,
    output: &Path,
    config: &CliConfig,
    overrides: &Overrides,
) -> Result<()> {
    info!("Generating Dart bindings from {:?}", input);
    let source = generate_source(input, config, overrides)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(output, source).with_context(|| format!("Failed to write output: {:?}", output))?;

    info!("Generated bindings written to {:?}", output);
    Ok(())
}

/// Describe how one type name resolves
pub fn describe_type(resolver: &TypeResolver, name: &str) -> Result<String> {
    let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();
    let host = resolver.resolve_host_type(name, &mut imports)?;
    let native = resolver.resolve_native_type(name, &mut imports)?;
    let annotation = resolver.resolve_annotation_type(name, &mut imports);

    let mut out = String::new();
    writeln!(out, "{}", name.trim())?;
    writeln!(out, "  host:       {}", host)?;
    writeln!(out, "  native:     {}", native)?;
    match annotation {
        Some(annotation) => writeln!(out, "  annotation: @{}()", annotation)?,
        None => writeln!(out, "  annotation: (none)")?,
    }
    if imports.is_empty() {
        writeln!(out, "  imports:    (none)")?;
    } else {
        for import in &imports {
            writeln!(out, "  imports:    {}", import)?;
        }
    }
    Ok(out)
}

/// One line per well-known type name
pub fn describe_known_types(resolver: &TypeResolver) -> String {
    resolver
        .known_types()
        .into_iter()
        .map(|(name, entry)| format!("{:<8} {:<7} {}\n", name, entry.host, entry.native))
        .collect()
}

/// Describe each of `names`, or the whole type table when `names` is empty
pub fn handle_resolve(names: &[String]) -> Result<String> {
    let resolver = TypeResolver::new();
    if names.is_empty() {
        return Ok(describe_known_types(&resolver));
    }

    let mut out = String::new();
    for name in names {
        let description = describe_type(&resolver, name)
            .with_context(|| format!("Failed to resolve type '{}'", name))?;
        out.push_str(&description);
    }
    Ok(out)
}
