//! Incremental source-text assembly for one generated Dart file
//!
//! The [`SourceAssembler`] accumulates everything a generation pass produces
//! and renders it into a single document:
//!
//! ```text
//! <preamble>
//!
//! library <id>;            (optional)
//!
//! part of <id>;            (optional)
//!
//! import '...';            (sorted by uri, then prefix)
//! part '...';              (sorted)
//!
//! <body fragments in append order>
//! ```
//!
//! ## Usage
//!
//! ```
//! use ffiweave_codegen::assembler::SourceAssembler;
//! use ffiweave_core::ImportSpec;
//!
//! let mut assembler = SourceAssembler::new();
//! assembler.set_preamble("// generated");
//! assembler.register_import(ImportSpec::dart_ffi());
//! assembler.append_text("class Handle extends Opaque {}\n");
//!
//! let source = assembler.render();
//! assert!(source.contains("import 'dart:ffi';"));
//! ```

use std::collections::BTreeSet;
use std::fmt;

use ffiweave_core::{ImportSink, ImportSpec};

/// Mutable generation state for a single output file.
///
/// All mutators may be called in any order before or between renders;
/// [`render`](Self::render) is a pure projection of the current state.
#[derive(Debug, Clone, Default)]
pub struct SourceAssembler {
    library_identifier: Option<String>,
    parent_module_identifier: Option<String>,
    preamble: String,
    imports: BTreeSet<ImportSpec>,
    file_parts: BTreeSet<String>,
    /// Append-only; never reordered or deduplicated
    body: Vec<String>,
}

impl SourceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_library_identifier(&mut self, identifier: impl Into<String>) {
        self.library_identifier = Some(identifier.into());
    }

    pub fn clear_library_identifier(&mut self) {
        self.library_identifier = None;
    }

    pub fn set_parent_module_identifier(&mut self, identifier: impl Into<String>) {
        self.parent_module_identifier = Some(identifier.into());
    }

    pub fn clear_parent_module_identifier(&mut self) {
        self.parent_module_identifier = None;
    }

    pub fn set_preamble(&mut self, preamble: impl Into<String>) {
        self.preamble = preamble.into();
    }

    pub fn library_identifier(&self) -> Option<&str> {
        self.library_identifier.as_deref()
    }

    pub fn parent_module_identifier(&self) -> Option<&str> {
        self.parent_module_identifier.as_deref()
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Append a fragment to the body. No validation or escaping is done.
    pub fn append_text(&mut self, fragment: impl Into<String>) {
        self.body.push(fragment.into());
    }

    /// Append each fragment, with `separator` between consecutive fragments
    pub fn append_all<I, S>(&mut self, fragments: I, separator: &str)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, fragment) in fragments.into_iter().enumerate() {
            if index > 0 && !separator.is_empty() {
                self.append_text(separator);
            }
            self.append_text(fragment);
        }
    }

    /// Register an import; registering an equal import again has no effect
    pub fn register_import(&mut self, spec: ImportSpec) {
        if !self.imports.contains(&spec) {
            tracing::trace!("SourceAssembler: registering {}", spec);
            self.imports.insert(spec);
        }
    }

    /// Register a `part` directive; idempotent
    pub fn register_file_part(&mut self, name: impl Into<String>) {
        self.file_parts.insert(name.into());
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter()
    }

    pub fn file_parts(&self) -> impl Iterator<Item = &str> {
        self.file_parts.iter().map(String::as_str)
    }

    pub fn has_imports(&self) -> bool {
        !self.imports.is_empty()
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty_body(&self) -> bool {
        self.body.is_empty()
    }

    /// Render the complete document
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn stats(&self) -> AssemblerStats {
        AssemblerStats {
            imports: self.imports.len(),
            file_parts: self.file_parts.len(),
            fragments: self.body.len(),
            body_bytes: self.body.iter().map(String::len).sum(),
        }
    }
}

impl ImportSink for SourceAssembler {
    fn register_import(&mut self, spec: ImportSpec) {
        SourceAssembler::register_import(self, spec);
    }
}

impl fmt::Display for SourceAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.preamble)?;

        if let Some(library) = &self.library_identifier {
            writeln!(f)?;
            writeln!(f, "library {};", library)?;
        }

        if let Some(parent) = &self.parent_module_identifier {
            writeln!(f)?;
            writeln!(f, "part of {};", parent)?;
        }

        // Imports and parts form one directive block.
        if !self.imports.is_empty() || !self.file_parts.is_empty() {
            writeln!(f)?;
            for import in &self.imports {
                writeln!(f, "{}", import)?;
            }
            for part in &self.file_parts {
                writeln!(f, "part '{}';", part)?;
            }
        }

        writeln!(f)?;
        for fragment in &self.body {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

/// Size summary of an assembler's current state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub imports: usize,
    pub file_parts: usize,
    pub fragments: usize,
    pub body_bytes: usize,
}
