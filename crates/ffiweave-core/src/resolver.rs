//! Type resolution for abstract binding type names
//!
//! Maps an abstract type name (`int32`, `*uint8`, `**void`, `MyStruct`) to the
//! Dart spelling used in ordinary code (the *host* type) and the spelling used
//! at the native call boundary (the *native* type).
//!
//! Resolution rules, applied through the [`TypeExpr`] grammar:
//!
//! 1. A pointer renders as `Pointer<target>`, where the target uses the native
//!    spelling of a table entry (or the literal name of an unknown type). A
//!    pointer to bare `void` renders as the untyped `Pointer`.
//! 2. A known name (case-insensitive) returns the requested table field and
//!    registers the entry's import.
//! 3. Any other name is passed through unchanged, so declarations generated
//!    elsewhere can be referenced by name.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::Result;
use crate::types::{ImportSink, ImportSpec, TypeEntry, TypeExpr};

/// Untyped pointer spelling, also the only annotation a pointer can carry
pub const POINTER_TYPE: &str = "Pointer";

static TYPE_TABLE: LazyLock<HashMap<&'static str, TypeEntry>> = LazyLock::new(build_type_table);

fn build_type_table() -> HashMap<&'static str, TypeEntry> {
    let ffi = ImportSpec::dart_ffi();
    let entry = |host: &'static str, native: &'static str| {
        TypeEntry::new(host, native).requires(ffi.clone())
    };

    let mut table = HashMap::new();
    table.insert("void", entry("void", "Void"));
    table.insert("intptr", entry("int", "IntPtr"));
    table.insert("size_t", entry("int", "IntPtr"));
    table.insert("char", entry("int", "Int8"));
    table.insert("int8", entry("int", "Int8"));
    table.insert("int16", entry("int", "Int16"));
    table.insert("int32", entry("int", "Int32"));
    table.insert("int64", entry("int", "Int64"));
    table.insert("uint8", entry("int", "Uint8"));
    table.insert("uint16", entry("int", "Uint16"));
    table.insert("uint32", entry("int", "Uint32"));
    table.insert("uint64", entry("int", "Uint64"));
    table.insert("float", entry("double", "Float"));
    table.insert("float32", entry("double", "Float"));
    table.insert("double", entry("double", "Double"));
    table.insert("float64", entry("double", "Double"));
    table
}

/// Which column of a [`TypeEntry`] a resolution returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spelling {
    Host,
    Native,
}

impl Spelling {
    fn select(self, entry: &TypeEntry) -> &'static str {
        match self {
            Spelling::Host => entry.host,
            Spelling::Native => entry.native,
        }
    }
}

/// Resolver over the process-wide, read-only type table.
///
/// The resolver holds no per-file state. Imports pulled in by a resolution are
/// registered into the caller's [`ImportSink`].
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver {
    table: &'static HashMap<&'static str, TypeEntry>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self {
            table: LazyLock::force(&TYPE_TABLE),
        }
    }

    /// Look up a well-known name without registering anything
    pub fn lookup(&self, name: &str) -> Option<&'static TypeEntry> {
        self.table.get(name.trim().to_ascii_lowercase().as_str())
    }

    /// All table keys with their entries, sorted by key
    pub fn known_types(&self) -> Vec<(&'static str, &'static TypeEntry)> {
        let mut entries: Vec<_> = self.table.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }

    /// Resolve the type used in ordinary Dart code
    pub fn resolve_host_type(&self, name: &str, imports: &mut dyn ImportSink) -> Result<String> {
        let expr = TypeExpr::parse(name)?;
        Ok(self.render(&expr, Spelling::Host, imports))
    }

    /// Resolve the type used at the native call boundary
    pub fn resolve_native_type(
        &self,
        name: &str,
        imports: &mut dyn ImportSink,
    ) -> Result<String> {
        let expr = TypeExpr::parse(name)?;
        Ok(self.render(&expr, Spelling::Native, imports))
    }

    /// Resolve the native annotation for a struct field.
    ///
    /// Pointers always annotate as the untyped `Pointer`. Unknown or absent
    /// names return `None`, meaning the annotation is omitted.
    pub fn resolve_annotation_type(
        &self,
        name: &str,
        imports: &mut dyn ImportSink,
    ) -> Option<String> {
        match TypeExpr::parse(name).ok()? {
            TypeExpr::Pointer(_) => {
                imports.register_import(ImportSpec::dart_ffi());
                Some(POINTER_TYPE.to_string())
            }
            TypeExpr::Named(base) => {
                let entry = self.lookup_registering(&base, imports)?;
                Some(entry.native.to_string())
            }
        }
    }

    fn render(&self, expr: &TypeExpr, spelling: Spelling, imports: &mut dyn ImportSink) -> String {
        match expr {
            TypeExpr::Pointer(target) => self.render_pointer(target, imports),
            TypeExpr::Named(name) => match self.lookup_registering(name, imports) {
                Some(entry) => spelling.select(entry).to_string(),
                None => {
                    tracing::trace!("TypeResolver: passing '{}' through as a declared name", name);
                    name.clone()
                }
            },
        }
    }

    fn render_pointer(&self, target: &TypeExpr, imports: &mut dyn ImportSink) -> String {
        imports.register_import(ImportSpec::dart_ffi());

        if target.is_void() {
            return POINTER_TYPE.to_string();
        }

        // Pointer targets always use the native spelling.
        let inner = self.render(target, Spelling::Native, imports);
        format!("{}<{}>", POINTER_TYPE, inner)
    }

    fn lookup_registering(
        &self,
        name: &str,
        imports: &mut dyn ImportSink,
    ) -> Option<&'static TypeEntry> {
        let entry = self.lookup(name)?;
        if let Some(import) = &entry.required_import {
            imports.register_import(import.clone());
        }
        Some(entry)
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}
