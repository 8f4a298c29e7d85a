//! Value types shared by the resolver and the source assembler
//!
//! - [`ImportSpec`]: an external import a resolved type depends on
//! - [`TypeEntry`]: one row of the well-known type table
//! - [`TypeExpr`]: the parsed form of an abstract type name
//! - [`ImportSink`]: anything that can collect imports during resolution

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CoreError, Result};

/// Prefix marking "pointer to" the remainder of a type name
pub const POINTER_MARKER: char = '*';

/// An import directive required by the generated file.
///
/// Identity is the `(uri, alias_prefix)` pair: the `show` and `hide`
/// combinator lists do not take part in equality, hashing or ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSpec {
    pub uri: String,
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<String>,
}

impl ImportSpec {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            alias_prefix: None,
            show: None,
            hide: None,
        }
    }

    /// Set the `as` prefix. An empty prefix is the same as no prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.alias_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    pub fn with_show(mut self, show: impl Into<String>) -> Self {
        self.show = Some(show.into());
        self
    }

    pub fn with_hide(mut self, hide: impl Into<String>) -> Self {
        self.hide = Some(hide.into());
        self
    }

    /// The `dart:ffi` library, required by every native type
    pub fn dart_ffi() -> Self {
        Self::new("dart:ffi")
    }

    fn prefix_key(&self) -> &str {
        self.alias_prefix.as_deref().unwrap_or("")
    }
}

impl PartialEq for ImportSpec {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.prefix_key() == other.prefix_key()
    }
}

impl Eq for ImportSpec {}

impl Hash for ImportSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        self.prefix_key().hash(state);
    }
}

impl PartialOrd for ImportSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ImportSpec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uri
            .cmp(&other.uri)
            .then_with(|| self.prefix_key().cmp(other.prefix_key()))
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import '{}'", self.uri)?;
        if !self.prefix_key().is_empty() {
            write!(f, " as {}", self.prefix_key())?;
        }
        if let Some(show) = &self.show {
            write!(f, " show {}", show)?;
        }
        if let Some(hide) = &self.hide {
            write!(f, " hide {}", hide)?;
        }
        write!(f, ";")
    }
}

/// Collects the imports that resolved types pull in.
///
/// Registration is idempotent: adding an equal [`ImportSpec`] twice has no
/// further effect.
pub trait ImportSink {
    fn register_import(&mut self, spec: ImportSpec);
}

impl ImportSink for BTreeSet<ImportSpec> {
    fn register_import(&mut self, spec: ImportSpec) {
        self.insert(spec);
    }
}

/// One row of the well-known type table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    /// Type used in ordinary Dart code (`int`, `double`, `void`)
    pub host: &'static str,
    /// Type used at the native call boundary (`Int32`, `Double`, `Void`)
    pub native: &'static str,
    pub required_import: Option<ImportSpec>,
}

impl TypeEntry {
    pub fn new(host: &'static str, native: &'static str) -> Self {
        Self {
            host,
            native,
            required_import: None,
        }
    }

    pub fn requires(mut self, import: ImportSpec) -> Self {
        self.required_import = Some(import);
        self
    }
}

/// Parsed abstract type name: `pointer-marker* base-name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A primitive, alias or pass-through declaration name
    Named(String),
    /// Pointer to the inner expression
    Pointer(Box<TypeExpr>),
}

impl TypeExpr {
    /// Parse a type name; surrounding whitespace is trimmed at every level.
    /// An absent (empty) name or an absent base name after the pointer
    /// markers is an [`CoreError::InvalidArgument`].
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_argument("type name is absent"));
        }

        match trimmed.strip_prefix(POINTER_MARKER) {
            Some(rest) => {
                if rest.trim().is_empty() {
                    return Err(CoreError::invalid_argument(format!(
                        "pointer type '{}' has no target type",
                        trimmed
                    )));
                }
                Ok(TypeExpr::Pointer(Box::new(Self::parse(rest)?)))
            }
            None => Ok(TypeExpr::Named(trimmed.to_string())),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeExpr::Pointer(_))
    }

    /// The bare `void` base (case-insensitive)
    pub fn is_void(&self) -> bool {
        matches!(self, TypeExpr::Named(name) if name.eq_ignore_ascii_case("void"))
    }

    /// Number of pointer markers in front of the base name
    pub fn depth(&self) -> usize {
        match self {
            TypeExpr::Named(_) => 0,
            TypeExpr::Pointer(inner) => 1 + inner.depth(),
        }
    }

    /// The base name under all pointer markers
    pub fn base_name(&self) -> &str {
        match self {
            TypeExpr::Named(name) => name,
            TypeExpr::Pointer(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name) => write!(f, "{}", name),
            TypeExpr::Pointer(inner) => write!(f, "{}{}", POINTER_MARKER, inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named() {
        assert_eq!(
            TypeExpr::parse("int32").unwrap(),
            TypeExpr::Named("int32".to_string())
        );
    }

    #[test]
    fn test_parse_nested_pointer() {
        let expr = TypeExpr::parse("**uint8").unwrap();
        assert!(expr.is_pointer());
        assert!(!TypeExpr::parse("uint8").unwrap().is_pointer());
        assert_eq!(expr.depth(), 2);
        assert_eq!(expr.base_name(), "uint8");
        assert_eq!(expr.to_string(), "**uint8");
    }

    #[test]
    fn test_parse_absent_names() {
        assert!(matches!(
            TypeExpr::parse(""),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            TypeExpr::parse("   "),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            TypeExpr::parse("**"),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_is_void() {
        assert!(TypeExpr::parse("VOID").unwrap().is_void());
        assert!(!TypeExpr::parse("*void").unwrap().is_void());
    }

    #[test]
    fn test_import_identity_ignores_combinators() {
        let a = ImportSpec::new("package:ffi/ffi.dart").with_show("Utf8");
        let b = ImportSpec::new("package:ffi/ffi.dart").with_hide("calloc");
        assert_eq!(a, b);

        let mut set: BTreeSet<ImportSpec> = BTreeSet::new();
        set.register_import(a);
        set.register_import(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_import_ordering() {
        let plain = ImportSpec::new("dart:ffi");
        let prefixed = ImportSpec::new("dart:ffi").with_prefix("ffi");
        let empty_prefix = ImportSpec::new("dart:ffi").with_prefix("");
        let other = ImportSpec::new("dart:async");

        assert!(other < plain);
        assert!(plain < prefixed);
        assert_eq!(plain, empty_prefix);
    }

    #[test]
    fn test_import_display() {
        let spec = ImportSpec::new("package:ffi/ffi.dart")
            .with_prefix("pkg_ffi")
            .with_show("Utf8")
            .with_hide("calloc");
        assert_eq!(
            spec.to_string(),
            "import 'package:ffi/ffi.dart' as pkg_ffi show Utf8 hide calloc;"
        );
        assert_eq!(ImportSpec::dart_ffi().to_string(), "import 'dart:ffi';");
    }
}
