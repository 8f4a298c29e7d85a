//! Naming utilities for identifiers emitted into Dart source.
//!
//! Native symbol names are kept as written in the description. These helpers
//! only make them legal Dart identifiers and derive the library-private names
//! used for lookups and typedefs.

/// Dart reserved words and built-in identifiers that cannot name a
/// declaration, parameter or field.
pub const DART_RESERVED_WORDS: &[&str] = &[
    "abstract", "as", "assert", "async", "await", "break", "case", "catch", "class", "const",
    "continue", "covariant", "default", "deferred", "do", "dynamic", "else", "enum", "export",
    "extends", "extension", "external", "factory", "false", "final", "finally", "for",
    "Function", "get", "hide", "if", "implements", "import", "in", "interface", "is", "late",
    "library", "mixin", "new", "null", "on", "operator", "part", "required", "rethrow",
    "return", "set", "show", "static", "super", "switch", "sync", "this", "throw", "true",
    "try", "typedef", "var", "void", "while", "with", "yield",
];

/// Whether `name` is a Dart reserved word
///
/// # Examples
/// ```
/// use ffiweave_core::naming::is_reserved;
/// assert!(is_reserved("class"));
/// assert!(!is_reserved("point"));
/// ```
pub fn is_reserved(name: &str) -> bool {
    DART_RESERVED_WORDS.contains(&name)
}

/// Make `name` usable as a Dart identifier by appending `_` to reserved words
///
/// # Examples
/// ```
/// use ffiweave_core::naming::escape_identifier;
/// assert_eq!(escape_identifier("in"), "in_");
/// assert_eq!(escape_identifier("count"), "count");
/// ```
pub fn escape_identifier(name: &str) -> String {
    if is_reserved(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Library-private name for a generated helper (`strlen` -> `_strlen`)
///
/// # Examples
/// ```
/// use ffiweave_core::naming::private_name;
/// assert_eq!(private_name("strlen"), "_strlen");
/// assert_eq!(private_name("_already"), "_already");
/// ```
pub fn private_name(name: &str) -> String {
    if name.starts_with('_') {
        name.to_string()
    } else {
        format!("_{}", name)
    }
}

/// [`private_name`], with extra leading `_` until `is_taken` rejects the
/// candidate
///
/// # Examples
/// ```
/// use ffiweave_core::naming::private_name_avoiding;
/// assert_eq!(private_name_avoiding("init", |n| n == "_init"), "__init");
/// assert_eq!(private_name_avoiding("init", |_| false), "_init");
/// ```
pub fn private_name_avoiding(name: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = private_name(name);
    while is_taken(&candidate) {
        candidate.insert(0, '_');
    }
    candidate
}
