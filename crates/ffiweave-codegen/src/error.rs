//! Error types for code generation
//!
//! Resolution failures carry an [`ErrorLocation`] naming the library, element
//! and field or parameter being generated when the failure happened. There is
//! no local recovery: the first error aborts the generation pass.

use std::fmt;

use ffiweave_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Code generation error: {0}")]
    Generation(String),

    #[error("Type resolution failed at {location}: {source}")]
    Resolution {
        location: ErrorLocation,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl CodegenError {
    /// Attach a location to a core error
    pub fn at(location: ErrorLocation, source: CoreError) -> Self {
        Self::Resolution { location, source }
    }

    /// The underlying core error, if any
    pub fn core_error(&self) -> Option<&CoreError> {
        match self {
            CodegenError::Resolution { source, .. } => Some(source),
            CodegenError::Core(source) => Some(source),
            _ => None,
        }
    }
}

/// Location context for where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Library name (e.g., "sqlite")
    pub library: Option<String>,
    /// Element name (e.g., "Point" or "sqlite3_open")
    pub element: Option<String>,
    /// Field or parameter name (e.g., "x")
    pub member: Option<String>,
}

impl ErrorLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn in_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn in_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.library, &self.element, &self.member) {
            (Some(l), Some(e), Some(m)) => write!(f, "{}.{}::{}", l, e, m),
            (Some(l), Some(e), None) => write!(f, "{}.{}", l, e),
            (Some(l), None, Some(m)) => write!(f, "{}::{}", l, m),
            (Some(l), None, None) => write!(f, "{}", l),
            (None, Some(e), Some(m)) => write!(f, "{}::{}", e, m),
            (None, Some(e), None) => write!(f, "{}", e),
            (None, None, Some(m)) => write!(f, "::{}", m),
            (None, None, None) => write!(f, "<unknown location>"),
        }
    }
}
