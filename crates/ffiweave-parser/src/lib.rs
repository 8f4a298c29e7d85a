//! Binding description parsers
//!
//! A description is a YAML or JSON document deserializing into
//! [`ffiweave_core::Library`]:
//!
//! ```yaml
//! name: geometry
//! dynamic_library: libgeometry.so
//! elements:
//!   - kind: struct
//!     name: Point
//!     fields:
//!       - { name: x, type: int32 }
//!   - kind: function
//!     name: point_len
//!     returns: double
//!     parameters:
//!       - { name: p, type: "*Point" }
//! ```

pub mod error;
pub mod validation;

use std::path::Path;

use ffiweave_core::Library;
use tracing::{debug, instrument};

pub use error::ParserError;
pub use validation::validate;

/// Common trait for all parsers
pub trait Parser {
    type Input;

    fn parse(&self, input: Self::Input) -> Result<Library, ParserError>;
}

/// Supported description file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionFormat {
    Yaml,
    Json,
}

impl DescriptionFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ParserError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(DescriptionFormat::Yaml),
            Some("json") => Ok(DescriptionFormat::Json),
            _ => Err(ParserError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parser for description documents held in memory
#[derive(Debug, Clone)]
pub struct DescriptionParser {
    format: DescriptionFormat,
    validate: bool,
}

impl DescriptionParser {
    pub fn new(format: DescriptionFormat) -> Self {
        Self {
            format,
            validate: true,
        }
    }

    /// Skip structural validation after deserializing
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }
}

impl Parser for DescriptionParser {
    type Input = String;

    fn parse(&self, input: String) -> Result<Library, ParserError> {
        parse_str_with(&input, self.format, self.validate)
    }
}

fn parse_str_with(
    content: &str,
    format: DescriptionFormat,
    run_validation: bool,
) -> Result<Library, ParserError> {
    let library: Library = match format {
        DescriptionFormat::Yaml => serde_yaml::from_str(content)?,
        DescriptionFormat::Json => serde_json::from_str(content)?,
    };
    debug!(
        "Parsed description '{}' with {} elements",
        library.name,
        library.elements.len()
    );

    if run_validation {
        validate(&library)?;
    }
    Ok(library)
}

/// Parse and validate a description held in memory
pub fn parse_str(content: &str, format: DescriptionFormat) -> Result<Library, ParserError> {
    parse_str_with(content, format, true)
}

/// Read, parse and validate a description file; the format follows the
/// file extension (`.yaml`, `.yml` or `.json`)
#[instrument(level = "debug")]
pub fn parse_file(path: &Path) -> Result<Library, ParserError> {
    let format = DescriptionFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}
