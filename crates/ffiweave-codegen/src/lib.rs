//! Source assembly and Dart code generation for ffiweave

pub mod assembler;
pub mod dart;
pub mod error;

use ffiweave_core::Library;

pub use assembler::SourceAssembler;
pub use dart::{DartCodegen, DartCodegenConfig};
pub use error::CodegenError;

/// Common trait for all code generators
pub trait Codegen {
    fn generate(&mut self, library: &Library) -> Result<String, CodegenError>;
}
