//! Core type resolution and binding IR for ffiweave

pub mod error;
pub mod ir;
pub mod naming;
pub mod resolver;
pub mod types;

pub use error::CoreError;
pub use ir::Library;
pub use resolver::TypeResolver;
pub use types::{ImportSink, ImportSpec, TypeEntry, TypeExpr};
