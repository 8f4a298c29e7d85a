//! Dart `dart:ffi` binding generator
//!
//! Drives [`TypeResolver`] and [`SourceAssembler`] over a [`Library`]:
//!
//! - structs become `class N extends Struct { ... }` with native annotations
//! - opaque types become empty `Opaque` subclasses
//! - functions become a Dart wrapper, a `lookupFunction` binding and the
//!   native (`_f_C`) and Dart (`_f_Dart`) typedefs

use crate::assembler::SourceAssembler;
use crate::error::ErrorLocation;
use crate::{Codegen, CodegenError};
use ffiweave_core::ir::{Element, FunctionDecl, OpaqueDecl, StructDecl};
use ffiweave_core::naming::{escape_identifier, private_name_avoiding};
use ffiweave_core::{ImportSpec, Library, TypeResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write;
use tracing::{debug, instrument, warn};

pub const DEFAULT_PREAMBLE: &str =
    "// AUTO GENERATED FILE, DO NOT EDIT.\n//\n// Generated by ffiweave.";

/// Configuration for Dart code generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DartCodegenConfig {
    /// Preamble used when the description does not carry one
    pub preamble: String,
    /// Emit `///` documentation comments from the description
    pub include_docs: bool,
    /// Name of the `DynamicLibrary` variable functions are looked up in
    pub dylib_identifier: String,
    /// Indentation inside class and function bodies
    pub indent: String,
}

impl Default for DartCodegenConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            include_docs: true,
            dylib_identifier: "_dylib".to_string(),
            indent: "  ".to_string(),
        }
    }
}

/// Dart code generator
pub struct DartCodegen {
    config: DartCodegenConfig,
    resolver: TypeResolver,
}

impl DartCodegen {
    pub fn new() -> Self {
        Self {
            config: DartCodegenConfig::default(),
            resolver: TypeResolver::new(),
        }
    }

    pub fn with_config(mut self, config: DartCodegenConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DartCodegenConfig {
        &self.config
    }

    /// Build the assembler for `library` without rendering it
    pub fn assemble(&self, library: &Library) -> Result<SourceAssembler, CodegenError> {
        let mut assembler = SourceAssembler::new();
        assembler.set_preamble(
            library
                .preamble
                .clone()
                .unwrap_or_else(|| self.config.preamble.clone()),
        );

        match &library.parent_module {
            Some(parent) => assembler.set_parent_module_identifier(parent.clone()),
            None if !library.name.is_empty() => {
                assembler.set_library_identifier(library.name.clone())
            }
            None => {}
        }

        for import in &library.imports {
            assembler.register_import(import.clone());
        }
        for part in &library.parts {
            assembler.register_file_part(part.clone());
        }

        let mut fragments = Vec::new();

        if let Some(path) = &library.dynamic_library {
            assembler.register_import(ImportSpec::dart_ffi());
            fragments.push(format!(
                "final DynamicLibrary {} = DynamicLibrary.open('{}');\n",
                self.config.dylib_identifier, path
            ));
        } else if library.parent_module.is_none() && library.functions().next().is_some() {
            warn!(
                "Library '{}' binds functions but declares no dynamic library; '{}' must be defined by a part",
                library.name, self.config.dylib_identifier
            );
        }

        // Every top-level Dart name the file declares, so lookup bindings
        // never collide with a wrapper, a class or another binding.
        let mut top_level: HashSet<String> = library
            .elements
            .iter()
            .map(|element| match element {
                Element::Function(decl) => escape_identifier(decl.wrapper_name()),
                other => escape_identifier(other.name()),
            })
            .collect();
        top_level.insert(self.config.dylib_identifier.clone());

        for element in &library.elements {
            let location = ErrorLocation::new()
                .in_library(library.name.clone())
                .in_element(element.name());
            if element.name().trim().is_empty() {
                return Err(CodegenError::Generation(format!(
                    "{} in library '{}' has an empty name",
                    element.kind(),
                    library.name
                )));
            }

            debug!("Generating {} '{}'", element.kind(), element.name());
            let fragment = match element {
                Element::Struct(decl) => self.generate_struct(decl, &location, &mut assembler)?,
                Element::Opaque(decl) => self.generate_opaque(decl, &mut assembler)?,
                Element::Function(decl) => {
                    self.generate_function(decl, &location, &mut top_level, &mut assembler)?
                }
            };
            fragments.push(fragment);
        }

        assembler.append_all(fragments, "\n");
        Ok(assembler)
    }

    fn write_docs(
        &self,
        documentation: Option<&str>,
        output: &mut String,
    ) -> Result<(), CodegenError> {
        if !self.config.include_docs {
            return Ok(());
        }
        if let Some(doc) = documentation {
            for line in doc.lines() {
                if line.is_empty() {
                    writeln!(output, "///")?;
                } else {
                    writeln!(output, "/// {}", line)?;
                }
            }
        }
        Ok(())
    }

    /// Generate a struct class
    fn generate_struct(
        &self,
        decl: &StructDecl,
        location: &ErrorLocation,
        assembler: &mut SourceAssembler,
    ) -> Result<String, CodegenError> {
        assembler.register_import(ImportSpec::dart_ffi());

        let mut output = String::new();
        self.write_docs(decl.documentation.as_deref(), &mut output)?;

        let class_name = escape_identifier(&decl.name);
        if decl.fields.is_empty() {
            writeln!(output, "class {} extends Struct {{}}", class_name)?;
            return Ok(output);
        }

        writeln!(output, "class {} extends Struct {{", class_name)?;
        let indent = &self.config.indent;
        for (index, field) in decl.fields.iter().enumerate() {
            let host = self
                .resolver
                .resolve_host_type(&field.ty, assembler)
                .map_err(|e| CodegenError::at(location.clone().in_member(field.name.clone()), e))?;

            if index > 0 {
                writeln!(output)?;
            }
            if let Some(annotation) = self.resolver.resolve_annotation_type(&field.ty, assembler) {
                writeln!(output, "{}@{}()", indent, annotation)?;
            }
            writeln!(output, "{}{} {};", indent, host, escape_identifier(&field.name))?;
        }
        writeln!(output, "}}")?;

        Ok(output)
    }

    /// Generate an opaque type; it can only be used behind a pointer
    fn generate_opaque(
        &self,
        decl: &OpaqueDecl,
        assembler: &mut SourceAssembler,
    ) -> Result<String, CodegenError> {
        assembler.register_import(ImportSpec::dart_ffi());

        let mut output = String::new();
        self.write_docs(decl.documentation.as_deref(), &mut output)?;
        writeln!(output, "class {} extends Opaque {{}}", escape_identifier(&decl.name))?;
        Ok(output)
    }

    /// Generate the wrapper, lookup and typedefs for a native function
    #[instrument(skip(self, decl, location, top_level, assembler), fields(function = %decl.name), level = "debug")]
    fn generate_function(
        &self,
        decl: &FunctionDecl,
        location: &ErrorLocation,
        top_level: &mut HashSet<String>,
        assembler: &mut SourceAssembler,
    ) -> Result<String, CodegenError> {
        assembler.register_import(ImportSpec::dart_ffi());

        let return_location = || location.clone().in_member("return");
        let host_return = self
            .resolver
            .resolve_host_type(&decl.return_type, assembler)
            .map_err(|e| CodegenError::at(return_location(), e))?;
        let native_return = self
            .resolver
            .resolve_native_type(&decl.return_type, assembler)
            .map_err(|e| CodegenError::at(return_location(), e))?;

        let mut host_params = Vec::with_capacity(decl.parameters.len());
        let mut native_params = Vec::with_capacity(decl.parameters.len());
        let mut arguments = Vec::with_capacity(decl.parameters.len());
        for param in &decl.parameters {
            let param_location = || location.clone().in_member(param.name.clone());
            let host = self
                .resolver
                .resolve_host_type(&param.ty, assembler)
                .map_err(|e| CodegenError::at(param_location(), e))?;
            let native = self
                .resolver
                .resolve_native_type(&param.ty, assembler)
                .map_err(|e| CodegenError::at(param_location(), e))?;

            let name = escape_identifier(&param.name);
            host_params.push(format!("{} {}", host, name));
            native_params.push(format!("{} {}", native, name));
            arguments.push(name);
        }

        let wrapper = escape_identifier(decl.wrapper_name());
        top_level.insert(wrapper.clone());
        // The binding must not be shadowed by a parameter inside the wrapper.
        let binding = private_name_avoiding(&decl.name, |candidate| {
            arguments.iter().any(|argument| argument == candidate)
                || top_level.contains(candidate)
                || top_level.contains(&format!("{}_C", candidate))
                || top_level.contains(&format!("{}_Dart", candidate))
        });
        let native_typedef = format!("{}_C", binding);
        let dart_typedef = format!("{}_Dart", binding);
        top_level.insert(binding.clone());
        top_level.insert(native_typedef.clone());
        top_level.insert(dart_typedef.clone());
        let indent = &self.config.indent;

        let mut output = String::new();
        self.write_docs(decl.documentation.as_deref(), &mut output)?;
        writeln!(output, "{} {}({}) {{", host_return, wrapper, host_params.join(", "))?;
        if host_return == "void" {
            writeln!(output, "{}{}({});", indent, binding, arguments.join(", "))?;
        } else {
            writeln!(output, "{}return {}({});", indent, binding, arguments.join(", "))?;
        }
        writeln!(output, "}}")?;
        writeln!(output)?;
        writeln!(
            output,
            "final {} {} = {}.lookupFunction<{}, {}>('{}');",
            dart_typedef, binding, self.config.dylib_identifier, native_typedef, dart_typedef, decl.name
        )?;
        writeln!(
            output,
            "typedef {} = {} Function({});",
            native_typedef,
            native_return,
            native_params.join(", ")
        )?;
        writeln!(
            output,
            "typedef {} = {} Function({});",
            dart_typedef,
            host_return,
            host_params.join(", ")
        )?;

        Ok(output)
    }
}

impl Default for DartCodegen {
    fn default() -> Self {
        Self::new()
    }
}

impl Codegen for DartCodegen {
    #[instrument(skip(self, library), fields(library = %library.name), level = "info")]
    fn generate(&mut self, library: &Library) -> Result<String, CodegenError> {
        let assembler = self.assemble(library)?;
        let stats = assembler.stats();
        debug!(
            "Assembled {} elements: {} imports, {} parts, {} bytes of body",
            library.elements.len(),
            stats.imports,
            stats.file_parts,
            stats.body_bytes
        );
        Ok(assembler.render())
    }
}
