//! Intermediate representation of a binding description

use crate::types::ImportSpec;
use serde::{Deserialize, Serialize};

/// One description file: everything generated into a single Dart source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    /// Path handed to `DynamicLibrary.open`; when absent the dynamic library
    /// handle is expected to be declared elsewhere in the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_library: Option<String>,
    /// Makes the output a `part of` the named library instead of a library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<String>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Struct(StructDecl),
    Opaque(OpaqueDecl),
    Function(FunctionDecl),
}

impl Element {
    pub fn name(&self) -> &str {
        match self {
            Element::Struct(s) => &s.name,
            Element::Opaque(o) => &o.name,
            Element::Function(f) => &f.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Element::Struct(_) => "struct",
            Element::Opaque(_) => "opaque",
            Element::Function(_) => "function",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    /// Abstract type name; a missing type deserializes as empty and fails
    /// resolution.
    #[serde(default, rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpaqueDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Symbol name in the native library
    pub name: String,
    /// Name of the generated Dart wrapper, defaults to the symbol name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dart_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default = "default_return_type", rename = "returns")]
    pub return_type: String,
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
}

fn default_return_type() -> String {
    "void".to_string()
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dart_name: None,
            documentation: None,
            return_type: default_return_type(),
            parameters: Vec::new(),
        }
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.parameters.push(ParamDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn wrapper_name(&self) -> &str {
        self.dart_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: String,
}

impl StructDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn find_element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.elements.iter().filter_map(|e| match e {
            Element::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.elements.iter().filter_map(|e| match e {
            Element::Function(f) => Some(f),
            _ => None,
        })
    }
}
