//! Structural validation of parsed descriptions
//!
//! Problems are collected for the whole library and reported together.
//! Type names are not checked here: unknown names are references to
//! declarations generated elsewhere and resolve as written.

use std::collections::HashSet;
use std::fmt;

use ffiweave_core::ir::Element;
use ffiweave_core::Library;

use crate::ParserError;

/// A single structural problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Where the problem is (e.g. "Point.x")
    pub path: String,
    pub message: String,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Default)]
struct Problems(Vec<Problem>);

impl Problems {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.push(Problem {
            path: path.into(),
            message: message.into(),
        });
    }

    fn check_name(&mut self, path: &str, what: &str, name: &str) {
        if name.trim().is_empty() {
            self.push(path, format!("{} name is empty", what));
        }
    }

    fn check_unique<'a>(&mut self, path: &str, what: &str, names: impl Iterator<Item = &'a str>) {
        let mut seen = HashSet::new();
        for name in names {
            if !name.is_empty() && !seen.insert(name) {
                self.push(path, format!("duplicate {} '{}'", what, name));
            }
        }
    }
}

/// Collect every structural problem in `library`
pub fn find_problems(library: &Library) -> Vec<Problem> {
    let mut problems = Problems::default();
    problems.check_name("<library>", "library", &library.name);

    for element in &library.elements {
        let path = if element.name().is_empty() {
            format!("<{}>", element.kind())
        } else {
            element.name().to_string()
        };
        problems.check_name(&path, element.kind(), element.name());

        match element {
            Element::Struct(decl) => {
                for field in &decl.fields {
                    problems.check_name(&path, "field", &field.name);
                }
                problems.check_unique(&path, "field", decl.fields.iter().map(|f| f.name.as_str()));
            }
            Element::Function(decl) => {
                for param in &decl.parameters {
                    problems.check_name(&path, "parameter", &param.name);
                }
                problems.check_unique(
                    &path,
                    "parameter",
                    decl.parameters.iter().map(|p| p.name.as_str()),
                );
            }
            Element::Opaque(_) => {}
        }
    }

    problems.check_unique(
        "<library>",
        "element",
        library.elements.iter().map(Element::name),
    );

    problems.0
}

/// Validate `library`, failing with every problem found
pub fn validate(library: &Library) -> Result<(), ParserError> {
    let problems = find_problems(library);
    if problems.is_empty() {
        return Ok(());
    }

    for problem in &problems {
        tracing::debug!("Description problem: {}", problem);
    }

    let summary = problems
        .iter()
        .map(|p| format!("  - {}", p))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ParserError::Validation {
        count: problems.len(),
        summary,
    })
}
