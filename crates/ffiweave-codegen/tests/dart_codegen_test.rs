//! End-to-end tests for Dart binding generation

use ffiweave_codegen::{Codegen, CodegenError, DartCodegen, DartCodegenConfig};
use ffiweave_core::ir::{Element, FieldDecl, FunctionDecl, OpaqueDecl, StructDecl};
use ffiweave_core::{CoreError, ImportSpec, Library};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn geometry_library() -> Library {
    let mut library = Library::new("geometry");
    library.dynamic_library = Some("libgeometry.so".to_string());
    library
        .imports
        .push(ImportSpec::new("package:ffi/ffi.dart").with_show("Utf8"));

    let mut point = StructDecl::new("Point").field("x", "int32").field("y", "INT32");
    point.documentation = Some("A point in the plane.".to_string());
    library.add_element(Element::Struct(point));

    library.add_element(Element::Opaque(OpaqueDecl {
        name: "Canvas".to_string(),
        documentation: None,
    }));

    let mut draw = FunctionDecl::new("canvas_draw")
        .returns("int32")
        .param("canvas", "*Canvas")
        .param("points", "*Point")
        .param("count", "size_t");
    draw.documentation = Some("Draws points.".to_string());
    library.add_element(Element::Function(draw));

    library.add_element(Element::Function(
        FunctionDecl::new("canvas_free").param("canvas", "*Canvas"),
    ));
    library
}

const GEOMETRY_DART: &str = "\
// AUTO GENERATED FILE, DO NOT EDIT.
//
// Generated by ffiweave.

library geometry;

import 'dart:ffi';
import 'package:ffi/ffi.dart' show Utf8;

final DynamicLibrary _dylib = DynamicLibrary.open('libgeometry.so');

/// A point in the plane.
class Point extends Struct {
  @Int32()
  int x;

  @Int32()
  int y;
}

class Canvas extends Opaque {}

/// Draws points.
int canvas_draw(Pointer<Canvas> canvas, Pointer<Point> points, int count) {
  return _canvas_draw(canvas, points, count);
}

final _canvas_draw_Dart _canvas_draw = _dylib.lookupFunction<_canvas_draw_C, _canvas_draw_Dart>('canvas_draw');
typedef _canvas_draw_C = Int32 Function(Pointer<Canvas> canvas, Pointer<Point> points, IntPtr count);
typedef _canvas_draw_Dart = int Function(Pointer<Canvas> canvas, Pointer<Point> points, int count);

void canvas_free(Pointer<Canvas> canvas) {
  _canvas_free(canvas);
}

final _canvas_free_Dart _canvas_free = _dylib.lookupFunction<_canvas_free_C, _canvas_free_Dart>('canvas_free');
typedef _canvas_free_C = Void Function(Pointer<Canvas> canvas);
typedef _canvas_free_Dart = void Function(Pointer<Canvas> canvas);
";

#[test]
fn test_generate_geometry_library() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let mut codegen = DartCodegen::new();
    let generated = codegen.generate(&geometry_library())?;

    assert_eq!(generated, GEOMETRY_DART);
    assert_snapshot!("geometry_library", generated);
    Ok(())
}

#[test]
fn test_generation_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let library = geometry_library();
    let first = DartCodegen::new().generate(&library)?;
    let second = DartCodegen::new().generate(&library)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_part_file_has_no_library_directive() -> Result<(), Box<dyn std::error::Error>> {
    let mut library = Library::new("geometry_structs");
    library.parent_module = Some("geometry".to_string());
    library.preamble = Some("// part".to_string());
    library.add_element(Element::Struct(StructDecl::new("Size").field("w", "float")));

    let generated = DartCodegen::new().generate(&library)?;
    assert_eq!(
        generated,
        "// part\n\npart of geometry;\n\nimport 'dart:ffi';\n\nclass Size extends Struct {\n  @Float()\n  double w;\n}\n"
    );
    Ok(())
}

#[test]
fn test_custom_dylib_identifier_and_indent() -> Result<(), Box<dyn std::error::Error>> {
    let config = DartCodegenConfig {
        dylib_identifier: "native".to_string(),
        indent: "    ".to_string(),
        ..Default::default()
    };
    let mut library = Library::new("clock");
    library.add_element(Element::Function(FunctionDecl::new("now").returns("uint64")));

    let mut generator = DartCodegen::new().with_config(config);
    assert_eq!(generator.config().dylib_identifier, "native");
    let generated = generator.generate(&library)?;
    assert!(generated.contains("int now() {\n    return _now();\n}\n"));
    assert!(generated.contains("= native.lookupFunction<_now_C, _now_Dart>('now');"));
    assert!(!generated.contains("DynamicLibrary.open"));
    Ok(())
}

#[test]
fn test_underscored_symbol_binding_differs_from_wrapper() -> Result<(), Box<dyn std::error::Error>> {
    let mut library = Library::new("native_init");
    library.add_element(Element::Function(FunctionDecl::new("_init").returns("int32")));

    let generated = DartCodegen::new().generate(&library)?;
    assert!(generated.ends_with(
        "int _init() {\n  return __init();\n}\n\n\
         final __init_Dart __init = _dylib.lookupFunction<__init_C, __init_Dart>('_init');\n\
         typedef __init_C = Int32 Function();\n\
         typedef __init_Dart = int Function();\n"
    ));
    Ok(())
}

#[test]
fn test_parameter_cannot_shadow_binding() -> Result<(), Box<dyn std::error::Error>> {
    let mut library = Library::new("shadow");
    library.add_element(Element::Function(
        FunctionDecl::new("f").returns("int32").param("_f", "int32"),
    ));

    let generated = DartCodegen::new().generate(&library)?;
    assert!(generated.contains("int f(int _f) {\n  return __f(_f);\n}\n"));
    assert!(generated.contains("final __f_Dart __f = _dylib.lookupFunction<__f_C, __f_Dart>('f');"));
    assert!(generated.contains("typedef __f_C = Int32 Function(Int32 _f);"));
    Ok(())
}

#[test]
fn test_bindings_do_not_collide_across_functions() -> Result<(), Box<dyn std::error::Error>> {
    let mut library = Library::new("twins");
    library.add_element(Element::Function(FunctionDecl::new("init")));
    library.add_element(Element::Function(FunctionDecl::new("_init")));

    let generated = DartCodegen::new().generate(&library)?;
    assert!(generated.contains("void init() {\n  __init();\n}\n"));
    assert!(generated.contains("void _init() {\n  ___init();\n}\n"));
    assert!(generated.contains("final __init_Dart __init = _dylib.lookupFunction<__init_C, __init_Dart>('init');"));
    assert!(generated.contains("final ___init_Dart ___init = _dylib.lookupFunction<___init_C, ___init_Dart>('_init');"));
    Ok(())
}

#[test]
fn test_missing_parameter_type_aborts_generation() {
    let mut library = Library::new("broken");
    let mut func = FunctionDecl::new("do_it");
    func.parameters.push(ffiweave_core::ir::ParamDecl {
        name: "arg".to_string(),
        ty: String::new(),
    });
    library.add_element(Element::Function(func));

    let error = DartCodegen::new().generate(&library).unwrap_err();
    assert!(matches!(
        error.core_error(),
        Some(CoreError::InvalidArgument(_))
    ));
    assert!(error.to_string().contains("broken.do_it::arg"));
}

#[test]
fn test_missing_return_type_aborts_generation() {
    let mut library = Library::new("broken");
    library.add_element(Element::Function(FunctionDecl::new("f").returns("")));

    let error = DartCodegen::new().generate(&library).unwrap_err();
    assert!(matches!(error, CodegenError::Resolution { .. }));
    assert!(error.to_string().contains("broken.f::return"));
}

#[test]
fn test_empty_element_name_is_rejected() {
    let mut library = Library::new("broken");
    library.add_element(Element::Struct(StructDecl {
        name: " ".to_string(),
        documentation: None,
        fields: vec![FieldDecl {
            name: "x".to_string(),
            ty: "int8".to_string(),
        }],
    }));

    let error = DartCodegen::new().generate(&library).unwrap_err();
    assert!(matches!(error, CodegenError::Generation(_)));
}
