//! Property tests for the type resolution table and pointer algebra

use ffiweave_core::{ImportSpec, TypeResolver};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn known_keys() -> Vec<&'static str> {
    TypeResolver::new()
        .known_types()
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}

/// Randomly upper-cases characters of `key` according to `mask`
fn mix_case(key: &str, mask: &[bool]) -> String {
    key.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

#[test]
fn test_every_key_resolves_case_insensitively() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = TypeResolver::new();
    let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();

    for key in known_keys() {
        let upper = key.to_uppercase();
        assert_eq!(
            resolver.resolve_host_type(key, &mut imports)?,
            resolver.resolve_host_type(&upper, &mut imports)?,
            "host mismatch for {}",
            key
        );
        assert_eq!(
            resolver.resolve_native_type(key, &mut imports)?,
            resolver.resolve_native_type(&upper, &mut imports)?,
            "native mismatch for {}",
            key
        );
    }
    Ok(())
}

#[test]
fn test_every_key_registers_dart_ffi_once() -> Result<(), Box<dyn std::error::Error>> {
    let resolver = TypeResolver::new();
    let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();

    for key in known_keys() {
        resolver.resolve_host_type(key, &mut imports)?;
        resolver.resolve_native_type(key, &mut imports)?;
    }
    assert_eq!(imports.len(), 1);
    assert!(imports.contains(&ImportSpec::dart_ffi()));
    Ok(())
}

proptest! {
    #[test]
    fn prop_mixed_case_lookup(index in 0usize..16, mask in prop::collection::vec(any::<bool>(), 1..8)) {
        let keys = known_keys();
        let key = keys[index % keys.len()];
        let resolver = TypeResolver::new();
        let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();

        let mixed = mix_case(key, &mask);
        prop_assert_eq!(
            resolver.resolve_host_type(key, &mut imports).unwrap(),
            resolver.resolve_host_type(&mixed, &mut imports).unwrap()
        );
        prop_assert_eq!(
            resolver.resolve_annotation_type(key, &mut imports),
            resolver.resolve_annotation_type(&mixed, &mut imports)
        );
    }

    #[test]
    fn prop_pointer_depth_wraps(depth in 1usize..6) {
        let resolver = TypeResolver::new();
        let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();

        let name = format!("{}int32", "*".repeat(depth));
        let expected = format!("{}Int32{}", "Pointer<".repeat(depth), ">".repeat(depth));
        prop_assert_eq!(resolver.resolve_host_type(&name, &mut imports).unwrap(), expected.clone());
        prop_assert_eq!(resolver.resolve_native_type(&name, &mut imports).unwrap(), expected);
        prop_assert_eq!(resolver.resolve_annotation_type(&name, &mut imports), Some("Pointer".to_string()));
    }

    #[test]
    fn prop_unknown_names_pass_through(name in "[A-Z][A-Za-z0-9]{2,12}Handle") {
        let resolver = TypeResolver::new();
        let mut imports: BTreeSet<ImportSpec> = BTreeSet::new();

        prop_assert_eq!(resolver.resolve_host_type(&name, &mut imports).unwrap(), name.clone());
        prop_assert_eq!(resolver.resolve_native_type(&name, &mut imports).unwrap(), name.clone());
        prop_assert_eq!(resolver.resolve_annotation_type(&name, &mut imports), None);
        prop_assert!(imports.is_empty());
    }
}
