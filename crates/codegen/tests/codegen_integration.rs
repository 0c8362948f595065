//! Integration tests for the Rust generation pipeline: parse fixture files
//! from the core crate, generate into a temp dir, inspect the output.

use idlc_codegen::{generate, GenerateConfig, RustGenerator};
use idlc_core::{parse_file, parse_file_with_provider, InMemoryProvider};
use std::fs;
use std::path::{Path, PathBuf};

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> &'static Path {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/codegen -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
}

fn fixture(name: &str) -> PathBuf {
    workspace_root().join("crates/core/tests/fixtures").join(name)
}

#[test]
fn test_generate_one_file_per_source() {
    let parsed = parse_file(&fixture("service.thrift")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");

    let files = generate(
        &RustGenerator,
        &parsed,
        &GenerateConfig::default(),
        dir.path(),
    )
    .expect("generation failed");

    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["service.rs", "shared.rs"]);
    assert!(files.iter().all(|f| f.changed));

    let service = fs::read_to_string(dir.path().join("service.rs")).unwrap();
    assert!(
        service.starts_with("// Code generated by idlc from service.thrift. DO NOT EDIT.\n//! IDL doc1\n"),
        "service.rs should open with the header and document doc"
    );
    assert!(
        service.contains("pub trait ServiceName: super::shared::SharedService {"),
        "service.rs should contain the service trait"
    );
    assert!(
        service.contains(
            "fn login(&self, password: String) -> Result<String, ServiceNameLoginError>;"
        ),
        "login should return a Result over its exceptions"
    );
    assert!(
        service.contains("    fn explode(&self);\n"),
        "oneway methods return nothing"
    );
    assert!(
        service.contains("pub enum MyUnion {"),
        "unions should become enums"
    );
    assert!(
        service.contains("pub const L: &[i64] = &[1, 2, 3];"),
        "list constants should be slices"
    );
    assert!(
        service.contains("pub const S1: &str = \"foo\\\"\\tbar\";"),
        "string escapes should survive"
    );

    let shared = fs::read_to_string(dir.path().join("shared.rs")).unwrap();
    assert!(shared.contains("pub struct AuthenticationException {"));
    assert!(shared.contains("impl std::error::Error for AuthenticationException {}"));
}

#[test]
fn test_generate_is_idempotent() {
    let parsed = parse_file(&fixture("service.thrift")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");
    let config = GenerateConfig::default();

    let first = generate(&RustGenerator, &parsed, &config, dir.path()).expect("first run");
    let before = fs::read_to_string(dir.path().join("service.rs")).unwrap();

    let reparsed = parse_file(&fixture("service.thrift")).expect("parse failed");
    let second = generate(&RustGenerator, &reparsed, &config, dir.path()).expect("second run");
    let after = fs::read_to_string(dir.path().join("service.rs")).unwrap();

    assert_eq!(before, after, "output should be byte-identical");
    assert_eq!(first.len(), second.len());
    assert!(
        second.iter().all(|f| !f.changed),
        "second run should rewrite nothing"
    );
}

#[test]
fn test_toggles_change_output() {
    let parsed = parse_file(&fixture("service.thrift")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");

    generate(
        &RustGenerator,
        &parsed,
        &GenerateConfig::default(),
        dir.path(),
    )
    .unwrap();
    let plain = fs::read_to_string(dir.path().join("service.rs")).unwrap();
    assert!(plain.contains("    pub abc: String,\n"));

    let config = GenerateConfig {
        use_nullable_wrapper_for_optional: true,
        treat_byte_type_as_signed: true,
    };
    let files = generate(&RustGenerator, &parsed, &config, dir.path()).unwrap();
    let wrapped = fs::read_to_string(dir.path().join("service.rs")).unwrap();
    assert!(wrapped.contains("    pub abc: Option<String>,\n"));
    assert!(files.iter().any(|f| f.changed));
}

#[test]
fn test_same_stem_in_two_directories_is_rejected() {
    let provider = InMemoryProvider::from_files([
        (
            "/idl/main.thrift",
            "include \"a/common.thrift\"\ninclude \"b/other.thrift\"",
        ),
        ("/idl/a/common.thrift", "struct A {}"),
        ("/idl/b/other.thrift", "include \"common.thrift\""),
        ("/idl/b/common.thrift", "struct B {}"),
    ]);
    let parsed = parse_file_with_provider(Path::new("/idl/main.thrift"), &provider).unwrap();
    let dir = tempfile::tempdir().expect("temp dir");
    let err = generate(
        &RustGenerator,
        &parsed,
        &GenerateConfig::default(),
        dir.path(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("would both be written to"));
}
