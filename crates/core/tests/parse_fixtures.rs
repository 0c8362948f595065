//! End-to-end parses of the files under tests/fixtures.

use idlc_core::{parse_file, ConstValue, ParseError, Requiredness, Type};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

// ──────────────────────────────────────────────
// Full service file
// ──────────────────────────────────────────────

#[test]
fn service_file_header_namespaces_and_includes() {
    let parsed = parse_file(&fixture("service.thrift")).unwrap();
    let doc = &parsed.document;
    assert_eq!(doc.doc, "IDL doc1\nIDL doc2\nIDL doc3");
    assert_eq!(doc.namespaces.len(), 3);
    assert_eq!(doc.namespaces["python.py-twisted"], "another");
    assert_eq!(doc.includes["shared"], "shared.thrift");

    let shared = parsed.includes()["shared"];
    assert_eq!(shared.doc, "Definitions shared by several services.");
    assert!(shared.exceptions.contains_key("AuthenticationException"));
    assert_eq!(
        shared.services["SharedService"].methods["getStruct"].doc,
        "Look up a value by key."
    );
}

#[test]
fn service_file_constants() {
    let parsed = parse_file(&fixture("service.thrift")).unwrap();
    let doc = &parsed.document;

    let m1 = &doc.constants["M1"];
    assert_eq!(m1.type_.to_string(), "map<string,string>");
    assert!(matches!(m1.value, ConstValue::Map(ref entries) if entries.len() == 2));

    assert_eq!(
        doc.constants["S1"].value,
        ConstValue::String("foo\"\tbar".into())
    );
    assert_eq!(
        doc.constants["S2"].value,
        ConstValue::String("foo'\tbar".into())
    );
    assert_eq!(doc.constants["L"].doc, "L comment");
}

#[test]
fn service_file_union_and_struct() {
    let parsed = parse_file(&fixture("service.thrift")).unwrap();
    let doc = &parsed.document;

    let u = &doc.unions["myUnion"];
    assert_eq!(u.doc, "myUnion comment");
    let summary: Vec<_> = u
        .fields
        .iter()
        .map(|f| (f.id, f.name.as_str(), f.doc.as_str(), f.default.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                1,
                "dbl",
                "dbl comment1\ndbl comment2",
                Some(ConstValue::Double(1.1))
            ),
            (
                2,
                "str",
                "str comment",
                Some(ConstValue::String("2".into()))
            ),
            (3, "int32", "", Some(ConstValue::Int(3))),
            (4, "int64", "", Some(ConstValue::Int(5))),
        ]
    );
    assert!(u.fields.iter().all(|f| f.requiredness == Requiredness::Optional));

    let s = &doc.structs["SomeStruct"];
    assert_eq!(s.doc, "SomeStruct comment");
    assert_eq!(s.fields[0].doc, "dbl comment1\ndbl comment2");
    assert_eq!(s.fields[0].requiredness, Requiredness::Unset);
    assert_eq!(s.fields[1].doc, "abc comment1\nabc comment2");
    assert_eq!(s.fields[1].requiredness, Requiredness::Optional);
    assert_eq!(
        doc.structs["NewLineBeforeBrace"].fields.len(),
        s.fields.len()
    );
}

#[test]
fn service_file_enums() {
    let parsed = parse_file(&fixture("service.thrift")).unwrap();
    let doc = &parsed.document;
    let op = &doc.enums["Operation"];
    assert_eq!(op.doc, "Operation comment");
    let values: Vec<_> = op.values().iter().map(|v| (v.name.as_str(), v.value)).collect();
    assert_eq!(values, vec![("ADD", 1), ("SUBTRACT", 2)]);
    assert_eq!(doc.enums["NoNewLineBeforeBrace"].doc, "");
}

#[test]
fn service_file_methods() {
    let parsed = parse_file(&fixture("service.thrift")).unwrap();
    let svc = &parsed.document.services["ServiceNAME"];
    assert_eq!(svc.extends, Some(Type::named("shared.SharedService")));
    assert_eq!(svc.methods.len(), 3);

    let login = &svc.methods["login"];
    assert_eq!(
        login.doc,
        "authenticate method\ncomment2\nsome other\ncomments\nlogin handler"
    );
    assert_eq!(login.return_type, Some(Type::named("string")));
    assert_eq!(login.arguments[0].name, "password");
    assert_eq!(login.exceptions[0].name, "authex");
    assert_eq!(
        login.exceptions[0].type_,
        Type::named("shared.AuthenticationException")
    );
    assert!(login.exceptions[0].is_optional());

    let explode = &svc.methods["explode"];
    assert!(explode.oneway);
    assert_eq!(explode.return_type, None);
    assert_eq!(explode.doc, "explode handler");
    assert!(explode.arguments.is_empty());

    let something = &svc.methods["something"];
    assert_eq!(something.return_type, Some(Type::named("blah")));
    assert_eq!(something.doc, "");
}

#[test]
fn json_output_is_stable() {
    let a = parse_file(&fixture("service.thrift")).unwrap();
    let b = parse_file(&fixture("service.thrift")).unwrap();
    let ja = serde_json::to_string_pretty(&a.document).unwrap();
    let jb = serde_json::to_string_pretty(&b.document).unwrap();
    assert_eq!(ja, jb);
    let value: serde_json::Value = serde_json::from_str(&ja).unwrap();
    assert_eq!(value["unions"]["myUnion"]["fields"][0]["type"]["name"], "double");
    assert_eq!(value["enums"]["Operation"]["values"][1]["value"], 2);
}

// ──────────────────────────────────────────────
// Include errors
// ──────────────────────────────────────────────

#[test]
fn include_cycle_on_disk() {
    let err = parse_file(&fixture("cycle/a.thrift")).unwrap_err();
    match err {
        ParseError::Include { chain, message, .. } => {
            assert_eq!(chain, vec!["a.thrift", "b.thrift"]);
            assert_eq!(
                message,
                "include cycle detected: a.thrift \u{2192} b.thrift \u{2192} a.thrift"
            );
        }
        other => panic!("expected Include, got {:?}", other),
    }
}

#[test]
fn missing_root_file() {
    let err = parse_file(&fixture("does_not_exist.thrift")).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
}
