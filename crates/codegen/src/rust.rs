//! Rust back end.
//!
//! Each source file becomes one Rust module. References qualified by an
//! include alias (`shared.Point`) render as `super::shared::Point`, so the
//! generated modules are expected to be siblings.

use crate::naming::{to_pascal_case, to_screaming_snake_case, to_snake_case};
use crate::{CodegenError, GenerateConfig, Generator, SourceUnit};
use idlc_core::{ConstValue, Constant, Enum, Field, Method, Service, Struct, StructKind, Type, Typedef};
use std::collections::{BTreeMap, HashMap};

/// Typedef chains longer than this are treated as cyclic.
const MAX_TYPEDEF_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct RustGenerator;

impl Generator for RustGenerator {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn render(
        &self,
        unit: &SourceUnit<'_>,
        config: &GenerateConfig,
    ) -> Result<String, CodegenError> {
        let mut emitter = Emitter {
            unit: *unit,
            config: *config,
            out: String::new(),
        };
        emitter.emit()?;
        Ok(emitter.out)
    }
}

fn value_of(t: &Type) -> Result<&Type, CodegenError> {
    t.value_type
        .as_deref()
        .ok_or_else(|| CodegenError::Emit(format!("'{}' is not a container type", t)))
}

fn key_of(t: &Type) -> Result<&Type, CodegenError> {
    t.key_type
        .as_deref()
        .ok_or_else(|| CodegenError::Emit(format!("'{}' is not a map type", t)))
}

fn float_literal(f: f64) -> String {
    format!("{:?}", f)
}

/// Fail if two source names map to the same Rust identifier.
fn check_unique<'n>(
    owner: &str,
    names: impl IntoIterator<Item = (&'n str, String)>,
) -> Result<(), CodegenError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (source, rust) in names {
        if let Some(first) = seen.insert(rust.clone(), source) {
            return Err(CodegenError::Emit(format!(
                "{}: '{}' and '{}' both become '{}'",
                owner, first, source, rust
            )));
        }
    }
    Ok(())
}

struct Emitter<'a> {
    unit: SourceUnit<'a>,
    config: GenerateConfig,
    out: String,
}

impl<'a> Emitter<'a> {
    fn emit(&mut self) -> Result<(), CodegenError> {
        let doc = self.unit.document;
        let file_name = self
            .unit
            .path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        self.out.push_str(&format!(
            "// Code generated by idlc from {}. DO NOT EDIT.\n",
            file_name
        ));
        self.doc_comment(&doc.doc, "//!", "");

        for t in doc.typedefs.values() {
            self.typedef(t)?;
        }
        for c in doc.constants.values() {
            self.constant(c)?;
        }
        for e in doc.enums.values() {
            self.enumeration(e)?;
        }
        for s in doc.structs.values() {
            self.record(s)?;
        }
        for u in doc.unions.values() {
            self.union(u)?;
        }
        for x in doc.exceptions.values() {
            self.record(x)?;
        }
        for s in doc.services.values() {
            self.service(s)?;
        }
        Ok(())
    }

    fn doc_comment(&mut self, doc: &str, marker: &str, indent: &str) {
        for line in doc.lines() {
            if line.is_empty() {
                self.out.push_str(&format!("{}{}\n", indent, marker));
            } else {
                self.out.push_str(&format!("{}{} {}\n", indent, marker, line));
            }
        }
    }

    // ── Types ─────────────────────────────────────────────────────────

    fn byte_type(&self) -> &'static str {
        if self.config.treat_byte_type_as_signed {
            "i8"
        } else {
            "u8"
        }
    }

    /// Path of a user-defined type as seen from this module.
    fn type_path(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((alias, bare)) => format!(
                "super::{}::{}",
                to_snake_case(alias),
                to_pascal_case(bare)
            ),
            None => to_pascal_case(name),
        }
    }

    fn rust_type(&self, t: &Type) -> Result<String, CodegenError> {
        Ok(match t.name.as_str() {
            "bool" => "bool".to_owned(),
            "byte" => self.byte_type().to_owned(),
            "i8" | "i16" | "i32" | "i64" => t.name.clone(),
            "double" => "f64".to_owned(),
            "string" => "String".to_owned(),
            "binary" => "Vec<u8>".to_owned(),
            "list" => format!("Vec<{}>", self.rust_type(value_of(t)?)?),
            "set" => format!(
                "std::collections::BTreeSet<{}>",
                self.rust_type(value_of(t)?)?
            ),
            "map" => format!(
                "std::collections::BTreeMap<{}, {}>",
                self.rust_type(key_of(t)?)?,
                self.rust_type(value_of(t)?)?
            ),
            other => self.type_path(other),
        })
    }

    fn field_type(&self, f: &Field) -> Result<String, CodegenError> {
        let t = self.rust_type(&f.type_)?;
        if f.is_optional() && self.config.use_nullable_wrapper_for_optional {
            Ok(format!("Option<{}>", t))
        } else {
            Ok(t)
        }
    }

    /// Follow local typedefs down to the aliased type.
    fn resolve_typedef(&self, t: &Type) -> Result<Type, CodegenError> {
        let typedefs = &self.unit.document.typedefs;
        let mut cur = t.clone();
        for _ in 0..MAX_TYPEDEF_DEPTH {
            match typedefs.get(&cur.name) {
                Some(td) => cur = td.type_.clone(),
                None => return Ok(cur),
            }
        }
        Err(CodegenError::Emit(format!("typedef cycle through '{}'", t)))
    }

    /// The enum a type names, in this document or an included one.
    fn enum_of(&self, t: &Type) -> Option<&'a Enum> {
        match t.include_qualifier() {
            Some((alias, bare)) => self.unit.include(alias)?.enums.get(bare),
            None => self.unit.document.enums.get(&t.name),
        }
    }

    /// Type of a `const` item: strings and containers become static slices.
    fn const_type(&self, t: &Type) -> Result<String, CodegenError> {
        let t = self.resolve_typedef(t)?;
        match t.name.as_str() {
            "string" => Ok("&str".to_owned()),
            "binary" => Ok("&[u8]".to_owned()),
            "list" | "set" => Ok(format!("&[{}]", self.const_type(value_of(&t)?)?)),
            "map" => Ok(format!(
                "&[({}, {})]",
                self.const_type(key_of(&t)?)?,
                self.const_type(value_of(&t)?)?
            )),
            _ => self.rust_type(&t),
        }
    }

    // ── Values ────────────────────────────────────────────────────────

    /// A bare reference: `NAME`, `alias.NAME`, `Enum.MEMBER` or
    /// `alias.Enum.MEMBER`.
    fn identifier_expr(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            None => to_screaming_snake_case(name),
            Some((prefix, member)) if self.unit.document.includes.contains_key(prefix) => format!(
                "super::{}::{}",
                to_snake_case(prefix),
                to_screaming_snake_case(member)
            ),
            Some((prefix, member)) => {
                format!("{}::{}", self.type_path(prefix), to_pascal_case(member))
            }
        }
    }

    fn int_expr(&self, n: i64, t: &Type) -> Result<String, CodegenError> {
        if t.name == "double" {
            return Ok(float_literal(n as f64));
        }
        if let Some(e) = self.enum_of(t) {
            let member = e.values().iter().find(|v| v.value == n).ok_or_else(|| {
                CodegenError::Emit(format!("enum {} has no member with value {}", e.name, n))
            })?;
            return Ok(format!(
                "{}::{}",
                self.type_path(&t.name),
                to_pascal_case(&member.name)
            ));
        }
        Ok(n.to_string())
    }

    /// Expression usable in a `const` item of type [`Self::const_type`].
    fn const_expr(&self, v: &ConstValue, t: &Type) -> Result<String, CodegenError> {
        let t = self.resolve_typedef(t)?;
        match v {
            ConstValue::Identifier(name) => Ok(self.identifier_expr(name)),
            ConstValue::Int(n) => self.int_expr(*n, &t),
            ConstValue::Double(f) => Ok(float_literal(*f)),
            ConstValue::Bool(b) => Ok(b.to_string()),
            ConstValue::String(s) if t.name == "binary" => Ok(format!("{:?}.as_bytes()", s)),
            ConstValue::String(s) => Ok(format!("{:?}", s)),
            ConstValue::List(items) => {
                let elem = value_of(&t)?;
                let parts = items
                    .iter()
                    .map(|i| self.const_expr(i, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("&[{}]", parts.join(", ")))
            }
            ConstValue::Map(entries) => {
                let (kt, vt) = (key_of(&t)?, value_of(&t)?);
                let parts = entries
                    .iter()
                    .map(|(k, v)| {
                        Ok(format!(
                            "({}, {})",
                            self.const_expr(k, kt)?,
                            self.const_expr(v, vt)?
                        ))
                    })
                    .collect::<Result<Vec<_>, CodegenError>>()?;
                Ok(format!("&[{}]", parts.join(", ")))
            }
        }
    }

    /// Expression producing an owned value of [`Self::rust_type`].
    fn owned_expr(&self, v: &ConstValue, t: &Type) -> Result<String, CodegenError> {
        let t = self.resolve_typedef(t)?;
        match (v, t.name.as_str()) {
            (ConstValue::Identifier(name), kind) => {
                let e = self.identifier_expr(name);
                Ok(match kind {
                    "string" => format!("{}.to_owned()", e),
                    "binary" | "list" => format!("{}.to_vec()", e),
                    "set" | "map" => format!("{}.iter().cloned().collect()", e),
                    _ => e,
                })
            }
            (ConstValue::String(s), "binary") => Ok(format!("{:?}.as_bytes().to_vec()", s)),
            (ConstValue::String(s), _) => Ok(format!("{:?}.to_owned()", s)),
            (ConstValue::List(items), kind) => {
                let elem = value_of(&t)?;
                let parts = items
                    .iter()
                    .map(|i| self.owned_expr(i, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                if kind == "set" {
                    Ok(format!("[{}].into_iter().collect()", parts.join(", ")))
                } else {
                    Ok(format!("vec![{}]", parts.join(", ")))
                }
            }
            (ConstValue::Map(entries), _) => {
                let (kt, vt) = (key_of(&t)?, value_of(&t)?);
                let parts = entries
                    .iter()
                    .map(|(k, v)| {
                        Ok(format!(
                            "({}, {})",
                            self.owned_expr(k, kt)?,
                            self.owned_expr(v, vt)?
                        ))
                    })
                    .collect::<Result<Vec<_>, CodegenError>>()?;
                Ok(format!("[{}].into_iter().collect()", parts.join(", ")))
            }
            _ => self.const_expr(v, &t),
        }
    }

    // ── Definitions ───────────────────────────────────────────────────

    fn typedef(&mut self, t: &Typedef) -> Result<(), CodegenError> {
        let target = self.rust_type(&t.type_)?;
        self.out.push('\n');
        self.doc_comment(&t.doc, "///", "");
        self.out.push_str(&format!(
            "pub type {} = {};\n",
            to_pascal_case(&t.alias),
            target
        ));
        Ok(())
    }

    fn constant(&mut self, c: &Constant) -> Result<(), CodegenError> {
        let resolved = self.resolve_typedef(&c.type_)?;
        if !resolved.is_primitive() && !resolved.is_container() && self.enum_of(&resolved).is_none()
        {
            return Err(CodegenError::Emit(format!(
                "constant {}: values of type '{}' cannot be expressed as a Rust const",
                c.name, c.type_
            )));
        }
        let ty = self.const_type(&c.type_)?;
        let value = self.const_expr(&c.value, &c.type_)?;
        self.out.push('\n');
        self.doc_comment(&c.doc, "///", "");
        self.out.push_str(&format!(
            "pub const {}: {} = {};\n",
            to_screaming_snake_case(&c.name),
            ty,
            value
        ));
        Ok(())
    }

    fn enumeration(&mut self, e: &Enum) -> Result<(), CodegenError> {
        let name = to_pascal_case(&e.name);
        check_unique(
            &format!("enum {}", e.name),
            e.values()
                .iter()
                .map(|v| (v.name.as_str(), to_pascal_case(&v.name))),
        )?;
        let mut by_value: BTreeMap<i64, &str> = BTreeMap::new();
        for v in e.values() {
            if let Some(first) = by_value.insert(v.value, &v.name) {
                return Err(CodegenError::Emit(format!(
                    "enum {}: '{}' and '{}' share the value {}",
                    e.name, first, v.name, v.value
                )));
            }
        }

        self.out.push('\n');
        self.doc_comment(&e.doc, "///", "");
        if e.values().is_empty() {
            self.out
                .push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
            self.out.push_str(&format!("pub enum {} {{}}\n", name));
        } else {
            self.out
                .push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n");
            self.out.push_str("#[repr(i64)]\n");
            self.out.push_str(&format!("pub enum {} {{\n", name));
            for (i, v) in e.values().iter().enumerate() {
                self.doc_comment(&v.doc, "///", "    ");
                if i == 0 {
                    self.out.push_str("    #[default]\n");
                }
                self.out.push_str(&format!(
                    "    {} = {},\n",
                    to_pascal_case(&v.name),
                    v.value
                ));
            }
            self.out.push_str("}\n");
        }

        self.out.push_str(&format!(
            "\nimpl TryFrom<i64> for {} {{\n    type Error = i64;\n\n    fn try_from(value: i64) -> Result<Self, Self::Error> {{\n",
            name
        ));
        if e.values().is_empty() {
            self.out.push_str("        Err(value)\n");
        } else {
            self.out.push_str("        match value {\n");
            for v in e.values() {
                self.out.push_str(&format!(
                    "            {} => Ok({}::{}),\n",
                    v.value,
                    name,
                    to_pascal_case(&v.name)
                ));
            }
            self.out.push_str("            other => Err(other),\n        }\n");
        }
        self.out.push_str("    }\n}\n");
        Ok(())
    }

    /// Structs and exceptions.
    fn record(&mut self, s: &Struct) -> Result<(), CodegenError> {
        let name = to_pascal_case(&s.name);
        check_unique(
            &format!("{} {}", s.kind.keyword(), s.name),
            s.fields
                .iter()
                .map(|f| (f.name.as_str(), to_snake_case(&f.name))),
        )?;

        self.out.push('\n');
        self.doc_comment(&s.doc, "///", "");
        self.out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        self.out.push_str(&format!("pub struct {} {{\n", name));
        for f in &s.fields {
            let ty = self.field_type(f)?;
            self.doc_comment(&f.doc, "///", "    ");
            self.out
                .push_str(&format!("    pub {}: {},\n", to_snake_case(&f.name), ty));
        }
        self.out.push_str("}\n");

        if s.fields.iter().any(|f| f.default.is_some()) {
            self.out.push_str(&format!(
                "\nimpl Default for {} {{\n    fn default() -> Self {{\n        {} {{\n",
                name, name
            ));
            for f in &s.fields {
                let value = match &f.default {
                    Some(d) => {
                        let e = self.owned_expr(d, &f.type_)?;
                        if f.is_optional() && self.config.use_nullable_wrapper_for_optional {
                            format!("Some({})", e)
                        } else {
                            e
                        }
                    }
                    None => "Default::default()".to_owned(),
                };
                self.out.push_str(&format!(
                    "            {}: {},\n",
                    to_snake_case(&f.name),
                    value
                ));
            }
            self.out.push_str("        }\n    }\n}\n");
        }

        if s.kind == StructKind::Exception {
            self.out.push_str(&format!(
                "\nimpl std::fmt::Display for {} {{\n    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{\n        write!(f, \"{{:?}}\", self)\n    }}\n}}\n\nimpl std::error::Error for {} {{}}\n",
                name, name
            ));
        }
        Ok(())
    }

    /// Unions become enums with one single-value variant per field.
    fn union(&mut self, u: &Struct) -> Result<(), CodegenError> {
        let name = to_pascal_case(&u.name);
        self.variant_enum(&name, &u.doc, &u.fields, &format!("union {}", u.name))
    }

    fn variant_enum(
        &mut self,
        name: &str,
        doc: &str,
        fields: &[Field],
        owner: &str,
    ) -> Result<(), CodegenError> {
        check_unique(
            owner,
            fields
                .iter()
                .map(|f| (f.name.as_str(), to_pascal_case(&f.name))),
        )?;
        self.out.push('\n');
        self.doc_comment(doc, "///", "");
        self.out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
        self.out.push_str(&format!("pub enum {} {{\n", name));
        for f in fields {
            let ty = self.rust_type(&f.type_)?;
            self.doc_comment(&f.doc, "///", "    ");
            self.out
                .push_str(&format!("    {}({}),\n", to_pascal_case(&f.name), ty));
        }
        self.out.push_str("}\n");
        Ok(())
    }

    fn service(&mut self, s: &Service) -> Result<(), CodegenError> {
        let name = to_pascal_case(&s.name);
        check_unique(
            &format!("service {}", s.name),
            s.methods
                .values()
                .map(|m| (m.name.as_str(), to_snake_case(&m.name))),
        )?;

        self.out.push('\n');
        self.doc_comment(&s.doc, "///", "");
        let supertrait = s
            .extends
            .as_ref()
            .map(|t| format!(": {}", self.type_path(&t.name)))
            .unwrap_or_default();
        self.out
            .push_str(&format!("pub trait {}{} {{\n", name, supertrait));
        let mut errors = Vec::new();
        for (i, m) in s.methods.values().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.doc_comment(&m.doc, "///", "    ");
            let signature = self.method_signature(&name, m, &mut errors)?;
            self.out.push_str(&format!("    {};\n", signature));
        }
        self.out.push_str("}\n");

        for (error_name, method) in errors {
            let doc = format!("Exceptions declared by `{}::{}`.", name, to_snake_case(&method.name));
            self.variant_enum(
                &error_name,
                &doc,
                &method.exceptions,
                &format!("exceptions of {}.{}", s.name, method.name),
            )?;
        }
        Ok(())
    }

    fn method_signature<'m>(
        &self,
        service: &str,
        m: &'m Method,
        errors: &mut Vec<(String, &'m Method)>,
    ) -> Result<String, CodegenError> {
        check_unique(
            &format!("arguments of {}", m.name),
            m.arguments
                .iter()
                .map(|a| (a.name.as_str(), to_snake_case(&a.name))),
        )?;
        let mut params = vec!["&self".to_owned()];
        for a in &m.arguments {
            params.push(format!("{}: {}", to_snake_case(&a.name), self.field_type(a)?));
        }

        let ret = if m.oneway {
            None
        } else {
            let value = match &m.return_type {
                Some(t) => Some(self.rust_type(t)?),
                None => None,
            };
            if m.exceptions.is_empty() {
                value
            } else {
                let error_name = format!("{}{}Error", service, to_pascal_case(&m.name));
                let ret = format!(
                    "Result<{}, {}>",
                    value.as_deref().unwrap_or("()"),
                    error_name
                );
                errors.push((error_name, m));
                Some(ret)
            }
        };

        Ok(format!(
            "fn {}({}){}",
            to_snake_case(&m.name),
            params.join(", "),
            ret.map(|r| format!(" -> {}", r)).unwrap_or_default()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlc_core::{parse_file_with_provider, InMemoryProvider, ParsedFile};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn parse(files: &[(&str, &str)]) -> ParsedFile {
        let provider = InMemoryProvider::from_files(files.iter().copied());
        parse_file_with_provider(Path::new(files[0].0), &provider).unwrap()
    }

    fn render_with(parsed: &ParsedFile, config: GenerateConfig) -> Result<String, CodegenError> {
        let unit = SourceUnit {
            path: &parsed.path,
            document: &parsed.document,
            parsed,
        };
        RustGenerator.render(&unit, &config)
    }

    fn render(src: &str) -> String {
        render_with(&parse(&[("/idl/test.thrift", src)]), GenerateConfig::default()).unwrap()
    }

    #[test]
    fn header_and_document_doc() {
        let out = render("// first\n// second\nnamespace rs demo\n");
        assert_eq!(
            out,
            "// Code generated by idlc from test.thrift. DO NOT EDIT.\n//! first\n//! second\n"
        );
    }

    #[test]
    fn struct_with_defaults() {
        let out = render(
            "// A point\nstruct point {\n  1: double x = 1, // east\n  2: optional string label = \"origin\"\n  3: list<i64> path\n}",
        );
        assert_eq!(
            out,
            "// Code generated by idlc from test.thrift. DO NOT EDIT.\n\
             \n\
             /// A point\n\
             #[derive(Debug, Clone, PartialEq)]\n\
             pub struct Point {\n\
             \x20   /// east\n\
             \x20   pub x: f64,\n\
             \x20   pub label: String,\n\
             \x20   pub path: Vec<i64>,\n\
             }\n\
             \n\
             impl Default for Point {\n\
             \x20   fn default() -> Self {\n\
             \x20       Point {\n\
             \x20           x: 1.0,\n\
             \x20           label: \"origin\".to_owned(),\n\
             \x20           path: Default::default(),\n\
             \x20       }\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn nullable_wrapper_toggle() {
        let parsed = parse(&[(
            "/idl/test.thrift",
            "struct S { 1: optional string a = \"x\", 2: required i32 b }",
        )]);
        let config = GenerateConfig {
            use_nullable_wrapper_for_optional: true,
            ..GenerateConfig::default()
        };
        let out = render_with(&parsed, config).unwrap();
        assert!(out.contains("    pub a: Option<String>,\n    pub b: i32,\n"));
        assert!(out.contains("            a: Some(\"x\".to_owned()),\n"));
    }

    #[test]
    fn signed_byte_toggle() {
        let parsed = parse(&[("/idl/test.thrift", "typedef byte Octet")]);
        let unsigned = render_with(&parsed, GenerateConfig::default()).unwrap();
        assert!(unsigned.ends_with("pub type Octet = u8;\n"));
        let signed = render_with(
            &parsed,
            GenerateConfig {
                treat_byte_type_as_signed: true,
                ..GenerateConfig::default()
            },
        )
        .unwrap();
        assert!(signed.ends_with("pub type Octet = i8;\n"));
    }

    #[test]
    fn enum_with_discriminants() {
        let out = render("enum Operation {\n  ADD = 1\n  // minus\n  SUBTRACT\n}");
        assert_eq!(
            out,
            "// Code generated by idlc from test.thrift. DO NOT EDIT.\n\
             \n\
             #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]\n\
             #[repr(i64)]\n\
             pub enum Operation {\n\
             \x20   #[default]\n\
             \x20   Add = 1,\n\
             \x20   /// minus\n\
             \x20   Subtract = 2,\n\
             }\n\
             \n\
             impl TryFrom<i64> for Operation {\n\
             \x20   type Error = i64;\n\
             \n\
             \x20   fn try_from(value: i64) -> Result<Self, Self::Error> {\n\
             \x20       match value {\n\
             \x20           1 => Ok(Operation::Add),\n\
             \x20           2 => Ok(Operation::Subtract),\n\
             \x20           other => Err(other),\n\
             \x20       }\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn enum_values_must_be_distinct() {
        let parsed = parse(&[("/idl/test.thrift", "enum E { A = 1, B = 1 }")]);
        let err = render_with(&parsed, GenerateConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "emit error: enum E: 'A' and 'B' share the value 1");
    }

    #[test]
    fn constants_use_static_forms() {
        let out = render(
            "enum Op { ADD = 1 }\n\
             typedef string Name\n\
             const list<i64> L = [1, 2, 3]\n\
             const map<string, Name> M = {\"k\": \"v\"}\n\
             const Name N = \"n\"\n\
             const Op DEFAULT_OP = Op.ADD\n\
             const Op FROM_INT = 1\n\
             const double D = 2\n\
             const binary B = \"ab\"\n\
             const i64 COPY = L2\n",
        );
        assert!(out.contains("pub const L: &[i64] = &[1, 2, 3];\n"));
        assert!(out.contains("pub const M: &[(&str, &str)] = &[(\"k\", \"v\")];\n"));
        assert!(out.contains("pub const N: &str = \"n\";\n"));
        assert!(out.contains("pub const DEFAULT_OP: Op = Op::Add;\n"));
        assert!(out.contains("pub const FROM_INT: Op = Op::Add;\n"));
        assert!(out.contains("pub const D: f64 = 2.0;\n"));
        assert!(out.contains("pub const B: &[u8] = \"ab\".as_bytes();\n"));
        assert!(out.contains("pub const COPY: i64 = L2;\n"));
    }

    #[test]
    fn struct_typed_constant_is_rejected() {
        let parsed = parse(&[("/idl/test.thrift", "struct P {}\nconst P ORIGIN = {}")]);
        assert!(matches!(
            render_with(&parsed, GenerateConfig::default()),
            Err(CodegenError::Emit(_))
        ));
    }

    #[test]
    fn union_becomes_enum() {
        let out = render("union Value { 1: i64 int_value, 2: string str_value }");
        assert!(out.contains(
            "#[derive(Debug, Clone, PartialEq)]\npub enum Value {\n    IntValue(i64),\n    StrValue(String),\n}\n"
        ));
    }

    #[test]
    fn exception_implements_error() {
        let out = render("exception Oops { 1: string why }");
        assert!(out.contains("pub struct Oops {\n    pub why: String,\n}\n"));
        assert!(out.contains("impl std::error::Error for Oops {}\n"));
    }

    #[test]
    fn service_becomes_trait() {
        let parsed = parse(&[
            (
                "/idl/calc.thrift",
                "include \"shared.thrift\"\n\
                 service Calculator extends shared.Base {\n\
                 \t/** Adds. */\n\
                 \ti32 add(1: i32 a, 2: optional i32 b)\n\
                 \tvoid divide(1: i32 n) throws (1: shared.DivByZero oops)\n\
                 \toneway void reset()\n\
                 }",
            ),
            (
                "/idl/shared.thrift",
                "service Base {}\nexception DivByZero {}",
            ),
        ]);
        let out = render_with(&parsed, GenerateConfig::default()).unwrap();
        assert!(out.contains(
            "pub trait Calculator: super::shared::Base {\n\
             \x20   /// Adds.\n\
             \x20   fn add(&self, a: i32, b: i32) -> i32;\n\
             \n\
             \x20   fn divide(&self, n: i32) -> Result<(), CalculatorDivideError>;\n\
             \n\
             \x20   fn reset(&self);\n\
             }\n"
        ));
        assert!(out.contains(
            "/// Exceptions declared by `Calculator::divide`.\n\
             #[derive(Debug, Clone, PartialEq)]\n\
             pub enum CalculatorDivideError {\n\
             \x20   Oops(super::shared::DivByZero),\n\
             }\n"
        ));
    }

    #[test]
    fn qualified_enum_constant_resolves_through_include() {
        let parsed = parse(&[
            (
                "/idl/main.thrift",
                "include \"shared.thrift\"\nconst shared.Level L = 2\nconst i32 X = shared.LIMIT",
            ),
            ("/idl/shared.thrift", "enum Level { LOW = 1, HIGH }\nconst i32 LIMIT = 3"),
        ]);
        let out = render_with(&parsed, GenerateConfig::default()).unwrap();
        assert!(out.contains("pub const L: super::shared::Level = super::shared::Level::High;\n"));
        assert!(out.contains("pub const X: i32 = super::shared::LIMIT;\n"));
    }

    #[test]
    fn colliding_field_names_are_rejected() {
        let parsed = parse(&[("/idl/test.thrift", "struct S { 1: i32 fooBar, 2: i32 foo_bar }")]);
        let err = render_with(&parsed, GenerateConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "emit error: struct S: 'fooBar' and 'foo_bar' both become 'foo_bar'"
        );
    }
}
