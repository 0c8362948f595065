//! Document model produced by the parser.
//!
//! Every node is owned by exactly one parent collection. The only cross
//! references are [`ConstValue::Identifier`] names inside constant values and
//! field defaults; resolving them is left to consumers.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ──────────────────────────────────────────────
// Annotations and types
// ──────────────────────────────────────────────

/// One `key = "value"` entry of an annotation list. Lists keep source order
/// and may repeat keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub key: String,
    pub value: String,
}

impl Annotation {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Annotation {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "byte", "i8", "i16", "i32", "i64", "double", "string", "binary",
];

/// A type expression as written at one use site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Type {
    pub name: String,
    /// Only set for `map`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<Box<Type>>,
    /// Set for `list`, `set` and `map`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<Box<Type>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type {
            name: name.into(),
            key_type: None,
            value_type: None,
            annotations: Vec::new(),
        }
    }

    pub fn list(value: Type) -> Self {
        Type {
            value_type: Some(Box::new(value)),
            ..Type::named("list")
        }
    }

    pub fn set(value: Type) -> Self {
        Type {
            value_type: Some(Box::new(value)),
            ..Type::named("set")
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type {
            key_type: Some(Box::new(key)),
            value_type: Some(Box::new(value)),
            ..Type::named("map")
        }
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVE_TYPES.contains(&self.name.as_str())
    }

    pub fn is_container(&self) -> bool {
        matches!(self.name.as_str(), "list" | "set" | "map")
    }

    /// Split a reference qualified by an include alias (`shared.Point`)
    /// into `(alias, name)`.
    pub fn include_qualifier(&self) -> Option<(&str, &str)> {
        if self.is_primitive() || self.is_container() {
            return None;
        }
        self.name.rsplit_once('.')
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.key_type, &self.value_type) {
            (Some(k), Some(v)) => write!(f, "{}<{},{}>", self.name, k, v),
            (None, Some(v)) => write!(f, "{}<{}>", self.name, v),
            _ => f.write_str(&self.name),
        }
    }
}

// ──────────────────────────────────────────────
// Literal values
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),
    /// `[a, b]`, used for both list and set constants.
    List(Vec<ConstValue>),
    /// `{k: v}` in source order.
    Map(Vec<(ConstValue, ConstValue)>),
    /// A bare name referring to another constant or an enum member.
    /// Never resolved by the parser.
    Identifier(String),
}

// ──────────────────────────────────────────────
// Fields and field groups
// ──────────────────────────────────────────────

/// Optionality as written, after the union and `throws` defaulting rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requiredness {
    #[default]
    Unset,
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub id: i16,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Type,
    pub requiredness: Requiredness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ConstValue>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Field {
    pub fn is_optional(&self) -> bool {
        self.requiredness == Requiredness::Optional
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructKind {
    Struct,
    Union,
    Exception,
}

impl StructKind {
    pub fn keyword(self) -> &'static str {
        match self {
            StructKind::Struct => "struct",
            StructKind::Union => "union",
            StructKind::Exception => "exception",
        }
    }
}

/// Shared shape of `struct`, `union` and `exception` definitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Struct {
    pub name: String,
    pub kind: StructKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Struct {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_id(&self, id: i16) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }
}

// ──────────────────────────────────────────────
// Other definitions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constant {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Type,
    pub value: ConstValue,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// An enum keeps its members in declaration order; the name index is
/// maintained next to the sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    values: Vec<EnumValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Enum {
            name: name.into(),
            doc: String::new(),
            values: Vec::new(),
            annotations: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a member. Returns the member back if its name is taken.
    pub fn push(&mut self, value: EnumValue) -> Result<(), EnumValue> {
        if self.index.contains_key(&value.name) {
            return Err(value);
        }
        self.index.insert(value.name.clone(), self.values.len());
        self.values.push(value);
        Ok(())
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.index.get(name).map(|&i| &self.values[i])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typedef {
    pub alias: String,
    #[serde(rename = "type")]
    pub type_: Type,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Method {
    pub name: String,
    /// `None` for `void`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<Type>,
    pub oneway: bool,
    pub arguments: Vec<Field>,
    pub exceptions: Vec<Field>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Type>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    pub methods: BTreeMap<String, Method>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

// ──────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────

/// The parse result for one source unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
    /// scope -> value; a repeated scope overwrites.
    pub namespaces: BTreeMap<String, String>,
    /// alias -> include path as written.
    pub includes: BTreeMap<String, String>,
    pub structs: BTreeMap<String, Struct>,
    pub unions: BTreeMap<String, Struct>,
    pub exceptions: BTreeMap<String, Struct>,
    pub enums: BTreeMap<String, Enum>,
    pub typedefs: BTreeMap<String, Typedef>,
    pub constants: BTreeMap<String, Constant>,
    pub services: BTreeMap<String, Service>,
}

impl Document {
    /// The field-group collection for `kind`.
    pub fn groups(&self, kind: StructKind) -> &BTreeMap<String, Struct> {
        match kind {
            StructKind::Struct => &self.structs,
            StructKind::Union => &self.unions,
            StructKind::Exception => &self.exceptions,
        }
    }

    /// Look up a struct, union or exception by name.
    pub fn struct_like(&self, name: &str) -> Option<&Struct> {
        self.structs
            .get(name)
            .or_else(|| self.unions.get(name))
            .or_else(|| self.exceptions.get(name))
    }

    /// Does any top-level definition use `name`?
    pub fn defines(&self, name: &str) -> bool {
        self.struct_like(name).is_some()
            || self.enums.contains_key(name)
            || self.typedefs.contains_key(name)
            || self.constants.contains_key(name)
            || self.services.contains_key(name)
    }
}
