use crate::{
    error::IdlError,
    gen::{check_distinct, unsupported, Generator, Language},
    types::{Const, Entry, Enum, Grammar, Object, PrimitiveType, PrimitiveValue, Type},
};

pub struct RustGenerator;

impl Generator for RustGenerator {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn render(&self, grammar: &Grammar) -> Result<String, IdlError> {
        compile_schema_to_rust(grammar)
    }
}

/// Maps IDL primitives to Rust types.
fn map_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Int8    => "i8",
        PrimitiveType::Int16   => "i16",
        PrimitiveType::Int32   => "i32",
        PrimitiveType::Int64   => "i64",
        PrimitiveType::UInt8   => "u8",
        PrimitiveType::UInt16  => "u16",
        PrimitiveType::UInt32  => "u32",
        PrimitiveType::UInt64  => "u64",
        PrimitiveType::Float32 => "f32",
        PrimitiveType::Float64 => "f64",
        PrimitiveType::String  => "String",
        PrimitiveType::Bool    => "bool",
    }
}

/// Borrowed form used for `const` items and enum values.
fn map_static_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::String => "&'static str",
        other => map_primitive(other),
    }
}

/// `HashMap` keys must be `Eq + Hash` and survive a trip through a JSON key.
fn map_key(p: PrimitiveType, context: &str) -> Result<&'static str, IdlError> {
    if p.is_integer() || p == PrimitiveType::String {
        Ok(map_primitive(p))
    } else {
        Err(unsupported(Language::Rust, format!("map key {}", p.keyword()), context))
    }
}

fn map_type(t: &Type, context: &str) -> Result<String, IdlError> {
    Ok(match t {
        Type::Primitive(p) => map_primitive(*p).to_string(),
        Type::List(inner)  => format!("Vec<{}>", map_type(inner, context)?),
        Type::Map(m)       => format!(
            "HashMap<{}, {}>",
            map_key(m.key, context)?,
            map_primitive(m.value)
        ),
        Type::Identity(name) => name.clone(),
    })
}

fn literal(p: PrimitiveType, value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::String(s) => format!("\"{}\"", s.escape_default()),
        PrimitiveValue::Bool(b)   => b.to_string(),
        PrimitiveValue::Int(i) if !p.is_float() => i.to_string(),
        _ => value.float_text().unwrap_or_default(),
    }
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn",
        "else", "enum", "extern", "false", "fn", "for", "if", "impl",
        "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static",
        "struct", "super", "trait", "true", "try", "type", "unsafe",
        "use", "where", "while",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Variants share a namespace with the associated items every generated
/// enum declares.
fn escape_enum_variant(s: &str) -> String {
    let taken = ["ALL", "value", "index_of", "value_at", "from_value"];
    if taken.contains(&s) {
        format!("{}_", s)
    } else {
        escape_rust_keyword(s)
    }
}

/// Compiles the entire grammar into Rust declarations. Objects derive serde
/// and enums link against `brine_idl::LookupError`.
pub fn compile_schema_to_rust(grammar: &Grammar) -> Result<String, IdlError> {
    let mut rust_code: Vec<String> = Vec::new();

    rust_code.push("// Code generated by bidl. DO NOT EDIT.".to_string());
    rust_code.push("".to_string());

    for name in &grammar.package {
        rust_code.push(format!("pub mod {} {{", escape_rust_keyword(name)));
    }

    let mut imports = Vec::new();
    if grammar.uses_maps() {
        imports.push("use std::collections::HashMap;".to_string());
    }
    if grammar.has_enums() || grammar.has_objects() {
        imports.push("use serde::{Deserialize, Serialize};".to_string());
    }
    if grammar.has_enums() {
        imports.push("use brine_idl::LookupError;".to_string());
    }
    if !imports.is_empty() {
        rust_code.extend(imports);
        rust_code.push("".to_string());
    }

    for entry in &grammar.entries {
        rust_code.push(match entry {
            Entry::Const(c)  => generate_const(c),
            Entry::Enum(e)   => generate_enum(e)?,
            Entry::Object(o) => generate_struct(o)?,
        });
    }

    for _ in &grammar.package {
        rust_code.push("}".to_string());
    }

    log::debug!("rendered {} rust entries", grammar.entries.len());

    Ok(rust_code.join("\n") + "\n")
}

fn generate_const(constant: &Const) -> String {
    let type_name = map_static_primitive(constant.type_);
    let mut lines = Vec::new();

    for field in &constant.fields {
        let name = constant.binding(field);
        if name.chars().any(|c| c.is_ascii_lowercase()) {
            lines.push("#[allow(non_upper_case_globals)]".to_string());
        }
        lines.push(format!(
            "pub const {}: {} = {};",
            name,
            type_name,
            literal(constant.type_, &field.value)
        ));
    }

    lines.push("".to_string());
    lines.join("\n")
}

/// Generates a fieldless enum that serializes as its underlying value, plus
/// index/value lookups in declaration order.
fn generate_enum(enumeration: &Enum) -> Result<String, IdlError> {
    let name       = &enumeration.name;
    let value_type = map_static_primitive(enumeration.type_);
    let is_string  = enumeration.type_ == PrimitiveType::String;
    let owned_type = if is_string { "String" } else { value_type };
    let variants: Vec<String> = enumeration
        .values
        .iter()
        .map(|v| escape_enum_variant(&v.name))
        .collect();
    check_distinct(
        Language::Rust,
        name,
        enumeration.values.iter().map(|v| v.name.as_str()).zip(variants.iter().cloned()),
    )?;

    let mut lines = Vec::new();

    lines.push("#[allow(non_camel_case_types)]".to_string());
    lines.push("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]".to_string());
    lines.push(format!("#[serde(try_from = \"{}\", into = \"{}\")]", owned_type, value_type));
    lines.push(format!("pub enum {} {{", name));
    for variant in &variants {
        lines.push(format!("    {},", variant));
    }
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.push(format!("impl {} {{", name));
    lines.push(format!(
        "    pub const ALL: [{}; {}] = [{}];",
        name,
        variants.len(),
        variants
            .iter()
            .map(|v| format!("{}::{}", name, v))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push("".to_string());

    lines.push(format!("    pub fn value(self) -> {} {{", value_type));
    lines.push("        match self {".to_string());
    for (variant, value) in variants.iter().zip(&enumeration.values) {
        lines.push(format!(
            "            {}::{} => {},",
            name,
            variant,
            literal(enumeration.type_, &value.value)
        ));
    }
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push("    pub fn index_of(self) -> usize {".to_string());
    lines.push("        match self {".to_string());
    for (i, variant) in variants.iter().enumerate() {
        lines.push(format!("            {}::{} => {},", name, variant, i));
    }
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    lines.push("    pub fn value_at(index: usize) -> Result<Self, LookupError> {".to_string());
    lines.push("        match index {".to_string());
    for (i, variant) in variants.iter().enumerate() {
        lines.push(format!("            {} => Ok({}::{}),", i, name, variant));
    }
    lines.push(format!(
        "            _ => Err(LookupError::Index {{ enum_name: \"{}\", index }}),",
        name
    ));
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());

    let param_type = if is_string { "&str" } else { value_type };
    lines.push(format!(
        "    pub fn from_value(value: {}) -> Result<Self, LookupError> {{",
        param_type
    ));
    lines.push("        Self::ALL".to_string());
    lines.push("            .iter()".to_string());
    lines.push("            .copied()".to_string());
    lines.push("            .find(|v| v.value() == value)".to_string());
    lines.push(format!(
        "            .ok_or_else(|| LookupError::Value {{ enum_name: \"{}\", value: value.to_string() }})",
        name
    ));
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.push(format!("impl TryFrom<{}> for {} {{", owned_type, name));
    lines.push("    type Error = LookupError;".to_string());
    lines.push("".to_string());
    lines.push(format!(
        "    fn try_from(value: {}) -> Result<Self, Self::Error> {{",
        owned_type
    ));
    lines.push(format!(
        "        Self::from_value({})",
        if is_string { "&value" } else { "value" }
    ));
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    lines.push(format!("impl From<{}> for {} {{", name, value_type));
    lines.push(format!("    fn from(value: {}) -> Self {{", name));
    lines.push("        value.value()".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    Ok(lines.join("\n"))
}

/// Generates a serde struct with a positional constructor and JSON helpers.
/// JSON keys stay exactly as written in the IDL.
fn generate_struct(object: &Object) -> Result<String, IdlError> {
    let struct_name = &object.name;
    let mixed_case  = object
        .fields
        .iter()
        .any(|f| f.name.chars().any(|c| c.is_ascii_uppercase()));

    let mut fields = Vec::new();
    for field in &object.fields {
        let context = format!("{}.{}", object.name, field.name);
        let rust_name = escape_rust_keyword(&field.name);
        fields.push((field, rust_name, map_type(&field.type_, &context)?));
    }
    check_distinct(
        Language::Rust,
        struct_name,
        fields.iter().map(|(field, rust_name, _)| (field.name.as_str(), rust_name.clone())),
    )?;

    let mut lines = Vec::new();
    if mixed_case {
        lines.push("#[allow(non_snake_case)]".to_string());
    }
    lines.push("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]".to_string());
    lines.push(format!("pub struct {} {{", struct_name));
    for (field, rust_name, type_name) in &fields {
        if *rust_name != field.name {
            lines.push(format!("    #[serde(rename = \"{}\")]", field.name));
        }
        lines.push(format!("    pub {}: {},", rust_name, type_name));
    }
    lines.push("}".to_string());
    lines.push("".to_string());

    if mixed_case {
        lines.push("#[allow(non_snake_case)]".to_string());
    }
    lines.push(format!("impl {} {{", struct_name));
    if fields.len() > 7 {
        lines.push("    #[allow(clippy::too_many_arguments)]".to_string());
    }
    lines.push(format!(
        "    pub fn new({}) -> Self {{",
        fields
            .iter()
            .map(|(_, rust_name, type_name)| format!("{}: {}", rust_name, type_name))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push("        Self {".to_string());
    for (_, rust_name, _) in &fields {
        lines.push(format!("            {},", rust_name));
    }
    lines.push("        }".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());
    lines.push("    pub fn to_json(&self) -> serde_json::Result<String> {".to_string());
    lines.push("        serde_json::to_string(self)".to_string());
    lines.push("    }".to_string());
    lines.push("".to_string());
    lines.push("    pub fn from_json(json: &str) -> serde_json::Result<Self> {".to_string());
    lines.push("        serde_json::from_str(json)".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());
    lines.push("".to_string());

    Ok(lines.join("\n"))
}
