use std::collections::HashMap;

use crate::{
    error::IdlError,
    gen::{check_distinct, unsupported, Generator, Language},
    naming::to_camel_case,
    types::{Const, Entry, Enum, Grammar, Object, PrimitiveType, PrimitiveValue, Type},
    utils::quote,
};

pub struct DartGenerator;

impl Generator for DartGenerator {
    fn language(&self) -> Language {
        Language::Dart
    }

    fn render(&self, grammar: &Grammar) -> Result<String, IdlError> {
        let enums = grammar.enum_types();
        let mut lines = vec!["// Code generated by bidl. DO NOT EDIT.".to_string()];

        if !grammar.package.is_empty() {
            lines.push(String::new());
            lines.push(format!("library {};", grammar.package.join(".")));
        }
        if grammar.has_objects() {
            lines.push(String::new());
            lines.push("import 'dart:convert';".to_string());
        }

        for entry in &grammar.entries {
            lines.push(String::new());
            lines.extend(match entry {
                Entry::Const(c)  => generate_const(c),
                Entry::Enum(e)   => generate_enum(e)?,
                Entry::Object(o) => generate_object(o, &enums)?,
            });
        }

        Ok(lines.join("\n") + "\n")
    }
}

fn map_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Float32 | PrimitiveType::Float64 => "double",
        PrimitiveType::String => "String",
        PrimitiveType::Bool   => "bool",
        // Dart has a single integer type.
        _ => "int",
    }
}

fn map_key(p: PrimitiveType, context: &str) -> Result<&'static str, IdlError> {
    if p.is_integer() || p == PrimitiveType::String {
        Ok(map_primitive(p))
    } else {
        Err(unsupported(Language::Dart, format!("map key {}", p.keyword()), context))
    }
}

fn map_type(t: &Type, context: &str) -> Result<String, IdlError> {
    Ok(match t {
        Type::Primitive(p)   => map_primitive(*p).to_string(),
        Type::List(inner)    => format!("List<{}>", map_type(inner, context)?),
        Type::Map(m)         => format!("Map<{}, {}>", map_key(m.key, context)?, map_primitive(m.value)),
        Type::Identity(name) => name.clone(),
    })
}

/// Dart strings interpolate `$`, so it has to be escaped on top of the
/// JSON-style escapes.
fn dart_string(s: &str) -> String {
    quote(s).replace('$', "\\$")
}

fn literal(p: PrimitiveType, value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::String(s) => dart_string(s),
        PrimitiveValue::Bool(b)   => b.to_string(),
        PrimitiveValue::Int(i) if !p.is_float() => i.to_string(),
        _ => value.float_text().unwrap_or_default(),
    }
}

fn escape_dart_keyword(s: &str) -> String {
    let keywords = [
        "assert", "break", "case", "catch", "class", "const", "continue",
        "default", "do", "else", "enum", "extends", "false", "final",
        "finally", "for", "if", "in", "is", "new", "null", "rethrow",
        "return", "super", "switch", "this", "throw", "true", "try", "var",
        "void", "while", "with",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Enum constants share a namespace with the members every generated enum
/// declares.
fn escape_enum_constant(s: &str) -> String {
    let taken = [
        "value", "values", "index", "name", "hashCode", "runtimeType",
        "toString", "noSuchMethod", "fromValue", "indexOf", "valueAt",
    ];
    if taken.contains(&s) {
        format!("{}_", s)
    } else {
        escape_dart_keyword(s)
    }
}

fn generate_const(constant: &Const) -> Vec<String> {
    let type_name = map_primitive(constant.type_);
    constant
        .fields
        .iter()
        .map(|f| {
            format!(
                "const {} {} = {};",
                type_name,
                escape_dart_keyword(&constant.binding(f)),
                literal(constant.type_, &f.value)
            )
        })
        .collect()
}

/// Enhanced enum carrying its declared value, with lookups in declaration
/// order.
fn generate_enum(enumeration: &Enum) -> Result<Vec<String>, IdlError> {
    let name = &enumeration.name;
    let value_type = map_primitive(enumeration.type_);
    let constants: Vec<String> = enumeration
        .values
        .iter()
        .map(|v| escape_enum_constant(&v.name))
        .collect();
    check_distinct(
        Language::Dart,
        name,
        enumeration.values.iter().map(|v| v.name.as_str()).zip(constants.iter().cloned()),
    )?;

    let mut lines = vec![format!("enum {} {{", name)];
    let count = constants.len();
    for (i, (constant, value)) in constants.iter().zip(&enumeration.values).enumerate() {
        lines.push(format!(
            "  {}({}){}",
            constant,
            literal(enumeration.type_, &value.value),
            if i + 1 == count { ";" } else { "," }
        ));
    }
    lines.push(String::new());
    lines.push(format!("  const {}(this.value);", name));
    lines.push(String::new());
    lines.push(format!("  final {} value;", value_type));
    lines.push(String::new());

    lines.push(format!("  static {} fromValue({} value) => values.firstWhere(", name, value_type));
    lines.push("        (e) => e.value == value,".to_string());
    lines.push(format!(
        "        orElse: () => throw ArgumentError.value(value, 'value', 'Unknown {} value'),",
        name
    ));
    lines.push("      );".to_string());
    lines.push(String::new());

    lines.push(format!("  static int indexOf({} value) => switch (value) {{", name));
    for (i, constant) in constants.iter().enumerate() {
        lines.push(format!("        {}.{} => {},", name, constant, i));
    }
    lines.push("      };".to_string());
    lines.push(String::new());

    lines.push(format!("  static {} valueAt(int index) => switch (index) {{", name));
    for (i, constant) in constants.iter().enumerate() {
        lines.push(format!("        {} => {}.{},", i, name, constant));
    }
    lines.push(format!(
        "        _ => throw RangeError.range(index, 0, {}, 'index'),",
        count as i64 - 1
    ));
    lines.push("      };".to_string());
    lines.push("}".to_string());

    Ok(lines)
}

/// Expression turning the Dart value `expr` into its JSON-encodable form.
fn encode(t: &Type, expr: &str, depth: usize, enums: &HashMap<&str, PrimitiveType>) -> String {
    match t {
        Type::Primitive(_) => expr.to_string(),
        Type::Identity(name) if enums.contains_key(name.as_str()) => format!("{}.value", expr),
        Type::Identity(_) => format!("{}.toMap()", expr),
        Type::List(inner) => {
            let var = format!("e{}", depth);
            let inner_expr = encode(inner, &var, depth + 1, enums);
            if inner_expr == var {
                expr.to_string()
            } else {
                format!("{}.map(({}) => {}).toList()", expr, var, inner_expr)
            }
        }
        // JSON object keys are always strings.
        Type::Map(m) if m.key.is_integer() => {
            format!("{}.map((k{d}, v{d}) => MapEntry(k{d}.toString(), v{d}))", expr, d = depth)
        }
        Type::Map(_) => expr.to_string(),
    }
}

fn decode_primitive(p: PrimitiveType, expr: &str) -> String {
    match p {
        PrimitiveType::Float32 | PrimitiveType::Float64 => format!("({} as num).toDouble()", expr),
        PrimitiveType::String => format!("{} as String", expr),
        PrimitiveType::Bool   => format!("{} as bool", expr),
        _ => format!("{} as int", expr),
    }
}

/// Expression rebuilding a typed Dart value from the decoded JSON `expr`.
fn decode(t: &Type, expr: &str, depth: usize, enums: &HashMap<&str, PrimitiveType>) -> String {
    match t {
        Type::Primitive(p) => decode_primitive(*p, expr),
        Type::Identity(name) => match enums.get(name.as_str()) {
            Some(p) => format!("{}.fromValue({})", name, decode_primitive(*p, expr)),
            None    => format!("{}.fromMap({} as Map<String, dynamic>)", name, expr),
        },
        Type::List(inner) => {
            let var = format!("e{}", depth);
            format!(
                "({} as List).map(({}) => {}).toList()",
                expr,
                var,
                decode(inner, &var, depth + 1, enums)
            )
        }
        Type::Map(m) => {
            let key = if m.key.is_integer() {
                format!("int.parse(k{} as String)", depth)
            } else {
                format!("k{} as String", depth)
            };
            format!(
                "({} as Map).map((k{d}, v{d}) => MapEntry({}, {}))",
                expr,
                key,
                decode_primitive(m.value, &format!("v{}", depth)),
                d = depth
            )
        }
    }
}

/// Field names may not shadow the class or the members every generated class
/// declares.
fn escape_member(s: &str, class: &str) -> String {
    let taken = [
        "toMap", "toJson", "fromMap", "fromJson", "hashCode", "runtimeType",
        "toString", "noSuchMethod",
    ];
    if s == class || taken.contains(&s) {
        format!("{}_", s)
    } else {
        escape_dart_keyword(s)
    }
}

fn generate_object(
    object: &Object,
    enums: &HashMap<&str, PrimitiveType>,
) -> Result<Vec<String>, IdlError> {
    let name = &object.name;

    let mut members = Vec::new();
    for field in &object.fields {
        let context = format!("{}.{}", object.name, field.name);
        members.push((
            escape_member(&to_camel_case(&field.name), name),
            map_type(&field.type_, &context)?,
            field,
        ));
    }
    check_distinct(
        Language::Dart,
        name,
        members.iter().map(|(member, _, field)| (field.name.as_str(), member.clone())),
    )?;

    let mut lines = vec![format!("class {} {{", name)];
    for (member, type_name, _) in &members {
        lines.push(format!("  final {} {};", type_name, member));
    }
    if !members.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!(
        "  {}({});",
        name,
        members
            .iter()
            .map(|(member, _, _)| format!("this.{}", member))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push(String::new());

    lines.push("  Map<String, dynamic> toMap() => {".to_string());
    for (member, _, field) in &members {
        lines.push(format!(
            "        {}: {},",
            dart_string(&field.name),
            encode(&field.type_, member, 0, enums)
        ));
    }
    lines.push("      };".to_string());
    lines.push(String::new());

    lines.push("  String toJson() => jsonEncode(toMap());".to_string());
    lines.push(String::new());

    lines.push(format!(
        "  factory {}.fromMap(Map<String, dynamic> map) => {}(",
        name, name
    ));
    for (_, _, field) in &members {
        let source = format!("map[{}]", dart_string(&field.name));
        lines.push(format!("        {},", decode(&field.type_, &source, 0, enums)));
    }
    lines.push("      );".to_string());
    lines.push(String::new());

    lines.push(format!("  factory {}.fromJson(String source) =>", name));
    lines.push(format!(
        "      {}.fromMap(jsonDecode(source) as Map<String, dynamic>);",
        name
    ));
    lines.push("}".to_string());

    Ok(lines)
}
