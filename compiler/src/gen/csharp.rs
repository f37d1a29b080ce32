use std::collections::HashMap;

use crate::{
    error::IdlError,
    gen::{check_distinct, unsupported, Generator, Language},
    naming::{to_camel_case, to_pascal_case},
    types::{Const, Entry, Enum, Grammar, Object, PrimitiveType, PrimitiveValue, Type},
    utils::quote,
};

pub struct CSharpGenerator;

impl Generator for CSharpGenerator {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn render(&self, grammar: &Grammar) -> Result<String, IdlError> {
        let enums = grammar.enum_types();
        if grammar.entries.iter().any(|e| e.name() == Some(CONSTANTS_CLASS)) {
            let bare = grammar
                .entries
                .iter()
                .any(|e| matches!(e, Entry::Const(c) if c.name.is_none()));
            if bare {
                return Err(IdlError::NameCollision {
                    language: Language::CSharp.identifier(),
                    name:     CONSTANTS_CLASS.to_string(),
                    context:  "unnamed consts".to_string(),
                });
            }
        }

        let mut body: Vec<String> = Vec::new();
        for entry in &grammar.entries {
            body.push(String::new());
            body.extend(match entry {
                Entry::Const(c)  => generate_const(c)?,
                Entry::Enum(e)   => generate_enum(e)?,
                Entry::Object(o) => generate_object(o, &enums)?,
            });
        }

        let mut lines = vec![
            "// <auto-generated />".to_string(),
            "using System;".to_string(),
            "using System.Collections.Generic;".to_string(),
            "using System.Text.Json;".to_string(),
            "using System.Text.Json.Serialization;".to_string(),
        ];

        if grammar.package.is_empty() {
            lines.extend(body);
        } else {
            lines.push(String::new());
            lines.push(format!("namespace {}", grammar.package.join(".")));
            lines.push("{".to_string());
            // Drop the blank line that would open the namespace body.
            lines.extend(body.into_iter().skip(1).map(|l| indent(&l)));
            lines.push("}".to_string());
        }

        Ok(lines.join("\n") + "\n")
    }
}

fn indent(line: &str) -> String {
    if line.is_empty() {
        String::new()
    } else {
        format!("    {}", line)
    }
}

fn map_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::Int8    => "sbyte",
        PrimitiveType::Int16   => "short",
        PrimitiveType::Int32   => "int",
        PrimitiveType::Int64   => "long",
        PrimitiveType::UInt8   => "byte",
        PrimitiveType::UInt16  => "ushort",
        PrimitiveType::UInt32  => "uint",
        PrimitiveType::UInt64  => "ulong",
        PrimitiveType::Float32 => "float",
        PrimitiveType::Float64 => "double",
        PrimitiveType::String  => "string",
        PrimitiveType::Bool    => "bool",
    }
}

fn map_key(p: PrimitiveType, context: &str) -> Result<&'static str, IdlError> {
    if p.is_integer() || p == PrimitiveType::String {
        Ok(map_primitive(p))
    } else {
        Err(unsupported(Language::CSharp, format!("map key {}", p.keyword()), context))
    }
}

/// Non-integral enums render as static classes of constants, so fields of
/// those enums hold the underlying value.
fn map_type(
    t: &Type,
    context: &str,
    enums: &HashMap<&str, PrimitiveType>,
) -> Result<String, IdlError> {
    Ok(match t {
        Type::Primitive(p)   => map_primitive(*p).to_string(),
        Type::List(inner)    => format!("List<{}>", map_type(inner, context, enums)?),
        Type::Map(m)         => format!(
            "Dictionary<{}, {}>",
            map_key(m.key, context)?,
            map_primitive(m.value)
        ),
        Type::Identity(name) => match enums.get(name.as_str()) {
            Some(p) if !p.is_integer() => map_primitive(*p).to_string(),
            _ => name.clone(),
        },
    })
}

fn literal(p: PrimitiveType, value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::String(s) => quote(s),
        PrimitiveValue::Bool(b)   => b.to_string(),
        PrimitiveValue::Int(i) if !p.is_float() => i.to_string(),
        _ => {
            let text = value.float_text().unwrap_or_default();
            if p == PrimitiveType::Float32 {
                format!("{}f", text)
            } else {
                text
            }
        }
    }
}

/// Verbatim identifiers (`@class`) are how C# spells reserved words.
fn escape_csharp_keyword(s: &str) -> String {
    let keywords = [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch",
        "char", "checked", "class", "const", "continue", "decimal", "default",
        "delegate", "do", "double", "else", "enum", "event", "explicit",
        "extern", "false", "finally", "fixed", "float", "for", "foreach",
        "goto", "if", "implicit", "in", "int", "interface", "internal", "is",
        "lock", "long", "namespace", "new", "null", "object", "operator",
        "out", "override", "params", "private", "protected", "public",
        "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof",
        "stackalloc", "static", "string", "struct", "switch", "this", "throw",
        "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe",
        "ushort", "using", "virtual", "void", "volatile", "while",
    ];
    if keywords.contains(&s) {
        format!("@{}", s)
    } else {
        s.to_string()
    }
}

/// Class collecting the bindings of unnamed consts.
const CONSTANTS_CLASS: &str = "Constants";

/// C# members may not share the name of their enclosing type.
fn escape_member(s: &str, owner: &str, taken: &[&str]) -> String {
    if s == owner || taken.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn generate_const(constant: &Const) -> Result<Vec<String>, IdlError> {
    let type_name = map_primitive(constant.type_);
    let (owner, header) = match &constant.name {
        Some(name) => (name.as_str(), format!("public static class {}", name)),
        None => (CONSTANTS_CLASS, format!("public static partial class {}", CONSTANTS_CLASS)),
    };

    let members: Vec<String> = constant
        .fields
        .iter()
        .map(|f| escape_csharp_keyword(&escape_member(&f.name, owner, &[])))
        .collect();
    check_distinct(
        Language::CSharp,
        owner,
        constant.fields.iter().map(|f| f.name.as_str()).zip(members.iter().cloned()),
    )?;

    let mut lines = vec![header, "{".to_string()];
    for (member, field) in members.iter().zip(&constant.fields) {
        lines.push(format!(
            "    public const {} {} = {};",
            type_name,
            member,
            literal(constant.type_, &field.value)
        ));
    }
    lines.push("}".to_string());
    Ok(lines)
}

/// Integral enums become a C# `enum` plus a `NameLookup` class. Other
/// underlying types have no C# enum form, so they become a static class of
/// constants carrying the same lookups.
fn generate_enum(enumeration: &Enum) -> Result<Vec<String>, IdlError> {
    let name = &enumeration.name;
    let integral = enumeration.type_.is_integer();
    let taken: &[&str] = if integral { &[] } else { &["IndexOf", "ValueAt"] };
    let members: Vec<String> = enumeration
        .values
        .iter()
        .map(|v| escape_csharp_keyword(&escape_member(&v.name, name, taken)))
        .collect();
    check_distinct(
        Language::CSharp,
        name,
        enumeration.values.iter().map(|v| v.name.as_str()).zip(members.iter().cloned()),
    )?;

    let mut lines = Vec::new();
    let (value_type, qualify) = if integral {
        lines.push(format!("public enum {} : {}", name, map_primitive(enumeration.type_)));
        lines.push("{".to_string());
        for (member, value) in members.iter().zip(&enumeration.values) {
            lines.push(format!(
                "    {} = {},",
                member,
                literal(enumeration.type_, &value.value)
            ));
        }
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push(format!("public static class {}Lookup", name));
        lines.push("{".to_string());
        (name.clone(), format!("{}.", name))
    } else {
        let value_type = map_primitive(enumeration.type_);
        lines.push(format!("public static class {}", name));
        lines.push("{".to_string());
        for (member, value) in members.iter().zip(&enumeration.values) {
            lines.push(format!(
                "    public const {} {} = {};",
                value_type,
                member,
                literal(enumeration.type_, &value.value)
            ));
        }
        lines.push(String::new());
        (value_type.to_string(), String::new())
    };

    // A bool enum declaring both values is exhaustive, and C# rejects an
    // unreachable discard arm.
    let exhaustive = enumeration.type_ == PrimitiveType::Bool && enumeration.values.len() == 2;

    lines.push(format!("    public static int IndexOf({} value)", value_type));
    lines.push("    {".to_string());
    lines.push("        return value switch".to_string());
    lines.push("        {".to_string());
    for (i, member) in members.iter().enumerate() {
        lines.push(format!("            {}{} => {},", qualify, member, i));
    }
    if !exhaustive {
        lines.push(format!(
            "            _ => throw new ArgumentOutOfRangeException(nameof(value), value, \"Unknown {} value\"),",
            name
        ));
    }
    lines.push("        };".to_string());
    lines.push("    }".to_string());
    lines.push(String::new());

    lines.push(format!("    public static {} ValueAt(int index)", value_type));
    lines.push("    {".to_string());
    lines.push("        return index switch".to_string());
    lines.push("        {".to_string());
    for (i, member) in members.iter().enumerate() {
        lines.push(format!("            {} => {}{},", i, qualify, member));
    }
    lines.push(format!(
        "            _ => throw new ArgumentOutOfRangeException(nameof(index), index, \"Index out of range for {}\"),",
        name
    ));
    lines.push("        };".to_string());
    lines.push("    }".to_string());
    lines.push("}".to_string());

    Ok(lines)
}

/// Properties are PascalCase with `JsonPropertyName` carrying the IDL name;
/// constructor parameters are the camelCase form so System.Text.Json can bind
/// them back to the properties on deserialization.
fn generate_object(
    object: &Object,
    enums: &HashMap<&str, PrimitiveType>,
) -> Result<Vec<String>, IdlError> {
    let name = &object.name;

    let mut members = Vec::new();
    for field in &object.fields {
        let context = format!("{}.{}", object.name, field.name);
        let pascal = to_pascal_case(&field.name);
        let property = escape_member(&pascal, name, &["ToJson", "FromJson"]);
        // The parameter has to match its property ignoring case.
        let mut param = to_camel_case(&field.name);
        if property != pascal {
            param.push('_');
        }
        members.push((
            property,
            escape_csharp_keyword(&param),
            map_type(&field.type_, &context, enums)?,
            &field.name,
        ));
    }
    check_distinct(
        Language::CSharp,
        name,
        members.iter().map(|m| (m.3.as_str(), m.0.clone())),
    )?;

    let mut lines = vec![format!("public class {}", name), "{".to_string()];
    for (property, _, type_name, json_name) in &members {
        lines.push(format!("    [JsonPropertyName({})]", quote(json_name)));
        lines.push(format!("    public {} {} {{ get; set; }}", type_name, property));
        lines.push(String::new());
    }

    lines.push("    [JsonConstructor]".to_string());
    lines.push(format!(
        "    public {}({})",
        name,
        members
            .iter()
            .map(|(_, param, type_name, _)| format!("{} {}", type_name, param))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push("    {".to_string());
    for (property, param, _, _) in &members {
        lines.push(format!("        {} = {};", property, param));
    }
    lines.push("    }".to_string());
    lines.push(String::new());

    lines.push("    public string ToJson()".to_string());
    lines.push("    {".to_string());
    lines.push("        return JsonSerializer.Serialize(this);".to_string());
    lines.push("    }".to_string());
    lines.push(String::new());

    lines.push(format!("    public static {} FromJson(string json)", name));
    lines.push("    {".to_string());
    lines.push(format!("        return JsonSerializer.Deserialize<{}>(json)", name));
    lines.push(format!(
        "            ?? throw new JsonException(\"Expected {} but found null\");",
        name
    ));
    lines.push("    }".to_string());
    lines.push("}".to_string());

    Ok(lines)
}
