use std::collections::HashMap;

use crate::{
    error::IdlError,
    gen::{check_distinct, unsupported, Generator, Language},
    types::{Const, Entry, Enum, Grammar, Object, PrimitiveType, PrimitiveValue, Type},
    utils::quote,
};

pub struct TypeScriptGenerator;

impl Generator for TypeScriptGenerator {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn render(&self, grammar: &Grammar) -> Result<String, IdlError> {
        let enums = grammar.enum_types();

        let mut body: Vec<String> = Vec::new();
        for entry in &grammar.entries {
            if !body.is_empty() {
                body.push(String::new());
            }
            body.extend(match entry {
                Entry::Const(c)  => generate_const(c),
                Entry::Enum(e)   => generate_enum(e)?,
                Entry::Object(o) => generate_object(o, &enums)?,
            });
        }

        // Innermost namespace first, each one wrapping the lines so far.
        for name in grammar.package.iter().rev() {
            let mut wrapped = vec![format!("export namespace {} {{", name)];
            wrapped.extend(body.iter().map(|l| indent(l)));
            wrapped.push("}".to_string());
            body = wrapped;
        }

        let mut lines = vec!["// Code generated by bidl. DO NOT EDIT.".to_string()];
        if !body.is_empty() {
            lines.push(String::new());
            lines.extend(body);
        }

        Ok(lines.join("\n") + "\n")
    }
}

fn indent(line: &str) -> String {
    if line.is_empty() {
        String::new()
    } else {
        format!("  {}", line)
    }
}

fn map_primitive(p: PrimitiveType) -> &'static str {
    match p {
        PrimitiveType::String => "string",
        PrimitiveType::Bool   => "boolean",
        _ => "number",
    }
}

fn map_key(p: PrimitiveType, context: &str) -> Result<&'static str, IdlError> {
    if p.is_integer() || p == PrimitiveType::String {
        Ok(map_primitive(p))
    } else {
        Err(unsupported(Language::TypeScript, format!("map key {}", p.keyword()), context))
    }
}

fn map_type(t: &Type, context: &str) -> Result<String, IdlError> {
    Ok(match t {
        Type::Primitive(p)   => map_primitive(*p).to_string(),
        Type::List(inner)    => format!("Array<{}>", map_type(inner, context)?),
        Type::Map(m)         => format!("Record<{}, {}>", map_key(m.key, context)?, map_primitive(m.value)),
        Type::Identity(name) => name.clone(),
    })
}

fn literal(p: PrimitiveType, value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::String(s) => quote(s),
        PrimitiveValue::Bool(b)   => b.to_string(),
        PrimitiveValue::Int(i) if !p.is_float() => i.to_string(),
        _ => value.float_text().unwrap_or_default(),
    }
}

fn escape_ts_keyword(s: &str) -> String {
    let keywords = [
        "await", "break", "case", "catch", "class", "const", "continue",
        "debugger", "default", "delete", "do", "else", "enum", "export",
        "extends", "false", "finally", "for", "function", "if", "implements",
        "import", "in", "instanceof", "interface", "let", "new", "null",
        "package", "private", "protected", "public", "return", "static",
        "super", "switch", "this", "throw", "true", "try", "typeof", "var",
        "void", "while", "with", "yield",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Instance members every generated class declares. `constructor` cannot
/// name a field at all.
fn escape_member(s: &str) -> String {
    if ["constructor", "toJson", "toObject"].contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

fn generate_const(constant: &Const) -> Vec<String> {
    let type_name = map_primitive(constant.type_);
    constant
        .fields
        .iter()
        .map(|f| {
            format!(
                "export const {}: {} = {};",
                escape_ts_keyword(&constant.binding(f)),
                type_name,
                literal(constant.type_, &f.value)
            )
        })
        .collect()
}

/// TypeScript enum members are numeric or string valued only.
fn generate_enum(enumeration: &Enum) -> Result<Vec<String>, IdlError> {
    if enumeration.type_ == PrimitiveType::Bool {
        return Err(unsupported(
            Language::TypeScript,
            enumeration.type_.keyword(),
            format!("enum {}", enumeration.name),
        ));
    }

    let name = &enumeration.name;
    let mut lines = vec![format!("export enum {} {{", name)];
    for value in &enumeration.values {
        lines.push(format!(
            "  {} = {},",
            value.name,
            literal(enumeration.type_, &value.value)
        ));
    }
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!("export function indexOf{}(value: {}): number {{", name, name));
    lines.push("  switch (value) {".to_string());
    for (i, value) in enumeration.values.iter().enumerate() {
        lines.push(format!("    case {}.{}:", name, value.name));
        lines.push(format!("      return {};", i));
    }
    lines.push("    default:".to_string());
    lines.push(format!(
        "      throw new RangeError(\"Unknown {} value: \" + String(value));",
        name
    ));
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.push(String::new());

    lines.push(format!("export function valueAt{}(index: number): {} {{", name, name));
    lines.push("  switch (index) {".to_string());
    for (i, value) in enumeration.values.iter().enumerate() {
        lines.push(format!("    case {}:", i));
        lines.push(format!("      return {}.{};", name, value.name));
    }
    lines.push("    default:".to_string());
    lines.push(format!(
        "      throw new RangeError(\"Index out of range for {}: \" + index);",
        name
    ));
    lines.push("  }".to_string());
    lines.push("}".to_string());

    Ok(lines)
}

/// Expression turning the class value `expr` into a plain object keyed by IDL
/// names.
fn encode(t: &Type, expr: &str, depth: usize, enums: &HashMap<&str, PrimitiveType>) -> String {
    match t {
        Type::Primitive(_) | Type::Map(_) => expr.to_string(),
        Type::Identity(name) if enums.contains_key(name.as_str()) => expr.to_string(),
        Type::Identity(_) => format!("{}.toObject()", expr),
        Type::List(inner) => {
            let var = format!("e{}", depth);
            let inner_expr = encode(inner, &var, depth + 1, enums);
            if inner_expr == var {
                expr.to_string()
            } else {
                format!("{}.map(({}) => {})", expr, var, inner_expr)
            }
        }
    }
}

/// Expression rebuilding a typed value from parsed JSON, or `None` when the
/// parsed value can be used as is.
fn decode(t: &Type, expr: &str, depth: usize, enums: &HashMap<&str, PrimitiveType>) -> Option<String> {
    match t {
        Type::Primitive(_) | Type::Map(_) => None,
        Type::Identity(name) if enums.contains_key(name.as_str()) => None,
        Type::Identity(name) => Some(format!("{}.fromObject({})", name, expr)),
        Type::List(inner) => {
            let var = format!("e{}", depth);
            decode(inner, &var, depth + 1, enums)
                .map(|inner_expr| format!("({} as any[]).map(({}: any) => {})", expr, var, inner_expr))
        }
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
        let member = escape_member(&field.name);
        members.push((
            escape_ts_keyword(&member),
            member,
            map_type(&field.type_, &context)?,
            field,
        ));
    }
    check_distinct(
        Language::TypeScript,
        name,
        members.iter().map(|(_, member, _, field)| (field.name.as_str(), member.clone())),
    )?;
    check_distinct(
        Language::TypeScript,
        name,
        members.iter().map(|(param, _, _, field)| (field.name.as_str(), param.clone())),
    )?;

    let mut lines = vec![format!("export class {} {{", name)];
    for (_, member, type_name, _) in &members {
        lines.push(format!("  {}: {};", member, type_name));
    }
    if !members.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!(
        "  constructor({}) {{",
        members
            .iter()
            .map(|(param, _, type_name, _)| format!("{}: {}", param, type_name))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    for (param, member, _, _) in &members {
        lines.push(format!("    this.{} = {};", member, param));
    }
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  toObject(): any {".to_string());
    if members.is_empty() {
        lines.push("    return {};".to_string());
    } else {
        lines.push("    return {".to_string());
        for (_, member, _, field) in &members {
            let value = encode(&field.type_, &format!("this.{}", member), 0, enums);
            lines.push(format!("      {}: {},", quote(&field.name), value));
        }
        lines.push("    };".to_string());
    }
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push("  toJson(): string {".to_string());
    lines.push("    return JSON.stringify(this.toObject());".to_string());
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push(format!("  static fromJson(json: string): {} {{", name));
    lines.push(format!("    return {}.fromObject(JSON.parse(json));", name));
    lines.push("  }".to_string());
    lines.push(String::new());

    lines.push(format!("  static fromObject(data: any): {} {{", name));
    if members.is_empty() {
        lines.push(format!("    return new {}();", name));
    } else {
        lines.push(format!("    return new {}(", name));
        let count = members.len();
        for (i, (_, _, _, field)) in members.iter().enumerate() {
            let source = format!("data[{}]", quote(&field.name));
            let value = decode(&field.type_, &source, 0, enums).unwrap_or(source);
            lines.push(format!("      {}{}", value, if i + 1 == count { "" } else { "," }));
        }
        lines.push("    );".to_string());
    }
    lines.push("  }".to_string());
    lines.push("}".to_string());

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_schema;

    fn render(input: &str) -> Result<String, IdlError> {
        TypeScriptGenerator.render(&compile_schema(input).unwrap())
    }

    #[test]
    fn test_person_class() {
        let code = render(
            "object Person { string name int32 age list of string friends map uint32 for string properties }",
        )
        .unwrap();
        assert!(code.contains(
            "export class Person {\n  name: string;\n  age: number;\n  friends: Array<string>;\n  properties: Record<number, string>;\n"
        ));
        assert!(code.contains(
            "  constructor(name: string, age: number, friends: Array<string>, properties: Record<number, string>) {"
        ));
        assert!(code.contains("    this.friends = friends;\n"));
        assert!(code.contains("      data[\"name\"],\n"));
        assert!(code.contains("      data[\"properties\"]\n    );"));
    }

    #[test]
    fn test_nested_objects_are_rebuilt() {
        let code = render(
            "enum Suit for string { HEARTS = \"h\" }\nobject Card { Suit suit }\nobject Hand { list of Card cards Card best bool delete }",
        )
        .unwrap();
        assert!(code.contains("      (data[\"cards\"] as any[]).map((e0: any) => Card.fromObject(e0)),\n"));
        assert!(code.contains("      Card.fromObject(data[\"best\"]),\n"));
        assert!(code.contains("      data[\"suit\"]\n"));
        assert!(code.contains("  delete: boolean;"));
        assert!(code.contains("    this.delete = delete_;"));
    }

    #[test]
    fn test_members_avoid_class_methods() {
        let code = render("object Shape { string constructor int32 toJson string area }").unwrap();
        assert!(code.contains("  constructor_: string;\n  toJson_: number;\n  area: string;\n"));
        assert!(code.contains("  constructor(constructor_: string, toJson_: number, area: string) {"));
        assert!(code.contains("    this.constructor_ = constructor_;\n"));
        assert!(code.contains(
            "  toObject(): any {\n    return {\n      \"constructor\": this.constructor_,\n      \"toJson\": this.toJson_,\n      \"area\": this.area,\n    };\n  }"
        ));
        assert!(code.contains("    return JSON.stringify(this.toObject());"));
        assert!(code.contains("      data[\"constructor\"],\n"));
    }

    #[test]
    fn test_colliding_members_are_rejected() {
        let err = render("object Shape { string constructor string constructor_ }").unwrap_err();
        match err {
            IdlError::NameCollision { language, name, context } => {
                assert_eq!(language, "ts");
                assert_eq!(name, "constructor_");
                assert_eq!(context, "Shape.constructor and Shape.constructor_");
            }
            other => panic!("expected NameCollision, got {:?}", other),
        }

        let err = render("object Op { bool delete bool delete_ }").unwrap_err();
        assert!(matches!(err, IdlError::NameCollision { .. }));
    }

    #[test]
    fn test_bare_const() {
        let code = render("const int32 { MAX = 100 }").unwrap();
        assert!(code.contains("export const MAX: number = 100;"));
    }

    #[test]
    fn test_case_enum() {
        let code = render("enum CASE for uint8 { UPPER = 0 LOWER = 1 }").unwrap();
        assert!(code.contains("export enum CASE {\n  UPPER = 0,\n  LOWER = 1,\n}"));
        assert!(code.contains("export function indexOfCASE(value: CASE): number {"));
        assert!(code.contains("    case CASE.LOWER:\n      return 1;"));
        assert!(code.contains("    case 1:\n      return CASE.LOWER;"));
        assert!(code.contains("throw new RangeError(\"Index out of range for CASE: \" + index);"));
    }

    #[test]
    fn test_bool_enum_is_unsupported() {
        let err = render("enum Flag for bool { ON = true }").unwrap_err();
        assert!(matches!(err, IdlError::UnsupportedType { language: "ts", .. }));
    }

    #[test]
    fn test_float_key_is_unsupported() {
        let err = render("object Stats { map float64 for string labels }").unwrap_err();
        match err {
            IdlError::UnsupportedType { type_name, context, .. } => {
                assert_eq!(type_name, "map key float64");
                assert_eq!(context, "Stats.labels");
            }
            other => panic!("expected UnsupportedType but got {:?}", other),
        }
    }

    #[test]
    fn test_boundary_const_in_namespace() {
        let code = render("package acme.limits\nconst BOUNDARY for int32 { MAX = 100 MIN = 0 }").unwrap();
        assert_eq!(
            code,
            "// Code generated by bidl. DO NOT EDIT.\n\n\
             export namespace acme {\n  \
             export namespace limits {\n    \
             export const BOUNDARY_MAX: number = 100;\n    \
             export const BOUNDARY_MIN: number = 0;\n  \
             }\n\
             }\n"
        );
    }

    #[test]
    fn test_empty_grammar() {
        assert_eq!(render("").unwrap(), "// Code generated by bidl. DO NOT EDIT.\n");
    }
}
