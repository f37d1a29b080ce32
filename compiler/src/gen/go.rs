use crate::{
    error::IdlError,
    gen::{check_distinct, unsupported, Generator, Language},
    naming::{to_camel_case, to_pascal_case},
    types::{Const, ConstField, Entry, Enum, Grammar, Object, PrimitiveType, PrimitiveValue, Type},
    utils::quote,
};

/// Package clause used when the IDL file declares no package.
pub const DEFAULT_PACKAGE: &str = "schema";

pub struct GoGenerator;

impl Generator for GoGenerator {
    fn language(&self) -> Language {
        Language::Go
    }

    fn render(&self, grammar: &Grammar) -> Result<String, IdlError> {
        let package = grammar
            .package
            .last()
            .map(String::as_str)
            .unwrap_or(DEFAULT_PACKAGE);
        let names = top_level_names(grammar);
        check_distinct(
            Language::Go,
            package,
            names.iter().map(|(idl, go)| (idl.as_str(), go.clone())),
        )?;

        let mut body = String::new();
        if uses_uint8_list(grammar) {
            body.push('\n');
            body.push_str(UINT8_LIST);
        }
        for entry in &grammar.entries {
            body.push('\n');
            match entry {
                Entry::Const(c)  => body.push_str(&generate_const(c)),
                Entry::Enum(e)   => body.push_str(&generate_enum(e)),
                Entry::Object(o) => body.push_str(&generate_object(o)?),
            }
        }

        let mut out = String::new();
        out.push_str("// Code generated by bidl. DO NOT EDIT.\n\n");
        out.push_str(&format!("package {}\n", package));
        out.push_str(&import_block(grammar));
        out.push_str(&body);
        Ok(out)
    }
}

/// `encoding/json` backs the object helpers and `fmt` the enum helpers.
fn import_block(grammar: &Grammar) -> String {
    let mut imports = Vec::new();
    if grammar.has_objects() {
        imports.push("encoding/json");
    }
    if grammar.has_enums() {
        imports.push("fmt");
    }

    match imports.len() {
        0 => String::new(),
        1 => format!("\nimport {}\n", quote(imports[0])),
        _ => {
            let lines: Vec<String> = imports.iter().map(|i| format!("\t{}\n", quote(i))).collect();
            format!("\nimport (\n{})\n", lines.concat())
        }
    }
}

/// `encoding/json` writes `[]uint8` as a base64 string; every other backend
/// writes a list of numbers.
const UINT8_LIST: &str = "\
// Uint8List encodes as a JSON array of numbers instead of base64.
type Uint8List []uint8

// MarshalJSON writes the list as an array of numbers.
func (l Uint8List) MarshalJSON() ([]byte, error) {
\tvalues := make([]uint16, len(l))
\tfor i, v := range l {
\t\tvalues[i] = uint16(v)
\t}
\treturn json.Marshal(values)
}
";

fn is_uint8_list(t: &Type) -> bool {
    match t {
        Type::List(inner) => {
            matches!(**inner, Type::Primitive(PrimitiveType::UInt8)) || is_uint8_list(inner)
        }
        _ => false,
    }
}

fn uses_uint8_list(grammar: &Grammar) -> bool {
    grammar.entries.iter().any(|e| match e {
        Entry::Object(o) => o.fields.iter().any(|f| is_uint8_list(&f.type_)),
        _ => false,
    })
}

fn const_binding(constant: &Const, field: &ConstField) -> String {
    match &constant.name {
        Some(name) => format!("{}_{}", to_pascal_case(name), field.name),
        None => field.name.clone(),
    }
}

/// Every package-level identifier the file declares, paired with the IDL
/// name it came from.
fn top_level_names(grammar: &Grammar) -> Vec<(String, String)> {
    let mut names = Vec::new();
    if uses_uint8_list(grammar) {
        names.push(("list of uint8".to_string(), "Uint8List".to_string()));
    }
    for entry in &grammar.entries {
        match entry {
            Entry::Const(c) => {
                for f in &c.fields {
                    names.push((c.binding(f), const_binding(c, f)));
                }
            }
            Entry::Enum(e) => {
                let name = to_pascal_case(&e.name);
                names.push((e.name.clone(), name.clone()));
                for v in &e.values {
                    names.push((format!("{}.{}", e.name, v.name), format!("{}_{}", name, v.name)));
                }
                names.push((e.name.clone(), format!("IndexOf{}", name)));
                names.push((e.name.clone(), format!("ValueAt{}", name)));
            }
            Entry::Object(o) => {
                let name = to_pascal_case(&o.name);
                names.push((o.name.clone(), name.clone()));
                names.push((o.name.clone(), format!("New{}", name)));
                names.push((o.name.clone(), format!("{}FromJSON", name)));
            }
        }
    }
    names
}

fn map_primitive(p: PrimitiveType) -> &'static str {
    // Go spells every IDL primitive the same way.
    p.keyword()
}

fn map_key(p: PrimitiveType, context: &str) -> Result<&'static str, IdlError> {
    if p.is_integer() || p == PrimitiveType::String {
        Ok(map_primitive(p))
    } else {
        Err(unsupported(Language::Go, format!("map key {}", p.keyword()), context))
    }
}

fn map_type(t: &Type, context: &str) -> Result<String, IdlError> {
    Ok(match t {
        Type::Primitive(p)   => map_primitive(*p).to_string(),
        Type::List(inner) if matches!(**inner, Type::Primitive(PrimitiveType::UInt8)) => {
            "Uint8List".to_string()
        }
        Type::List(inner)    => format!("[]{}", map_type(inner, context)?),
        Type::Map(m)         => format!("map[{}]{}", map_key(m.key, context)?, map_primitive(m.value)),
        Type::Identity(name) => to_pascal_case(name),
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

fn escape_go_keyword(s: &str) -> String {
    let keywords = [
        "break", "case", "chan", "const", "continue", "default", "defer",
        "else", "fallthrough", "for", "func", "go", "goto", "if", "import",
        "interface", "map", "package", "range", "return", "select", "struct",
        "switch", "type", "var",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Struct fields and methods share a namespace.
fn escape_go_member(s: &str) -> String {
    if s == "ToJSON" {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Pads the first column of each row so the second column lines up, the
/// way gofmt aligns consecutive lines.
fn align(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(a, _)| a.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(a, b)| format!("{:<width$} {}", a, b, width = width))
        .collect()
}

fn generate_const(constant: &Const) -> String {
    let type_name = map_primitive(constant.type_);
    let rows: Vec<(String, String)> = constant
        .fields
        .iter()
        .map(|f| {
            (
                const_binding(constant, f),
                format!("{} = {}", type_name, literal(constant.type_, &f.value)),
            )
        })
        .collect();

    let mut out = String::from("const (\n");
    for row in align(&rows) {
        out.push_str(&format!("\t{}\n", row));
    }
    out.push_str(")\n");
    out
}

fn generate_enum(enumeration: &Enum) -> String {
    let name = to_pascal_case(&enumeration.name);
    let base = map_primitive(enumeration.type_);
    let consts: Vec<String> = enumeration
        .values
        .iter()
        .map(|v| format!("{}_{}", name, v.name))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("type {} {}\n\n", name, base));

    let rows: Vec<(String, String)> = consts
        .iter()
        .zip(&enumeration.values)
        .map(|(c, v)| (c.clone(), format!("{} = {}", name, literal(enumeration.type_, &v.value))))
        .collect();
    out.push_str("const (\n");
    for row in align(&rows) {
        out.push_str(&format!("\t{}\n", row));
    }
    out.push_str(")\n\n");

    out.push_str("// String returns the declared name of the value.\n");
    out.push_str(&format!("func (e {}) String() string {{\n", name));
    out.push_str("\tswitch e {\n");
    for (c, v) in consts.iter().zip(&enumeration.values) {
        out.push_str(&format!("\tcase {}:\n\t\treturn {}\n", c, quote(&v.name)));
    }
    out.push_str("\tdefault:\n");
    out.push_str(&format!(
        "\t\treturn fmt.Sprintf(\"{}(%v)\", {}(e))\n",
        name, base
    ));
    out.push_str("\t}\n}\n\n");

    out.push_str(&format!(
        "// IndexOf{} returns the declaration index of value.\n",
        name
    ));
    out.push_str(&format!("func IndexOf{}(value {}) (int, error) {{\n", name, name));
    out.push_str("\tswitch value {\n");
    for (i, c) in consts.iter().enumerate() {
        out.push_str(&format!("\tcase {}:\n\t\treturn {}, nil\n", c, i));
    }
    out.push_str("\tdefault:\n");
    out.push_str(&format!(
        "\t\treturn -1, fmt.Errorf(\"{}: unknown value %v\", {}(value))\n",
        name, base
    ));
    out.push_str("\t}\n}\n\n");

    out.push_str(&format!(
        "// ValueAt{} returns the value declared at index.\n",
        name
    ));
    out.push_str(&format!("func ValueAt{}(index int) ({}, error) {{\n", name, name));
    out.push_str("\tswitch index {\n");
    for (i, c) in consts.iter().enumerate() {
        out.push_str(&format!("\tcase {}:\n\t\treturn {}, nil\n", i, c));
    }
    out.push_str("\tdefault:\n");
    out.push_str(&format!("\t\tvar zero {}\n", name));
    out.push_str(&format!(
        "\t\treturn zero, fmt.Errorf(\"{}: index %d out of range\", index)\n",
        name
    ));
    out.push_str("\t}\n}\n");

    out
}

fn generate_object(object: &Object) -> Result<String, IdlError> {
    let name = to_pascal_case(&object.name);

    let mut members = Vec::new();
    for field in &object.fields {
        let context = format!("{}.{}", object.name, field.name);
        members.push((
            escape_go_member(&to_pascal_case(&field.name)),
            escape_go_keyword(&to_camel_case(&field.name)),
            map_type(&field.type_, &context)?,
            &field.name,
        ));
    }
    check_distinct(
        Language::Go,
        &object.name,
        members.iter().map(|m| (m.3.as_str(), m.0.clone())),
    )?;
    check_distinct(
        Language::Go,
        &object.name,
        members.iter().map(|m| (m.3.as_str(), m.1.clone())),
    )?;

    let mut out = String::new();

    out.push_str(&format!("type {} struct {{\n", name));
    let name_width = members.iter().map(|m| m.0.len()).max().unwrap_or(0);
    let type_width = members.iter().map(|m| m.2.len()).max().unwrap_or(0);
    for (member, _, type_name, json_name) in &members {
        out.push_str(&format!(
            "\t{:<nw$} {:<tw$} `json:{}`\n",
            member,
            type_name,
            quote(json_name),
            nw = name_width,
            tw = type_width
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "// New{} returns a {} built from its fields in declaration order.\n",
        name, name
    ));
    out.push_str(&format!(
        "func New{}({}) *{} {{\n",
        name,
        members
            .iter()
            .map(|(_, param, type_name, _)| format!("{} {}", param, type_name))
            .collect::<Vec<_>>()
            .join(", "),
        name
    ));
    if members.is_empty() {
        out.push_str(&format!("\treturn &{}{{}}\n", name));
    } else {
        out.push_str(&format!("\treturn &{}{{\n", name));
        let rows: Vec<(String, String)> = members
            .iter()
            .map(|(member, param, _, _)| (format!("{}:", member), format!("{},", param)))
            .collect();
        for row in align(&rows) {
            out.push_str(&format!("\t\t{}\n", row));
        }
        out.push_str("\t}\n");
    }
    out.push_str("}\n\n");

    out.push_str("// ToJSON encodes the value with the IDL field names as keys.\n");
    out.push_str(&format!("func (o *{}) ToJSON() (string, error) {{\n", name));
    out.push_str("\tdata, err := json.Marshal(o)\n");
    out.push_str("\tif err != nil {\n\t\treturn \"\", err\n\t}\n");
    out.push_str("\treturn string(data), nil\n");
    out.push_str("}\n\n");

    out.push_str(&format!("// {}FromJSON decodes a {} produced by ToJSON.\n", name, name));
    out.push_str(&format!("func {}FromJSON(data string) (*{}, error) {{\n", name, name));
    out.push_str(&format!("\tvar o {}\n", name));
    out.push_str("\tif err := json.Unmarshal([]byte(data), &o); err != nil {\n\t\treturn nil, err\n\t}\n");
    out.push_str("\treturn &o, nil\n");
    out.push_str("}\n");

    Ok(out)
}
