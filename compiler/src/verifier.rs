use std::collections::HashSet;
use crate::{
    types::{Entry, Grammar, PrimitiveType, PrimitiveValue},
    utils::quote,
    error::IdlError,
};

/// Returns `Ok(())` if verification passed.
///
/// Checks are local to the file: literals must be representable by their
/// declared type, names must be unique within their scope, and enum values
/// must be distinct. Identity types are never resolved.
pub fn verify_schema(grammar: &Grammar) -> Result<(), IdlError> {
    // 1) Top-level names, including const bindings
    let mut defined: HashSet<String> = HashSet::new();
    for entry in &grammar.entries {
        let names: Vec<String> = match entry {
            Entry::Const(c) => c
                .name
                .iter()
                .cloned()
                .chain(c.fields.iter().map(|f| c.binding(f)))
                .collect(),
            other => other.name().map(str::to_string).into_iter().collect(),
        };
        for name in names {
            if defined.contains(&name) {
                return Err(IdlError::VerifierError(format!(
                    "The name {} is defined twice",
                    quote(&name)
                )));
            }
            defined.insert(name);
        }
    }

    // 2) Members and literals
    for entry in &grammar.entries {
        match entry {
            Entry::Const(c) => {
                check_unique(c.name.as_deref().unwrap_or("const"), c.fields.iter().map(|f| f.name.as_str()))?;
                for field in &c.fields {
                    check_literal(c.type_, &field.value, field.line, field.column)?;
                }
            }
            Entry::Enum(e) => {
                if e.values.is_empty() {
                    return Err(IdlError::VerifierError(format!(
                        "The enum {} declares no values",
                        quote(&e.name)
                    )));
                }
                check_unique(&e.name, e.values.iter().map(|v| v.name.as_str()))?;
                let mut seen: Vec<&PrimitiveValue> = Vec::new();
                for value in &e.values {
                    check_literal(e.type_, &value.value, value.line, value.column)?;
                    if seen.contains(&&value.value) {
                        return Err(IdlError::InvalidValue {
                            msg: format!(
                                "The value {} of {} is used twice",
                                value.value.display(),
                                quote(&e.name)
                            ),
                            line:   value.line,
                            column: value.column,
                        });
                    }
                    seen.push(&value.value);
                }
            }
            Entry::Object(o) => {
                check_unique(&o.name, o.fields.iter().map(|f| f.name.as_str()))?;
            }
        }
    }

    Ok(())
}

fn check_unique<'a>(owner: &str, names: impl Iterator<Item = &'a str>) -> Result<(), IdlError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(IdlError::VerifierError(format!(
                "The member {} of {} is defined twice",
                quote(name),
                quote(owner)
            )));
        }
    }
    Ok(())
}

fn check_literal(
    type_: PrimitiveType,
    value: &PrimitiveValue,
    line: usize,
    column: usize,
) -> Result<(), IdlError> {
    type_
        .check_value(value)
        .map_err(|msg| IdlError::InvalidValue { msg, line, column })
}
