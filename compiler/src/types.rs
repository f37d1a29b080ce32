use std::collections::HashMap;
use serde::Serialize;

/// A parsed IDL file. Entry order is the order of the generated output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grammar {
    /// Dotted package declaration, empty when the file has none.
    pub package: Vec<String>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Entry {
    Const(Const),
    Enum(Enum),
    Object(Object),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PrimitiveValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapType {
    pub key:   PrimitiveType,
    pub value: PrimitiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Type {
    Primitive(PrimitiveType),
    List(Box<Type>),
    Map(MapType),
    /// Bare name of another object or enum, never resolved.
    Identity(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstField {
    pub name:   String,
    pub value:  PrimitiveValue,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Const {
    /// `None` for the bare `const int32 { ... }` form, whose bindings are
    /// not prefixed.
    pub name:   Option<String>,
    pub type_:  PrimitiveType,
    pub fields: Vec<ConstField>,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name:   String,
    pub value:  PrimitiveValue,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name:   String,
    pub type_:  PrimitiveType,
    pub values: Vec<EnumValue>,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectField {
    pub type_:  Type,
    pub name:   String,
    pub line:   usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub name:   String,
    pub fields: Vec<ObjectField>,
    pub line:   usize,
    pub column: usize,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 12] = [
        PrimitiveType::Int8,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::UInt8,
        PrimitiveType::UInt16,
        PrimitiveType::UInt32,
        PrimitiveType::UInt64,
        PrimitiveType::Float32,
        PrimitiveType::Float64,
        PrimitiveType::String,
        PrimitiveType::Bool,
    ];

    pub fn from_keyword(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.keyword() == text)
    }

    /// The IDL spelling of this type.
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Int8    => "int8",
            PrimitiveType::Int16   => "int16",
            PrimitiveType::Int32   => "int32",
            PrimitiveType::Int64   => "int64",
            PrimitiveType::UInt8   => "uint8",
            PrimitiveType::UInt16  => "uint16",
            PrimitiveType::UInt32  => "uint32",
            PrimitiveType::UInt64  => "uint64",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::String  => "string",
            PrimitiveType::Bool    => "bool",
        }
    }

    pub fn is_integer(self) -> bool {
        self.integer_range().is_some()
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveType::Float32 | PrimitiveType::Float64)
    }

    /// Inclusive bounds of the integer types, as `i128` so `uint64` fits.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            PrimitiveType::Int8   => Some((i8::MIN as i128, i8::MAX as i128)),
            PrimitiveType::Int16  => Some((i16::MIN as i128, i16::MAX as i128)),
            PrimitiveType::Int32  => Some((i32::MIN as i128, i32::MAX as i128)),
            PrimitiveType::Int64  => Some((i64::MIN as i128, i64::MAX as i128)),
            PrimitiveType::UInt8  => Some((0, u8::MAX as i128)),
            PrimitiveType::UInt16 => Some((0, u16::MAX as i128)),
            PrimitiveType::UInt32 => Some((0, u32::MAX as i128)),
            PrimitiveType::UInt64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Checks that `value` is representable by this type. Integer literals
    /// are accepted by the float types; nothing else converts implicitly.
    pub fn check_value(self, value: &PrimitiveValue) -> Result<(), String> {
        match (self, value) {
            (_, PrimitiveValue::Int(i)) if self.is_integer() => {
                let (min, max) = self.integer_range().unwrap_or((0, 0));
                let i = *i as i128;
                if i < min || i > max {
                    Err(format!("{} does not fit in {}", i, self.keyword()))
                } else {
                    Ok(())
                }
            }
            (_, PrimitiveValue::Int(_) | PrimitiveValue::Float(_)) if self.is_float() => {
                let f = value.as_f64().unwrap_or_default();
                let max = if self == PrimitiveType::Float32 { f32::MAX as f64 } else { f64::MAX };
                if !f.is_finite() || f.abs() > max {
                    Err(format!("{} does not fit in {}", f, self.keyword()))
                } else {
                    Ok(())
                }
            }
            (PrimitiveType::String, PrimitiveValue::String(_)) => Ok(()),
            (PrimitiveType::Bool, PrimitiveValue::Bool(_)) => Ok(()),
            _ => Err(format!(
                "{} literal cannot be used as {}",
                value.kind(),
                self.keyword()
            )),
        }
    }
}

impl PrimitiveValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PrimitiveValue::Int(_)    => "integer",
            PrimitiveValue::Float(_)  => "float",
            PrimitiveValue::String(_) => "string",
            PrimitiveValue::Bool(_)   => "bool",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrimitiveValue::Int(i)   => Some(*i as f64),
            PrimitiveValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Float text that always reads as a float literal (`100` -> `100.0`).
    pub fn float_text(&self) -> Option<String> {
        match self {
            PrimitiveValue::Int(i)   => Some(format!("{}.0", i)),
            PrimitiveValue::Float(f) => Some(format!("{:?}", f)),
            _ => None,
        }
    }

    /// Value text used in diagnostics.
    pub fn display(&self) -> String {
        match self {
            PrimitiveValue::Int(i)    => i.to_string(),
            PrimitiveValue::Float(f)  => format!("{:?}", f),
            PrimitiveValue::String(s) => crate::utils::quote(s),
            PrimitiveValue::Bool(b)   => b.to_string(),
        }
    }
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Type::Map(_))
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Type::Identity(_))
    }

    /// IDL spelling, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Type::Primitive(p) => p.keyword().to_string(),
            Type::List(inner)  => format!("list of {}", inner.describe()),
            Type::Map(m)       => format!("map {} for {}", m.key.keyword(), m.value.keyword()),
            Type::Identity(n)  => n.clone(),
        }
    }

    fn contains_map(&self) -> bool {
        match self {
            Type::Map(_)      => true,
            Type::List(inner) => inner.contains_map(),
            _ => false,
        }
    }
}

impl Const {
    /// Top-level binding for `field`: `NAME_FIELD`, or `FIELD` when the
    /// const is unnamed.
    pub fn binding(&self, field: &ConstField) -> String {
        match &self.name {
            Some(name) => format!("{}_{}", name, field.name),
            None => field.name.clone(),
        }
    }
}

impl Entry {
    pub fn name(&self) -> Option<&str> {
        match self {
            Entry::Const(c)  => c.name.as_deref(),
            Entry::Enum(e)   => Some(&e.name),
            Entry::Object(o) => Some(&o.name),
        }
    }
}

impl Grammar {
    /// Underlying types of the enums declared in this file. Backends use it
    /// to pick a decode strategy for identity fields; names missing from the
    /// map are treated as objects.
    pub fn enum_types(&self) -> HashMap<&str, PrimitiveType> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Enum(en) => Some((en.name.as_str(), en.type_)),
                _ => None,
            })
            .collect()
    }

    pub fn has_enums(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, Entry::Enum(_)))
    }

    pub fn has_objects(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, Entry::Object(_)))
    }

    pub fn uses_maps(&self) -> bool {
        self.entries.iter().any(|e| match e {
            Entry::Object(o) => o.fields.iter().any(|f| f.type_.contains_map()),
            _ => false,
        })
    }
}
