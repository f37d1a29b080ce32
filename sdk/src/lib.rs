//! brine-idl
//!
//! Runtime support for code generated by the Brine IDL compiler.
//!
//! - `LookupError` (re-exported from compiler), returned by the enum helpers
//!   in generated Rust code
//! - `schema_to_json` for inspecting a parsed schema

pub use brine_idl_compiler::error::{IdlError, LookupError};
pub use brine_idl_compiler::types::Grammar;
pub use brine_idl_compiler::{compile_schema, compile_schema_to, Language};

/// Compile IDL text and render the verified AST as pretty-printed JSON.
pub fn schema_to_json(text: &str) -> Result<String, IdlError> {
    let grammar = compile_schema(text)?;
    Ok(serde_json::to_string_pretty(&grammar)?)
}

pub mod error {
    pub use brine_idl_compiler::error::{IdlError, LookupError};
}

pub mod schema {
    pub use brine_idl_compiler::types::{
        Const, ConstField, Entry, Enum, EnumValue, Grammar, MapType, Object, ObjectField,
        PrimitiveType, PrimitiveValue, Type,
    };
}
