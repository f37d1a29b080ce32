//! brine-idl-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for `.idl` schema files,
//!  2) A verifier (duplicate names, literal/type agreement, empty enums),
//!  3) Code generation for Rust, Go, C#, Dart and TypeScript behind the
//!     `Generator` trait,
//!  4) Error types (`IdlError`) and the `LookupError` used by generated Rust.

pub mod error;
pub mod types;
pub mod utils;
pub mod naming;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod compiler;
pub mod gen;

pub use compiler::compile_schema;
pub use compiler::compile_schema_to;
pub use error::{IdlError, LookupError};
pub use gen::rust::compile_schema_to_rust;
pub use gen::{generator_for, Generator, Language};
