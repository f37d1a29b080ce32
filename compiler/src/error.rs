use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Invalid value at line {line}, column {column}: {msg}")]
    InvalidValue {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Verifier error: {0}")]
    VerifierError(String),

    #[error("Unsupported type {type_name} in {context} for {language}")]
    UnsupportedType {
        language:  &'static str,
        type_name: String,
        context:   String,
    },

    #[error("{name} is generated twice from {context} for {language}")]
    NameCollision {
        language: &'static str,
        name:     String,
        context:  String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown language \"{0}\" (expected one of: rust, go, csharp, dart, ts)")]
    UnknownLanguage(String),
}

/// Raised by the enum helpers in generated Rust code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{enum_name}: index {index} is out of range")]
    Index {
        enum_name: &'static str,
        index:     usize,
    },

    #[error("{enum_name}: {value} is not a declared value")]
    Value {
        enum_name: &'static str,
        value:     String,
    },
}
