use crate::error::IdlError;

/// JSON-style double-quoted rendering of `text`, used in diagnostics and as
/// the string literal syntax of the C-family backends.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{:?}", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> IdlError {
    IdlError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}
