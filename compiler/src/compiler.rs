use crate::{
    types::Grammar,
    verifier::verify_schema,
    tokenizer::tokenize_schema,
    parser::parse_schema,
    gen::{generator_for, Language},
    error::IdlError,
};

/// Compile IDL text into a verified `Grammar`.
/// Returns `Err(IdlError)` if tokenization/parsing/verification fails.
pub fn compile_schema(text: &str) -> Result<Grammar, IdlError> {
    let tokens = tokenize_schema(text)?;
    let grammar = parse_schema(&tokens)?;
    verify_schema(&grammar)?;
    Ok(grammar)
}

/// Compile IDL text straight to `language` source.
pub fn compile_schema_to(language: Language, text: &str) -> Result<String, IdlError> {
    let grammar = compile_schema(text)?;
    generator_for(language).render(&grammar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_schema_verifies() {
        assert!(compile_schema("const C for bool { A = 1 }").is_err());
        assert!(compile_schema("const C for bool { A = true }").is_ok());
    }

    #[test]
    fn test_compile_schema_to_every_language() {
        for language in Language::ALL {
            let out = compile_schema_to(language, "object Point { float64 x float64 y }").unwrap();
            assert!(out.contains("Point"), "{}: {}", language, out);
        }
    }
}
