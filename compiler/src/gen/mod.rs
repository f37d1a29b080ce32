//! Code generation backends.
//!
//! Every backend walks the `Grammar` once, in entry order, and returns the
//! finished source text. Nothing is written until rendering succeeded.

use std::{collections::HashMap, fmt, fs, path::Path, str::FromStr};

use crate::{error::IdlError, types::Grammar};

pub mod csharp;
pub mod dart;
pub mod go;
pub mod rust;
pub mod typescript;

pub use csharp::CSharpGenerator;
pub use dart::DartGenerator;
pub use go::GoGenerator;
pub use rust::RustGenerator;
pub use typescript::TypeScriptGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Go,
    CSharp,
    Dart,
    TypeScript,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Rust,
        Language::Go,
        Language::CSharp,
        Language::Dart,
        Language::TypeScript,
    ];

    /// The selector accepted on the command line.
    pub fn identifier(self) -> &'static str {
        match self {
            Language::Rust       => "rust",
            Language::Go         => "go",
            Language::CSharp     => "csharp",
            Language::Dart       => "dart",
            Language::TypeScript => "ts",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for Language {
    type Err = IdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.identifier() == s)
            .ok_or_else(|| IdlError::UnknownLanguage(s.to_string()))
    }
}

pub trait Generator {
    fn language(&self) -> Language;

    /// Renders the whole grammar, including any post pass.
    fn render(&self, grammar: &Grammar) -> Result<String, IdlError>;

    /// Renders `grammar` and writes it to `output`, replacing any existing
    /// file. The parent directory must already exist.
    fn generate(&self, output: &Path, grammar: &Grammar) -> Result<(), IdlError> {
        let source = self.render(grammar)?;
        fs::write(output, &source)?;
        log::info!(
            "wrote {} bytes of {} to {}",
            source.len(),
            self.language(),
            output.display()
        );
        Ok(())
    }
}

pub fn generator_for(language: Language) -> Box<dyn Generator> {
    match language {
        Language::Rust       => Box::new(RustGenerator),
        Language::Go         => Box::new(GoGenerator),
        Language::CSharp     => Box::new(CSharpGenerator),
        Language::Dart       => Box::new(DartGenerator),
        Language::TypeScript => Box::new(TypeScriptGenerator),
    }
}

pub(crate) fn unsupported(
    language: Language,
    type_name: impl Into<String>,
    context: impl Into<String>,
) -> IdlError {
    IdlError::UnsupportedType {
        language:  language.identifier(),
        type_name: type_name.into(),
        context:   context.into(),
    }
}

/// Fails when two IDL names of `owner` end up as the same identifier in the
/// target language. Takes `(idl_name, target_name)` pairs.
pub(crate) fn check_distinct<'a>(
    language: Language,
    owner: &str,
    names: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<(), IdlError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (idl_name, target) in names {
        if let Some(first) = seen.get(&target) {
            return Err(IdlError::NameCollision {
                language: language.identifier(),
                context:  format!("{}.{} and {}.{}", owner, first, owner, idl_name),
                name:     target,
            });
        }
        seen.insert(target, idl_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_selector_round_trip() {
        for language in Language::ALL {
            assert_eq!(language.identifier().parse::<Language>().unwrap(), language);
            assert_eq!(generator_for(language).language(), language);
        }
        assert!(matches!(
            "cobol".parse::<Language>(),
            Err(IdlError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_check_distinct() {
        let names = [("first_name", "FirstName".to_string()), ("age", "Age".to_string())];
        assert!(check_distinct(Language::Go, "A", names).is_ok());

        let names = [("first_name", "FirstName".to_string()), ("firstName", "FirstName".to_string())];
        match check_distinct(Language::Go, "A", names).unwrap_err() {
            IdlError::NameCollision { language, name, context } => {
                assert_eq!(language, "go");
                assert_eq!(name, "FirstName");
                assert_eq!(context, "A.first_name and A.firstName");
            }
            other => panic!("expected NameCollision but got {:?}", other),
        }
    }
}
