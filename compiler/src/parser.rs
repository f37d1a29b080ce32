use crate::{
    tokenizer::Token,
    types::{
        Const, ConstField, Entry, Enum, EnumValue, Grammar, MapType, Object, ObjectField,
        PrimitiveType, PrimitiveValue, Type,
    },
    utils::{error, quote},
    error::IdlError,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER:      Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref EQUALS:          Regex = Regex::new(r"^=$").unwrap();
    static ref DOT:             Regex = Regex::new(r"^\.$").unwrap();
    static ref INTEGER:         Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref FLOAT:           Regex = Regex::new(r"^-?\d+(\.\d+)?([eE][+-]?\d+)?$").unwrap();
    static ref STRING:          Regex = Regex::new(r#"^".*"$"#).unwrap();
    static ref BOOLEAN:         Regex = Regex::new(r"^(true|false)$").unwrap();
    static ref LEFT_BRACE:      Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:     Regex = Regex::new(r"^\}$").unwrap();
    static ref CONST_KEYWORD:   Regex = Regex::new(r"^const$").unwrap();
    static ref ENUM_KEYWORD:    Regex = Regex::new(r"^enum$").unwrap();
    static ref OBJECT_KEYWORD:  Regex = Regex::new(r"^object$").unwrap();
    static ref PACKAGE_KEYWORD: Regex = Regex::new(r"^package$").unwrap();
    static ref FOR_KEYWORD:     Regex = Regex::new(r"^for$").unwrap();
    static ref LIST_KEYWORD:    Regex = Regex::new(r"^list$").unwrap();
    static ref OF_KEYWORD:      Regex = Regex::new(r"^of$").unwrap();
    static ref MAP_KEYWORD:     Regex = Regex::new(r"^map$").unwrap();
    static ref EOF:             Regex = Regex::new(r"^$").unwrap();
}

struct Cursor<'a> {
    tokens: &'a [Token],
    index:  usize,
}

impl<'a> Cursor<'a> {
    /// The tokenizer always appends an EOF token, and nothing consumes it, so
    /// clamping to the last token never hides real input.
    fn current(&self) -> &'a Token {
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn peek(&self, test: &Regex) -> bool {
        test.is_match(&self.current().text)
    }

    fn peek_next(&self, test: &Regex) -> bool {
        self.tokens
            .get(self.index + 1)
            .is_some_and(|tok| test.is_match(&tok.text))
    }

    fn eat(&mut self, test: &Regex) -> bool {
        if self.peek(test) && !self.at_eof() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn at_eof(&self) -> bool {
        EOF.is_match(&self.current().text)
    }

    fn expect(&mut self, test: &Regex, expected: &str) -> Result<&'a Token, IdlError> {
        let tok = self.current();
        if !self.eat(test) {
            return Err(error(
                &format!("Expected {} but found {}", expected, describe(tok)),
                tok.line,
                tok.column,
            ));
        }
        Ok(tok)
    }

    fn unexpected_token(&self) -> IdlError {
        let tok = self.current();
        error(
            &format!("Unexpected token {}", describe(tok)),
            tok.line,
            tok.column,
        )
    }
}

fn describe(tok: &Token) -> String {
    if tok.text.is_empty() {
        "end of file".to_string()
    } else {
        quote(&tok.text)
    }
}

/// Parses a token stream produced by `tokenize_schema`.
pub fn parse_schema(tokens: &[Token]) -> Result<Grammar, IdlError> {
    if tokens.is_empty() {
        return Err(error("Expected end of file token", 1, 1));
    }

    let mut cursor  = Cursor { tokens, index: 0 };
    let mut package = Vec::new();
    let mut entries = Vec::new();

    if cursor.eat(&PACKAGE_KEYWORD) {
        package.push(cursor.expect(&IDENTIFIER, "package name")?.text.clone());
        while cursor.eat(&DOT) {
            package.push(cursor.expect(&IDENTIFIER, "package name")?.text.clone());
        }
    }

    while !cursor.at_eof() {
        let entry = if cursor.eat(&CONST_KEYWORD) {
            Entry::Const(parse_const(&mut cursor)?)
        } else if cursor.eat(&ENUM_KEYWORD) {
            Entry::Enum(parse_enum(&mut cursor)?)
        } else if cursor.eat(&OBJECT_KEYWORD) {
            Entry::Object(parse_object(&mut cursor)?)
        } else {
            return Err(cursor.unexpected_token());
        };
        entries.push(entry);
    }

    log::debug!("parsed {} entries", entries.len());

    Ok(Grammar { package, entries })
}

/// Accepts both `const NAME for int32 { ... }` and the bare
/// `const int32 { ... }`.
fn parse_const(cursor: &mut Cursor) -> Result<Const, IdlError> {
    let name_tok = cursor.current();
    let bare = PrimitiveType::from_keyword(&name_tok.text).is_some()
        && cursor.peek_next(&LEFT_BRACE);
    let name = if bare {
        None
    } else {
        let tok = cursor.expect(&IDENTIFIER, "identifier")?;
        cursor.expect(&FOR_KEYWORD, "\"for\"")?;
        Some(tok.text.clone())
    };
    let type_ = parse_primitive_type(cursor)?;
    cursor.expect(&LEFT_BRACE, "\"{\"")?;

    let mut fields = Vec::new();
    while !cursor.eat(&RIGHT_BRACE) {
        let f_tok = cursor.expect(&IDENTIFIER, "identifier")?;
        cursor.expect(&EQUALS, "\"=\"")?;
        let value = parse_primitive_value(cursor)?;
        fields.push(ConstField {
            name:   f_tok.text.clone(),
            value,
            line:   f_tok.line,
            column: f_tok.column,
        });
    }

    Ok(Const {
        name,
        type_,
        fields,
        line:   name_tok.line,
        column: name_tok.column,
    })
}

fn parse_enum(cursor: &mut Cursor) -> Result<Enum, IdlError> {
    let name_tok = cursor.expect(&IDENTIFIER, "identifier")?;
    cursor.expect(&FOR_KEYWORD, "\"for\"")?;
    let type_ = parse_primitive_type(cursor)?;
    cursor.expect(&LEFT_BRACE, "\"{\"")?;

    let mut values = Vec::new();
    while !cursor.eat(&RIGHT_BRACE) {
        let v_tok = cursor.expect(&IDENTIFIER, "identifier")?;
        cursor.expect(&EQUALS, "\"=\"")?;
        let value = parse_primitive_value(cursor)?;
        values.push(EnumValue {
            name:   v_tok.text.clone(),
            value,
            line:   v_tok.line,
            column: v_tok.column,
        });
    }

    Ok(Enum {
        name:   name_tok.text.clone(),
        type_,
        values,
        line:   name_tok.line,
        column: name_tok.column,
    })
}

fn parse_object(cursor: &mut Cursor) -> Result<Object, IdlError> {
    let name_tok = cursor.expect(&IDENTIFIER, "identifier")?;
    cursor.expect(&LEFT_BRACE, "\"{\"")?;

    let mut fields = Vec::new();
    while !cursor.eat(&RIGHT_BRACE) {
        let type_ = parse_type(cursor)?;
        let f_tok = cursor.expect(&IDENTIFIER, "field name")?;
        fields.push(ObjectField {
            type_,
            name:   f_tok.text.clone(),
            line:   f_tok.line,
            column: f_tok.column,
        });
    }

    Ok(Object {
        name:   name_tok.text.clone(),
        fields,
        line:   name_tok.line,
        column: name_tok.column,
    })
}

fn parse_type(cursor: &mut Cursor) -> Result<Type, IdlError> {
    if let Some(p) = PrimitiveType::from_keyword(&cursor.current().text) {
        cursor.index += 1;
        return Ok(Type::Primitive(p));
    }
    if cursor.eat(&LIST_KEYWORD) {
        cursor.expect(&OF_KEYWORD, "\"of\"")?;
        let element = parse_type(cursor)?;
        return Ok(Type::List(Box::new(element)));
    }
    if cursor.eat(&MAP_KEYWORD) {
        let key = parse_primitive_type(cursor)?;
        cursor.expect(&FOR_KEYWORD, "\"for\"")?;
        let value = parse_primitive_type(cursor)?;
        return Ok(Type::Map(MapType { key, value }));
    }
    let tok = cursor.expect(&IDENTIFIER, "type")?;
    Ok(Type::Identity(tok.text.clone()))
}

fn parse_primitive_type(cursor: &mut Cursor) -> Result<PrimitiveType, IdlError> {
    let tok = cursor.current();
    match PrimitiveType::from_keyword(&tok.text) {
        Some(p) => {
            cursor.index += 1;
            Ok(p)
        }
        None => Err(error(
            &format!("Expected primitive type but found {}", describe(tok)),
            tok.line,
            tok.column,
        )),
    }
}

fn parse_primitive_value(cursor: &mut Cursor) -> Result<PrimitiveValue, IdlError> {
    let tok = cursor.current();
    let invalid = |kind: &str| {
        error(
            &format!("Invalid {} {}", kind, quote(&tok.text)),
            tok.line,
            tok.column,
        )
    };

    let value = if cursor.peek(&INTEGER) {
        PrimitiveValue::Int(tok.text.parse::<i64>().map_err(|_| invalid("integer"))?)
    } else if cursor.peek(&FLOAT) {
        PrimitiveValue::Float(tok.text.parse::<f64>().map_err(|_| invalid("float"))?)
    } else if cursor.peek(&STRING) {
        PrimitiveValue::String(serde_json::from_str::<String>(&tok.text).map_err(|_| invalid("string"))?)
    } else if cursor.peek(&BOOLEAN) {
        PrimitiveValue::Bool(tok.text == "true")
    } else {
        return Err(error(
            &format!("Expected value but found {}", describe(tok)),
            tok.line,
            tok.column,
        ));
    };

    cursor.index += 1;
    Ok(value)
}
