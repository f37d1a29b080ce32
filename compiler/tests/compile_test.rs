#![cfg(test)]

use std::fs;

use brine_idl_compiler::{
    compile_schema, compile_schema_to, generator_for,
    types::{Entry, PrimitiveType, PrimitiveValue, Type},
    IdlError, Language,
};
use rstest::rstest;

const PEOPLE: &str = r#"
    // People directory.
    package acme.people

    const LIMITS for int32 {
        MAX_FRIENDS = 100
        MIN_AGE = 0
    }

    enum CASE for uint8 {
        UPPER = 0
        LOWER = 1
    }

    object Person {
        string name
        int32 age
        list of string friends
        map uint32 for string properties
        CASE case
    }
"#;

#[test]
fn test_compile_schema() {
    let grammar = compile_schema(PEOPLE).expect("compile_schema failed");

    assert_eq!(grammar.package, vec!["acme", "people"]);
    assert_eq!(grammar.entries.len(), 3);

    match &grammar.entries[0] {
        Entry::Const(c) => {
            assert_eq!(c.name.as_deref(), Some("LIMITS"));
            assert_eq!(c.type_, PrimitiveType::Int32);
            assert_eq!(c.fields[0].name, "MAX_FRIENDS");
            assert_eq!(c.fields[0].value, PrimitiveValue::Int(100));
        }
        other => panic!("expected const, got {:?}", other),
    }

    match &grammar.entries[1] {
        Entry::Enum(e) => {
            assert_eq!(e.name, "CASE");
            assert_eq!(e.values.len(), 2);
            assert_eq!(e.values[1].name, "LOWER");
            assert_eq!(e.values[1].value, PrimitiveValue::Int(1));
        }
        other => panic!("expected enum, got {:?}", other),
    }

    match &grammar.entries[2] {
        Entry::Object(o) => {
            let names: Vec<&str> = o.fields.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(names, ["name", "age", "friends", "properties", "case"]);
            assert_eq!(o.fields[2].type_, Type::List(Box::new(Type::Primitive(PrimitiveType::String))));
            assert_eq!(o.fields[4].type_, Type::Identity("CASE".to_string()));
        }
        other => panic!("expected object, got {:?}", other),
    }
}

#[rstest]
#[case(Language::Rust)]
#[case(Language::Go)]
#[case(Language::CSharp)]
#[case(Language::Dart)]
#[case(Language::TypeScript)]
fn test_every_backend_renders_people(#[case] language: Language) {
    let code = compile_schema_to(language, PEOPLE).unwrap();
    assert!(code.contains("Person"), "{}", code);
    assert!(code.contains("LOWER"), "{}", code);
    assert!(code.contains("100"), "{}", code);
}

#[rstest]
#[case(Language::Rust)]
#[case(Language::Go)]
#[case(Language::CSharp)]
#[case(Language::Dart)]
#[case(Language::TypeScript)]
fn test_rendering_is_deterministic(#[case] language: Language) {
    let first = compile_schema_to(language, PEOPLE).unwrap();
    let second = compile_schema_to(language, PEOPLE).unwrap();
    assert_eq!(first, second);
}

/// Person members keep declaration order and carry their IDL names as JSON keys.
#[rstest]
#[case(Language::Rust, &["pub name: String", "pub age: i32", "pub friends: Vec<String>", "pub properties: HashMap<u32, String>"])]
#[case(Language::Go, &["`json:\"name\"`", "`json:\"age\"`", "`json:\"friends\"`", "`json:\"properties\"`"])]
#[case(Language::CSharp, &["[JsonPropertyName(\"name\")]", "[JsonPropertyName(\"age\")]", "[JsonPropertyName(\"friends\")]", "[JsonPropertyName(\"properties\")]"])]
#[case(Language::Dart, &["\"name\": name", "\"age\": age", "\"friends\": friends", "\"properties\": properties"])]
#[case(Language::TypeScript, &["name: string;", "age: number;", "friends: Array<string>;", "properties: Record<number, string>;"])]
fn test_member_order_and_json_names(#[case] language: Language, #[case] expected: &[&str]) {
    let code = compile_schema_to(language, PEOPLE).unwrap();
    let mut last = 0;
    for needle in expected {
        let at = code[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("{} missing {:?}:\n{}", language, needle, code));
        last += at + needle.len();
    }
}

#[rstest]
#[case(Language::Rust, "HashMap<u32, String>")]
#[case(Language::Go, "map[uint32]string")]
#[case(Language::CSharp, "Dictionary<uint, string>")]
#[case(Language::Dart, "Map<int, String>")]
#[case(Language::TypeScript, "Record<number, string>")]
fn test_uint32_map_rendering(#[case] language: Language, #[case] expected: &str) {
    let code = compile_schema_to(language, "object Dir { map uint32 for string names }").unwrap();
    assert!(code.contains(expected), "{}:\n{}", language, code);
}

#[rstest]
#[case(Language::Rust, "pub const BOUNDARY_MAX: i32 = 100;")]
#[case(Language::Go, "\tBOUNDARY_MAX int32 = 100\n")]
#[case(Language::CSharp, "    public const int MAX = 100;")]
#[case(Language::Dart, "const int BOUNDARY_MAX = 100;")]
#[case(Language::TypeScript, "export const BOUNDARY_MAX: number = 100;")]
fn test_boundary_const(#[case] language: Language, #[case] expected: &str) {
    let code = compile_schema_to(language, "const BOUNDARY for int32 { MAX = 100 MIN = 0 }").unwrap();
    assert!(code.contains(expected), "{}:\n{}", language, code);
}

#[rstest]
#[case(Language::Rust)]
#[case(Language::Go)]
#[case(Language::CSharp)]
#[case(Language::Dart)]
#[case(Language::TypeScript)]
fn test_float_map_key_is_unsupported(#[case] language: Language) {
    let err = compile_schema_to(language, "object Stats { map float64 for int32 counts }").unwrap_err();
    match err {
        IdlError::UnsupportedType { language: name, context, .. } => {
            assert_eq!(name, language.identifier());
            assert_eq!(context, "Stats.counts");
        }
        other => panic!("expected UnsupportedType, got {:?}", other),
    }
}

#[rstest]
#[case(Language::Rust)]
#[case(Language::Go)]
#[case(Language::CSharp)]
#[case(Language::Dart)]
#[case(Language::TypeScript)]
fn test_empty_schema_renders_header_only(#[case] language: Language) {
    let code = compile_schema_to(language, "   // nothing here\n").unwrap();
    assert!(!code.contains("Person"));
    assert!(code.ends_with('\n'));
    assert!(code.lines().next().unwrap().starts_with("//"));
}

#[test]
fn test_errors_stop_before_generation() {
    assert!(matches!(
        compile_schema_to(Language::Go, "object Person { string }"),
        Err(IdlError::ParseError { line: 1, .. })
    ));
    assert!(matches!(
        compile_schema_to(Language::Go, "const C for uint8 { BIG = 300 }"),
        Err(IdlError::InvalidValue { line: 1, .. })
    ));
    assert!(matches!(
        compile_schema_to(Language::Go, "object A { }\nobject A { }"),
        Err(IdlError::VerifierError(_))
    ));
}

#[test]
fn test_generate_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("people.go");
    fs::write(&output, "stale").unwrap();

    let grammar = compile_schema(PEOPLE).unwrap();
    generator_for(Language::Go).generate(&output, &grammar).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, generator_for(Language::Go).render(&grammar).unwrap());
    assert!(written.contains("package people\n"));
}

#[test]
fn test_generate_writes_nothing_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("flags.cs");

    let grammar = compile_schema("object Stats { map float64 for int32 counts }").unwrap();
    let err = generator_for(Language::CSharp).generate(&output, &grammar).unwrap_err();

    assert!(matches!(err, IdlError::UnsupportedType { .. }));
    assert!(!output.exists());
}

#[test]
fn test_generate_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("missing").join("people.rs");

    let grammar = compile_schema(PEOPLE).unwrap();
    assert!(matches!(
        generator_for(Language::Rust).generate(&output, &grammar),
        Err(IdlError::Io(_))
    ));
}

const DECK: &str = r#"
    enum Suit for string { HEARTS = "h" SPADES = "s" }
    enum Rank for uint8 { LOW = 1 HIGH = 2 }
    object Card { Suit suit Rank rank }
    object Deck {
        list of list of Card piles
        list of Suit suits
        list of Rank ranks
        map uint32 for float64 weights
    }
"#;

/// Nested lists, enums inside lists and integer-keyed maps, rendered whole.
#[rstest]
#[case(Language::Rust, &[
    concat!(
        "pub struct Deck {\n",
        "    pub piles: Vec<Vec<Card>>,\n",
        "    pub suits: Vec<Suit>,\n",
        "    pub ranks: Vec<Rank>,\n",
        "    pub weights: HashMap<u32, f64>,\n",
        "}\n",
    ),
    "    pub fn new(piles: Vec<Vec<Card>>, suits: Vec<Suit>, ranks: Vec<Rank>, weights: HashMap<u32, f64>) -> Self {\n",
])]
#[case(Language::Go, &[
    concat!(
        "type Deck struct {\n",
        "\tPiles   [][]Card           `json:\"piles\"`\n",
        "\tSuits   []Suit             `json:\"suits\"`\n",
        "\tRanks   []Rank             `json:\"ranks\"`\n",
        "\tWeights map[uint32]float64 `json:\"weights\"`\n",
        "}\n",
    ),
    concat!(
        "func NewDeck(piles [][]Card, suits []Suit, ranks []Rank, weights map[uint32]float64) *Deck {\n",
        "\treturn &Deck{\n",
        "\t\tPiles:   piles,\n",
        "\t\tSuits:   suits,\n",
        "\t\tRanks:   ranks,\n",
        "\t\tWeights: weights,\n",
        "\t}\n",
        "}\n",
    ),
])]
#[case(Language::CSharp, &[
    "    [JsonPropertyName(\"suits\")]\n    public List<string> Suits { get; set; }\n",
    concat!(
        "    [JsonConstructor]\n",
        "    public Deck(List<List<Card>> piles, List<string> suits, List<Rank> ranks, Dictionary<uint, double> weights)\n",
        "    {\n",
        "        Piles = piles;\n",
        "        Suits = suits;\n",
        "        Ranks = ranks;\n",
        "        Weights = weights;\n",
        "    }\n",
    ),
])]
#[case(Language::Dart, &[
    concat!(
        "  Map<String, dynamic> toMap() => {\n",
        "        \"piles\": piles.map((e0) => e0.map((e1) => e1.toMap()).toList()).toList(),\n",
        "        \"suits\": suits.map((e0) => e0.value).toList(),\n",
        "        \"ranks\": ranks.map((e0) => e0.value).toList(),\n",
        "        \"weights\": weights.map((k0, v0) => MapEntry(k0.toString(), v0)),\n",
        "      };\n",
    ),
    concat!(
        "  factory Deck.fromMap(Map<String, dynamic> map) => Deck(\n",
        "        (map[\"piles\"] as List).map((e0) => (e0 as List).map((e1) => Card.fromMap(e1 as Map<String, dynamic>)).toList()).toList(),\n",
        "        (map[\"suits\"] as List).map((e0) => Suit.fromValue(e0 as String)).toList(),\n",
        "        (map[\"ranks\"] as List).map((e0) => Rank.fromValue(e0 as int)).toList(),\n",
        "        (map[\"weights\"] as Map).map((k0, v0) => MapEntry(int.parse(k0 as String), (v0 as num).toDouble())),\n",
        "      );\n",
    ),
])]
#[case(Language::TypeScript, &[
    concat!(
        "  toObject(): any {\n",
        "    return {\n",
        "      \"piles\": this.piles.map((e0) => e0.map((e1) => e1.toObject())),\n",
        "      \"suits\": this.suits,\n",
        "      \"ranks\": this.ranks,\n",
        "      \"weights\": this.weights,\n",
        "    };\n",
        "  }\n",
    ),
    concat!(
        "  static fromObject(data: any): Deck {\n",
        "    return new Deck(\n",
        "      (data[\"piles\"] as any[]).map((e0: any) => (e0 as any[]).map((e1: any) => Card.fromObject(e1))),\n",
        "      data[\"suits\"],\n",
        "      data[\"ranks\"],\n",
        "      data[\"weights\"]\n",
        "    );\n",
        "  }\n",
    ),
])]
fn test_nested_deck_codecs(#[case] language: Language, #[case] expected: &[&str]) {
    let code = compile_schema_to(language, DECK).unwrap();
    for block in expected {
        assert!(code.contains(block), "{} missing:\n{}\nin:\n{}", language, block, code);
    }
}

/// Names that would clash with generated members get a trailing underscore.
#[rstest]
#[case(Language::Rust, "enum Kind for uint8 { ALL = 0 }", "    ALL_,\n")]
#[case(Language::CSharp, "object Name { string name }", "    public string Name_ { get; set; }\n")]
#[case(Language::Dart, "object Box { string to_map }", "  final String toMap_;\n")]
#[case(Language::TypeScript, "object Shape { string constructor }", "  constructor_: string;\n")]
fn test_members_avoid_generated_names(
    #[case] language: Language,
    #[case] schema: &str,
    #[case] expected: &str,
) {
    let code = compile_schema_to(language, schema).unwrap();
    assert!(code.contains(expected), "{}:\n{}", language, code);
}

#[rstest]
#[case(Language::Rust, "object A { string type string type_ }")]
#[case(Language::Go, "object A { string first_name string firstName }")]
#[case(Language::CSharp, "object A { string first_name string FirstName }")]
#[case(Language::Dart, "object A { string first_name string firstName }")]
#[case(Language::TypeScript, "object A { string constructor string constructor_ }")]
fn test_colliding_target_names_are_rejected(#[case] language: Language, #[case] schema: &str) {
    match compile_schema_to(language, schema).unwrap_err() {
        IdlError::NameCollision { language: name, context, .. } => {
            assert_eq!(name, language.identifier());
            assert!(context.starts_with("A."), "{}", context);
        }
        other => panic!("expected NameCollision, got {:?}", other),
    }
}

#[rstest]
#[case(Language::Rust, "pub const MAX: i32 = 100;")]
#[case(Language::Go, "\tMAX int32 = 100\n")]
#[case(Language::CSharp, "public static partial class Constants\n{\n    public const int MAX = 100;\n}")]
#[case(Language::Dart, "const int MAX = 100;")]
#[case(Language::TypeScript, "export const MAX: number = 100;")]
fn test_bare_const(#[case] language: Language, #[case] expected: &str) {
    let code = compile_schema_to(language, "const int32 { MAX = 100 }").unwrap();
    assert!(code.contains(expected), "{}:\n{}", language, code);
}

#[test]
fn test_string_enum_in_csharp() {
    let code = compile_schema_to(Language::CSharp, DECK).unwrap();
    assert!(code.contains("public static class Suit\n{\n    public const string HEARTS = \"h\";\n"));
    assert!(code.contains("public enum Rank : byte\n"));
    assert!(code.contains("    public string Suit { get; set; }\n"));
}
