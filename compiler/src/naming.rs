//! snake_case identifier transforms for backends whose conventions differ
//! from the IDL's.

/// `first_name` -> `FirstName`, `client_ID` -> `Client_ID`.
///
/// Uppercases the first character when it is an ASCII lowercase letter and
/// collapses every `_x` (x an ASCII lowercase letter) into `X`. Everything
/// else is copied through, so the transform is idempotent.
pub fn to_pascal_case(s: &str) -> String {
    collapse_underscores(s, true)
}

/// `first_name` -> `firstName`. Same rule as [`to_pascal_case`] without
/// touching the first character.
pub fn to_camel_case(s: &str) -> String {
    collapse_underscores(s, false)
}

fn collapse_underscores(s: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut first = true;

    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    first = false;
                    continue;
                }
            }
        }
        if first && upper_first {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        first = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("first_name", "FirstName")]
    #[case("name", "Name")]
    #[case("Person", "Person")]
    #[case("CASE", "CASE")]
    #[case("client_ID", "Client_ID")]
    #[case("a__b", "A_B")]
    #[case("_private", "Private")]
    #[case("trailing_", "Trailing_")]
    #[case("v2_count", "V2Count")]
    #[case("", "")]
    fn test_to_pascal_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_pascal_case(input), expected);
    }

    #[rstest]
    #[case("first_name", "firstName")]
    #[case("name", "name")]
    #[case("Person", "Person")]
    #[case("max_value_2", "maxValue_2")]
    #[case("_private", "Private")]
    fn test_to_camel_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_camel_case(input), expected);
    }

    proptest! {
        #[test]
        fn prop_pascal_case_is_idempotent(s in "[A-Za-z0-9_]{0,24}") {
            let once = to_pascal_case(&s);
            prop_assert_eq!(to_pascal_case(&once), once);
        }

        #[test]
        fn prop_camel_case_is_idempotent(s in "[A-Za-z0-9_]{0,24}") {
            let once = to_camel_case(&s);
            prop_assert_eq!(to_camel_case(&once), once);
        }
    }
}
