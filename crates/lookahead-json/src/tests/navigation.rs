use alloc::{string::String, vec::Vec};

use rstest::rstest;

use crate::{JsonType, LookaheadParser, Number, Scalar, State};

#[test]
fn walks_object_with_nested_array() {
    let mut buf = br#"{"a":1,"b":[true,null]}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);

    assert!(p.enter_object());
    assert!(p.is_valid());
    assert_eq!(p.next_object_key(), Some("a"));
    assert_eq!(p.get_int(), Some(1));
    assert_eq!(p.next_object_key(), Some("b"));
    assert_eq!(p.peek_type(), Some(JsonType::Array));
    assert!(p.enter_array());
    assert!(p.next_array_value());
    assert_eq!(p.get_bool(), Some(true));
    assert!(p.next_array_value());
    assert!(p.get_null());
    assert!(p.is_valid());
    assert!(!p.next_array_value());
    assert_eq!(p.next_object_key(), None);
    assert!(p.is_valid());
    assert_eq!(p.state(), State::Finished);
}

#[test]
fn syntax_error_after_key_invalidates_parser() {
    let mut buf = br#"{"a":}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);

    assert!(p.enter_object());
    assert_eq!(p.next_object_key(), Some("a"));
    assert!(!p.is_valid());
    assert_eq!(p.peek_value(), None);
    assert_eq!(p.next_object_key(), None);
    assert!(!p.next_array_value());
    assert!(!p.is_valid());
}

#[test]
fn peeking_never_advances() {
    let mut buf = br#"{"k":"v","n":2.5}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);

    for _ in 0..3 {
        assert_eq!(p.peek_type(), Some(JsonType::Object));
        assert_eq!(p.peek_value(), None);
    }
    assert!(p.enter_object());
    for _ in 0..3 {
        assert_eq!(p.peek_type(), Some(JsonType::String));
        assert_eq!(p.peek_value(), Some(Scalar::String("k")));
        assert_eq!(p.state(), State::HasKey);
    }
    assert_eq!(p.next_object_key(), Some("k"));
    for _ in 0..3 {
        assert_eq!(p.peek_value(), Some(Scalar::String("v")));
    }
    assert_eq!(p.get_string(), Some("v"));
    assert_eq!(p.next_object_key(), Some("n"));
    assert_eq!(p.peek_value(), Some(Scalar::Number(Number::Float(2.5))));
    assert_eq!(p.peek_type(), Some(JsonType::Number));
    assert_eq!(p.get_double(), Some(2.5));
    assert_eq!(p.peek_type(), None);
    assert_eq!(p.next_object_key(), None);
    assert!(p.is_valid());
}

#[test]
fn get_int_requires_an_exact_integer() {
    let mut buf = b"[42, 42, 3.14]".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_array());
    assert!(p.next_array_value());
    assert_eq!(p.get_int(), Some(42));
    assert!(p.next_array_value());
    assert_eq!(p.get_double(), Some(42.0));
    assert!(p.next_array_value());
    assert_eq!(p.get_int(), None);
    assert!(!p.is_valid());
}

#[rstest]
#[case::out_of_i32_range("2147483648")]
#[case::below_i32_range("-2147483649")]
#[case::exponent("1e2")]
#[case::fraction("1.0")]
#[case::huge("123456789012345678901234567890")]
fn get_int_rejects(#[case] json: &str) {
    let mut buf = json.as_bytes().to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert_eq!(p.peek_type(), Some(JsonType::Number));
    assert_eq!(p.get_int(), None);
    assert!(!p.is_valid());
}

#[test]
fn wide_integer_getters() {
    let mut buf = b"[-9223372036854775808, 18446744073709551615, 7]".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_array());
    assert!(p.next_array_value());
    assert_eq!(p.get_i64(), Some(i64::MIN));
    assert!(p.next_array_value());
    assert_eq!(p.get_u64(), Some(u64::MAX));
    assert!(p.next_array_value());
    assert_eq!(p.get_i64(), Some(7));
    assert!(!p.next_array_value());
    assert!(p.is_valid());
}

#[derive(Debug, Clone, Copy)]
enum Getter {
    Int,
    Double,
    Bool,
    String,
    Null,
}

/// Calls `getter` and returns whether it produced its failure sentinel.
fn returns_sentinel(p: &mut LookaheadParser<'_>, getter: Getter) -> bool {
    match getter {
        Getter::Int => p.get_int().is_none(),
        Getter::Double => p.get_double().is_none(),
        Getter::Bool => p.get_bool().is_none(),
        Getter::String => p.get_string().is_none(),
        Getter::Null => !p.get_null(),
    }
}

#[rstest]
#[case::string_on_number("1", false, Getter::String)]
#[case::int_on_string(r#""1""#, false, Getter::Int)]
#[case::double_on_bool("true", false, Getter::Double)]
#[case::bool_on_null("null", false, Getter::Bool)]
#[case::null_on_string(r#""null""#, false, Getter::Null)]
#[case::string_on_object("{}", false, Getter::String)]
#[case::int_on_array("[1]", false, Getter::Int)]
#[case::string_on_key(r#"{"k":"v"}"#, true, Getter::String)]
#[case::null_on_object_end("{}", true, Getter::Null)]
fn mismatched_getters_fail_permanently(
    #[case] json: &str,
    #[case] enter_first: bool,
    #[case] getter: Getter,
) {
    let mut buf = json.as_bytes().to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    if enter_first {
        assert!(p.enter_object());
    }
    assert!(returns_sentinel(&mut p, getter));
    assert!(!p.is_valid());
    assert_eq!(p.state(), State::Error);

    for getter in [
        Getter::Int,
        Getter::Double,
        Getter::Bool,
        Getter::String,
        Getter::Null,
    ] {
        assert!(returns_sentinel(&mut p, getter));
    }
    assert!(!p.enter_object());
    assert!(!p.enter_array());
    assert_eq!(p.next_object_key(), None);
    assert!(!p.next_array_value());
    assert_eq!(p.peek_type(), None);
    assert!(!p.is_valid());
}

#[test]
fn next_array_value_rejects_keys_and_object_ends() {
    let mut buf = br#"{"k":1}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_object());
    assert!(!p.next_array_value());
    assert!(!p.is_valid());

    let mut buf = b"{}".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_object());
    assert_eq!(p.state(), State::ExitingObject);
    assert!(!p.next_array_value());
    assert!(!p.is_valid());
}

#[test]
fn next_array_value_does_not_consume_the_value() {
    let mut buf = b"[[], {}, 1]".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_array());
    for _ in 0..3 {
        assert!(p.next_array_value());
    }
    assert_eq!(p.peek_type(), Some(JsonType::Array));
    assert!(p.enter_array());
    assert!(!p.next_array_value());
    assert!(p.next_array_value());
    assert!(p.enter_object());
    assert_eq!(p.next_object_key(), None);
    assert!(p.next_array_value());
    assert_eq!(p.get_int(), Some(1));
    assert!(!p.next_array_value());
    assert!(p.is_valid());
}

#[test]
fn next_object_key_outside_object_fails() {
    let mut buf = b"[1]".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert_eq!(p.next_object_key(), None);
    assert!(!p.is_valid());
}

#[test]
fn enter_mismatches_fail() {
    let mut buf = b"[]".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(!p.enter_object());
    assert!(!p.is_valid());

    let mut buf = b"{}".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(!p.enter_array());
    assert!(!p.is_valid());
}

#[test]
fn top_level_scalar_finishes_the_document() {
    let mut buf = b" 42 ".to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert_eq!(p.get_int(), Some(42));
    assert_eq!(p.state(), State::Finished);
    assert!(p.is_valid());
    assert_eq!(p.peek_type(), None);
    assert_eq!(p.peek_value(), None);

    assert!(!p.next_array_value());
    assert!(!p.is_valid());
}

#[test]
fn strings_outlive_the_parser() {
    let mut buf = br#"{"first":"Ada","last":"Lovelace"}"#.to_vec();
    let names: Vec<&str> = {
        let mut p = LookaheadParser::new(&mut buf);
        let mut names = Vec::new();
        p.enter_object();
        while p.next_object_key().is_some() {
            names.extend(p.get_string());
        }
        assert!(p.is_valid());
        names
    };
    assert_eq!(names, ["Ada", "Lovelace"]);
}

#[test]
fn escapes_are_decoded() {
    let mut buf = br#"["tab\there", "quote\"", "slash\/", "e\u00e9", "\uD83D\uDE00"]"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    let mut out: Vec<String> = Vec::new();
    assert!(p.enter_array());
    while p.next_array_value() {
        out.extend(p.get_string().map(String::from));
    }
    assert!(p.is_valid());
    assert_eq!(
        out,
        ["tab\there", "quote\"", "slash/", "e\u{e9}", "\u{1f600}"]
    );
}

#[test]
fn keys_are_decoded() {
    let mut buf = br#"{"a\nb": 1}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_object());
    assert_eq!(p.next_object_key(), Some("a\nb"));
    assert_eq!(p.get_int(), Some(1));
}

#[test]
fn empty_containers() {
    let mut buf = br#"{"a": {}, "b": []}"#.to_vec();
    let mut p = LookaheadParser::new(&mut buf);
    assert!(p.enter_object());
    assert_eq!(p.next_object_key(), Some("a"));
    assert!(p.enter_object());
    assert_eq!(p.next_object_key(), None);
    assert_eq!(p.next_object_key(), Some("b"));
    assert!(p.enter_array());
    assert!(!p.next_array_value());
    assert_eq!(p.next_object_key(), None);
    assert_eq!(p.state(), State::Finished);
    assert!(p.is_valid());
}
