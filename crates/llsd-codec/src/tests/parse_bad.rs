use alloc::{vec, vec::Vec};

use rstest::rstest;

use crate::{
    MemoryStream, NotationErrorKind, NotationParser, PARSE_FAILURE, Value, from_notation,
};

fn parse_counted(text: &[u8]) -> (i32, Value) {
    let mut stream = MemoryStream::new(text);
    let mut value = Value::Undefined;
    let count = NotationParser::default().parse(&mut stream, &mut value, text.len());
    (count, value)
}

#[rstest]
#[case::garbage_between_key_and_value(b"{!'foo'@:#'bar'}")]
#[case::garbage_in_nested_map(b"{!'foo':[i1,'hi',{@'bar'#:[$i2%,^'baz'&]*}+]=}")]
#[case::unterminated_string(b"'never closed")]
#[case::unterminated_map(b"{'a':i1")]
#[case::unterminated_array(b"[i1,i2")]
#[case::truncated_binary(b"b(10)\"short\"")]
#[case::raw_string_missing_quote(b"s(3)abc")]
#[case::bad_uuid(b"u3c115e51-04f4-523c-9fa6-98aff103473z")]
#[case::short_uuid(b"u3c115e51")]
#[case::bare_integer_tag(b"i")]
#[case::integer_overflow(b"i99999999999")]
#[case::bad_real(b"rabc")]
#[case::bad_date(b"d\"yesterday\"")]
#[case::bad_base64(b"b64\"!!!!\"")]
#[case::odd_base16(b"b16\"abc\"")]
#[case::unknown_binary_base(b"b32\"abc\"")]
#[case::bad_hex_escape(b"'\\xZZ'")]
#[case::unrecognized_tag(b"?")]
fn malformed_input_fails(#[case] text: &[u8]) {
    super::init_logging();
    let (count, _) = parse_counted(text);
    assert_eq!(count, PARSE_FAILURE, "{}", bstr::BStr::new(text));
    assert!(from_notation(text).is_err());
}

#[test]
fn error_kinds() {
    let kind = |text: &[u8]| from_notation(text).unwrap_err().kind;
    assert_eq!(kind(b"{'a':@}"), NotationErrorKind::UnrecognizedTag(b'@'));
    assert_eq!(kind(b"[i1"), NotationErrorKind::UnexpectedEnd);
    assert_eq!(kind(b"ix"), NotationErrorKind::InvalidInteger);
    assert_eq!(kind(b"[r.]"), NotationErrorKind::InvalidReal);
    assert_eq!(kind(b"s(x)'abc'"), NotationErrorKind::InvalidLength);
    assert_eq!(kind(b"b(3)'abc'"), NotationErrorKind::Unterminated("binary"));
    assert_eq!(kind(b"b64\"@@\""), NotationErrorKind::InvalidBinary);
    assert_eq!(kind(b"d'2006-13-45T00:00:00Z'"), NotationErrorKind::InvalidDate);
    assert_eq!(kind(b"   "), NotationErrorKind::UnexpectedEnd);
    assert_eq!(kind(b"['a\\x4Z']"), NotationErrorKind::InvalidEscape);
    assert!(from_notation(b"'open").unwrap_err().is_incomplete());
}

#[test]
fn failure_keeps_parsed_prefix() {
    let (count, value) = parse_counted(b"[i1,'two',[i3,?]]");
    assert_eq!(count, PARSE_FAILURE);
    assert_eq!(value[0], Value::Integer(1));
    assert_eq!(value[1].as_string(), "two");
    assert_eq!(value[2], Value::Array(vec![Value::Integer(3)]));
}

#[test]
fn failed_scalar_leaves_value_undefined() {
    let (count, value) = parse_counted(b"'unterminated");
    assert_eq!(count, PARSE_FAILURE);
    assert!(value.is_undefined());
}

#[test]
fn zero_length_binary_is_not_undefined() {
    let (count, value) = parse_counted(b"b(0)\"\"");
    assert_eq!(count, 1);
    assert_eq!(value, Value::Binary(Vec::new()));
}
