use pretty_assertions::assert_eq;

use super::*;

fn escaped(text: &str, ascii: bool) -> String {
    let mut out = String::new();
    escape_into(&mut out, text.as_bytes(), ascii);
    out
}

#[test]
fn plain_text_is_unchanged() {
    assert_eq!(unescape("hello"), Ok("hello".to_string()));
}

#[test]
fn simple_escapes() {
    assert_eq!(
        unescape(r#"\"\\\/\b\f\n\r\t"#),
        Ok("\"\\/\u{8}\u{c}\n\r\t".to_string())
    );
}

#[test]
fn unicode_escapes() {
    assert_eq!(unescape(r"\u00e9"), Ok("\u{e9}".to_string()));
    assert_eq!(unescape(r"\u0041\u0042"), Ok("AB".to_string()));
}

#[test]
fn surrogate_pair_joins() {
    assert_eq!(unescape(r"\ud83d\ude00"), Ok("\u{1f600}".to_string()));
}

#[test]
fn lone_surrogates_become_replacement() {
    assert_eq!(unescape(r"\ud83dx"), Ok("\u{fffd}x".to_string()));
    assert_eq!(unescape(r"\ude00"), Ok("\u{fffd}".to_string()));
    assert_eq!(unescape(r"\ud83d\u0041"), Ok("\u{fffd}A".to_string()));
}

#[test]
fn malformed_escapes_report_offset() {
    assert_eq!(unescape(r"ab\q"), Err(2));
    assert_eq!(unescape(r"\u12"), Err(0));
    assert_eq!(unescape(r"x\u12g4"), Err(1));
}

#[test]
fn escape_specials() {
    assert_eq!(escaped("a\"b\\c\n\u{1}", false), r#""a\"b\\c\n\u0001""#);
    assert_eq!(escaped("\u{7f}", false), r#""\u007f""#);
}

#[test]
fn non_ascii_kept_unless_requested() {
    assert_eq!(escaped("\u{e9}", false), "\"\u{e9}\"");
    assert_eq!(escaped("\u{e9}", true), r#""\u00e9""#);
    assert_eq!(escaped("\u{1f600}", true), r#""\ud83d\ude00""#);
}

#[test]
fn invalid_utf8_becomes_replacement() {
    let mut out = String::new();
    escape_into(&mut out, b"a\xffb", false);
    assert_eq!(out, "\"a\u{fffd}b\"");
}
