//! JSON tokenizer built on logos.
//!
//! String and number tokens are recognized loosely here and validated by the
//! parser, so malformed literals get a precise error kind rather than a
//! generic "invalid token".

use logos::Logos;

/// Raw JSON token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum Token {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    /// Digits with optional fraction and exponent; leading zeros and empty
    /// fraction/exponent digits are accepted here and rejected by the parser.
    #[regex(r"-?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?")]
    Number,

    /// Quoted string, escapes not yet decoded. Raw control characters end
    /// the match, which surfaces as an invalid token.
    #[regex(r#""([^"\\\x00-\x1F]|\\[^\x00-\x1F])*""#)]
    String,
}

impl Token {
    /// Human-readable token name for diagnostics.
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::Null => "null",
            Token::True => "true",
            Token::False => "false",
            Token::Number => "number",
            Token::String => "string",
        }
    }
}

/// Whether `text` follows the JSON number grammar exactly:
/// `-? (0 | [1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?`.
pub(crate) fn is_strict_number(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_len = i - int_start;
    if int_len == 0 || (int_len > 1 && bytes[int_start] == b'0') {
        return false;
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}
