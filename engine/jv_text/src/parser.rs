//! Recursive-descent JSON parser over the logos token stream.
//!
//! Each array or object level recurses once. Nesting is capped by
//! [`ParseOptions::max_depth`], and each level runs under
//! [`ensure_sufficient_stack`] so a large cap cannot overflow the stack.

use std::ops::Range;

use jv_value::{ensure_sufficient_stack, Array, Object, Str, Value};
use logos::Logos;

use crate::error::{ParseError, ParseErrorKind};
use crate::escape::unescape;
use crate::lexer::{is_strict_number, Token};

/// Default nesting limit for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Parser configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest array/object nesting accepted; deeper input is an error.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub(crate) struct Parser<'src> {
    source: &'src str,
    lexer: logos::Lexer<'src, Token>,
    peeked: Option<(Token, Range<usize>)>,
    depth: usize,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str, options: &ParseOptions) -> Self {
        Parser {
            source,
            lexer: Token::lexer(source),
            peeked: None,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::at(kind, self.source, offset)
    }

    /// Next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<(Token, Range<usize>)>, ParseError> {
        if let Some(peeked) = self.peeked.take() {
            return Ok(Some(peeked));
        }
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some((token, self.lexer.span()))),
            Some(Err(())) => Err(self.error(ParseErrorKind::InvalidToken, self.lexer.span().start)),
        }
    }

    fn peek_token(&mut self) -> Result<Option<Token>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| *token))
    }

    /// Next token, treating end of input as an error.
    fn require_token(&mut self) -> Result<(Token, Range<usize>), ParseError> {
        match self.next_token()? {
            Some(next) => Ok(next),
            None => Err(self.error(ParseErrorKind::UnexpectedEnd, self.source.len())),
        }
    }

    /// Whether any token remains.
    pub(crate) fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.peek_token()?.is_none())
    }

    /// Fail with `TrailingContent` if any token remains.
    pub(crate) fn finish(&mut self) -> Result<(), ParseError> {
        match self.next_token()? {
            None => Ok(()),
            Some((_, span)) => Err(self.error(ParseErrorKind::TrailingContent, span.start)),
        }
    }

    pub(crate) fn parse_value(&mut self) -> Result<Value, ParseError> {
        let (token, span) = self.require_token()?;
        match token {
            Token::Null => Ok(Value::Null),
            Token::True => Ok(Value::True),
            Token::False => Ok(Value::False),
            Token::Number => self.number(span),
            Token::String => self.string(span).map(Value::String),
            Token::LBracket => self.nested(span.start, Self::array_body),
            Token::LBrace => self.nested(span.start, Self::object_body),
            Token::RBrace | Token::RBracket | Token::Colon | Token::Comma => {
                Err(self.unexpected(token, span.start))
            }
        }
    }

    fn unexpected(&self, token: Token, offset: usize) -> ParseError {
        tracing::trace!(token = token.describe(), offset, "unexpected token");
        self.error(ParseErrorKind::UnexpectedToken, offset)
    }

    fn number(&self, span: Range<usize>) -> Result<Value, ParseError> {
        let text = &self.source[span.clone()];
        if !is_strict_number(text) {
            return Err(self.error(ParseErrorKind::InvalidNumber, span.start));
        }
        text.parse::<f64>()
            .map(Value::Number)
            .map_err(|_| self.error(ParseErrorKind::InvalidNumber, span.start))
    }

    fn string(&self, span: Range<usize>) -> Result<Str, ParseError> {
        let body = &self.source[span.start + 1..span.end - 1];
        unescape(body)
            .map(Str::from)
            .map_err(|at| self.error(ParseErrorKind::InvalidToken, span.start + 1 + at))
    }

    fn nested(
        &mut self,
        offset: usize,
        body: fn(&mut Self) -> Result<Value, ParseError>,
    ) -> Result<Value, ParseError> {
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::DepthLimitExceeded, offset));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| body(self));
        self.depth -= 1;
        result
    }

    fn array_body(&mut self) -> Result<Value, ParseError> {
        let mut array = Array::new();
        if self.peek_token()? == Some(Token::RBracket) {
            self.next_token()?;
            return Ok(Value::Array(array));
        }
        loop {
            array.push(self.parse_value()?);
            match self.require_token()? {
                (Token::Comma, _) => {}
                (Token::RBracket, _) => return Ok(Value::Array(array)),
                (token, span) => return Err(self.unexpected(token, span.start)),
            }
        }
    }

    fn object_body(&mut self) -> Result<Value, ParseError> {
        let mut object = Object::new();
        if self.peek_token()? == Some(Token::RBrace) {
            self.next_token()?;
            return Ok(Value::Object(object));
        }
        loop {
            let key = match self.require_token()? {
                (Token::String, span) => self.string(span)?,
                (token, span) => return Err(self.unexpected(token, span.start)),
            };
            match self.require_token()? {
                (Token::Colon, _) => {}
                (token, span) => return Err(self.unexpected(token, span.start)),
            }
            let value = self.parse_value()?;
            object.insert(key, value);
            match self.require_token()? {
                (Token::Comma, _) => {}
                (Token::RBrace, _) => return Ok(Value::Object(object)),
                (token, span) => return Err(self.unexpected(token, span.start)),
            }
        }
    }
}
