//! jv Text - JSON text in and out of [`jv_value::Value`].
//!
//! Two entry points: [`parse`] turns text into a value (or a [`ParseError`]
//! with line and column), and [`dump`] renders a value as text. Both are thin
//! adapters over the public value API.
//!
//! # Tracing
//!
//! - `RUST_LOG=jv_text=debug`: parse/dump spans and parse failures.
//! - `RUST_LOG=jv_value=trace`: copy-on-write clones, buffer growth, rehashes.
//!
//! Call [`init_tracing`] once to install a subscriber for these.

mod dump;
mod error;
mod escape;
mod lexer;
mod parser;

use std::sync::Once;

use jv_value::Value;

pub use dump::DumpFlags;
pub use error::{ParseError, ParseErrorKind};
pub use parser::{ParseOptions, DEFAULT_MAX_DEPTH};

use dump::Printer;
use parser::Parser;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber driven by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Parse one JSON value, with default options.
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_with(text, &ParseOptions::default())
}

/// Parse one JSON value. Anything but whitespace after it is an error.
#[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let mut parser = Parser::new(text, options);
    parser
        .parse_value()
        .and_then(|value| parser.finish().map(|()| value))
        .inspect_err(log_failure)
}

/// Parse a whitespace-separated sequence of JSON values.
#[tracing::instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_all(text: &str, options: &ParseOptions) -> Result<Vec<Value>, ParseError> {
    let mut parser = Parser::new(text, options);
    let mut values = Vec::new();
    loop {
        match parser.at_end() {
            Ok(true) => return Ok(values),
            Ok(false) => {}
            Err(e) => {
                log_failure(&e);
                return Err(e);
            }
        }
        values.push(parser.parse_value().inspect_err(log_failure)?);
    }
}

/// Render `value` as JSON text.
#[tracing::instrument(level = "debug", skip_all, fields(flags = ?flags))]
pub fn dump(value: &Value, flags: DumpFlags) -> String {
    let mut printer = Printer::new(flags);
    printer.value(value, 0);
    printer.finish()
}

fn log_failure(error: &ParseError) {
    tracing::debug!(kind = ?error.kind, offset = error.offset, "parse failed");
}
