//! Placeholder templating for commands and output locations.
//!
//! Templates are parsed once into tokens instead of being rewritten with
//! repeated find-and-replace, so a substituted value is never scanned again
//! for placeholders.
//!
//! Line values are raw bytes from the enumeration command and render into an
//! [`OsString`] untouched.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Placeholder replaced by the current enumeration line.
pub const LINE_PLACEHOLDER: &str = "%line%";

/// Placeholder replaced by the absolute output file path.
pub const OUTPUT_FILE_PLACEHOLDER: &str = "%output_file%";

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Text copied through unchanged.
    Literal(String),
    /// `%line%`
    Line,
    /// `%output_file%`
    OutputFile,
}

/// Values available when rendering a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings<'a> {
    /// Current enumeration line, if running in loop mode.
    pub line: Option<&'a OsStr>,
    /// Absolute output file path, for self-directing commands.
    pub output_file: Option<&'a Path>,
}

impl<'a> Bindings<'a> {
    /// Bindings carrying only an optional line value.
    #[must_use]
    pub fn line(line: Option<&'a OsStr>) -> Self {
        Self { line, output_file: None }
    }
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    /// Splits `source` into literal and placeholder tokens.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix(LINE_PLACEHOLDER) {
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Line);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(OUTPUT_FILE_PLACEHOLDER) {
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::OutputFile);
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    literal.push(c);
                }
                rest = chars.as_str();
            }
        }
        flush_literal(&mut tokens, &mut literal);

        Self { tokens }
    }

    /// Returns `true` if the template writes its own output file.
    #[must_use]
    pub fn has_output_file(&self) -> bool {
        self.tokens.contains(&Token::OutputFile)
    }

    /// Renders the template in a single pass.
    ///
    /// Placeholders without a bound value are emitted as their literal text.
    #[must_use]
    pub fn render(&self, bindings: &Bindings<'_>) -> OsString {
        let mut out = OsString::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push(text),
                Token::Line => match bindings.line {
                    Some(line) => substitute_unescaped(&mut out, line),
                    None => out.push(LINE_PLACEHOLDER),
                },
                Token::OutputFile => match bindings.output_file {
                    Some(path) => out.push(path),
                    None => out.push(OUTPUT_FILE_PLACEHOLDER),
                },
            }
        }
        out
    }
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

/// Appends an enumeration line to a rendered command verbatim.
///
/// The value is NOT shell-escaped: quotes, `$`, `;` and pipes in `line` reach
/// the shell as written. Every `%line%` expansion goes through here.
pub fn substitute_unescaped(out: &mut OsString, line: &OsStr) {
    out.push(line);
}

/// Parses and renders `source` with an optional line value.
#[must_use]
pub fn render_line(source: &str, line: Option<&OsStr>) -> OsString {
    Template::parse(source).render(&Bindings::line(line))
}
