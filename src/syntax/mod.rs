// src/syntax/mod.rs

//! Fast, local syntax prechecks.
//!
//! A precheck is a capability a language may or may not have. The registry
//! maps each language to a [`SyntaxKind`], and [`SyntaxKind::checker`] turns
//! that into an optional [`SyntaxCheck`]. Languages without a checker skip the
//! stage entirely.
//!
//! Checkers are lexical: they track brackets, string literals and comments.
//! They must never reject a script that the real compiler or interpreter would
//! accept, so anything they cannot reason about is let through.

mod c_family;
mod python;

pub use c_family::CFamilySyntax;
pub use python::PythonSyntax;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language-specific syntax precheck.
pub trait SyntaxCheck: Send + Sync {
    /// Short name used in logs and the `/languages` listing.
    fn name(&self) -> &'static str;

    /// Scan `script`, returning the first problem found.
    fn check(&self, script: &str) -> Result<(), SyntaxDiagnostic>;
}

/// Which precheck a language uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxKind {
    #[default]
    None,
    Python,
    Java,
    Go,
    C,
}

static PYTHON: PythonSyntax = PythonSyntax;

impl SyntaxKind {
    pub fn checker(self) -> Option<&'static dyn SyntaxCheck> {
        match self {
            SyntaxKind::None => None,
            SyntaxKind::Python => Some(&PYTHON),
            SyntaxKind::Java => Some(&c_family::JAVA),
            SyntaxKind::Go => Some(&c_family::GO),
            SyntaxKind::C => Some(&c_family::C),
        }
    }
}

/// A parser diagnostic, rendered as
/// `SyntaxError: <message> (line L, column C)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub class: &'static str,
    pub message: String,
    /// 1-based.
    pub line: usize,
    /// 1-based, counted in characters.
    pub column: usize,
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {}, column {})",
            self.class, self.message, self.line, self.column
        )
    }
}

/* ---------------- shared scanning ---------------- */

/// A saved scanner position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mark {
    offset: usize,
    line: usize,
    line_start: usize,
}

/// Byte cursor over a script.
///
/// Only ASCII bytes are significant to the checkers. UTF-8 continuation bytes
/// never collide with ASCII, so multi-byte characters pass through untouched.
/// Columns are only computed when a diagnostic is built.
pub(crate) struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    pub(crate) fn at(&self, pattern: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(pattern)
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(b)
    }

    pub(crate) fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Advance to (not past) the next newline.
    pub(crate) fn skip_line(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume bytes while `pred` holds and return them. `pred` must reject
    /// `\n`.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            offset: self.pos,
            line: self.line,
            line_start: self.line_start,
        }
    }

    /// Position of an earlier `offset`, found by counting newlines before it.
    pub(crate) fn mark_at(&self, offset: usize) -> Mark {
        let before = &self.bytes[..offset.min(self.bytes.len())];
        Mark {
            offset,
            line: before.iter().filter(|&&b| b == b'\n').count() + 1,
            line_start: before.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1),
        }
    }

    pub(crate) fn error_at(&self, mark: Mark, message: impl Into<String>) -> SyntaxDiagnostic {
        let column = self
            .src
            .get(mark.line_start..mark.offset)
            .map_or(0, |prefix| prefix.chars().count())
            + 1;

        SyntaxDiagnostic {
            class: "SyntaxError",
            message: message.into(),
            line: mark.line,
            column,
        }
    }
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Open-bracket stack shared by every checker.
///
/// Only the bracket byte and its offset are kept per entry. Line and column
/// are recovered from the offset when a diagnostic is built.
#[derive(Default)]
pub(crate) struct Brackets {
    open: Vec<(u8, usize)>,
    limit: Option<usize>,
}

impl Brackets {
    /// A stack that rejects nesting deeper than `limit`.
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            open: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Consume an opening bracket at the scanner position.
    pub(crate) fn open(&mut self, scanner: &mut Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
        let mark = scanner.mark();
        if self.limit.is_some_and(|limit| self.open.len() >= limit) {
            return Err(scanner.error_at(mark, "too many nested parentheses"));
        }
        if let Some(b) = scanner.bump() {
            self.open.push((b, mark.offset));
        }
        Ok(())
    }

    /// Consume a closing bracket at the scanner position.
    pub(crate) fn close(&mut self, scanner: &mut Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
        let mark = scanner.mark();
        let Some(close) = scanner.bump() else {
            return Ok(());
        };

        match self.open.pop() {
            None => Err(scanner.error_at(mark, format!("unmatched '{}'", close as char))),
            Some((open, _)) if matching(open) == close => Ok(()),
            Some((open, offset)) => {
                let mut message = format!(
                    "closing parenthesis '{}' does not match opening parenthesis '{}'",
                    close as char, open as char
                );
                let open_line = scanner.mark_at(offset).line;
                if open_line != mark.line {
                    message.push_str(&format!(" on line {open_line}"));
                }
                Err(scanner.error_at(mark, message))
            }
        }
    }

    /// Report the innermost bracket left open at end of input.
    pub(crate) fn finish(self, scanner: &Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
        match self.open.last() {
            None => Ok(()),
            Some(&(open, offset)) => Err(scanner.error_at(
                scanner.mark_at(offset),
                format!("'{}' was never closed", open as char),
            )),
        }
    }
}

fn matching(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}
