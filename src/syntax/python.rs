// src/syntax/python.rs

//! Python precheck.
//!
//! Tracks brackets, string literals (every prefix, single and triple quoted),
//! comments and backslash continuations. f-string replacement fields follow
//! PEP 701, so quotes may be reused inside them. Diagnostics use CPython's
//! wording.

use super::{is_ident_byte, Brackets, Mark, Scanner, SyntaxCheck, SyntaxDiagnostic};

/// CPython refuses f-strings nested deeper than this.
const MAX_FSTRING_NESTING: usize = 150;

/// Replacement fields may appear in a format spec only this many specs deep.
const MAX_FORMAT_SPEC_NESTING: usize = 2;

/// CPython's tokenizer limit on open brackets.
const MAX_BRACKET_NESTING: usize = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct PythonSyntax;

impl SyntaxCheck for PythonSyntax {
    fn name(&self) -> &'static str {
        "python"
    }

    fn check(&self, script: &str) -> Result<(), SyntaxDiagnostic> {
        Lexer {
            s: Scanner::new(script),
            fstring_depth: 0,
            spec_depth: 0,
        }
        .run()
    }
}

struct Lexer<'a> {
    s: Scanner<'a>,
    fstring_depth: usize,
    /// Format specs entered within the current f-string.
    spec_depth: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<(), SyntaxDiagnostic> {
        let mut brackets = Brackets::with_limit(MAX_BRACKET_NESTING);

        while let Some(b) = self.s.peek() {
            match b {
                b'#' => self.s.skip_line(),
                b'\\' => self.skip_escape(),
                b'(' | b'[' | b'{' => brackets.open(&mut self.s)?,
                b')' | b']' | b'}' => brackets.close(&mut self.s)?,
                b'\'' | b'"' => self.string(false)?,
                _ if is_ident_byte(b) => self.word()?,
                _ => {
                    self.s.bump();
                }
            }
        }

        brackets.finish(&self.s)
    }

    /// An identifier or number. A string prefix directly followed by a quote
    /// starts a literal.
    fn word(&mut self) -> Result<(), SyntaxDiagnostic> {
        let word = self.s.eat_while(is_ident_byte);

        if matches!(self.s.peek(), Some(b'\'' | b'"')) {
            if let Some(formatted) = string_prefix(word) {
                return self.string(formatted);
            }
        }
        Ok(())
    }

    /// A backslash and the character it escapes. `\` + CRLF counts as one
    /// continuation.
    fn skip_escape(&mut self) {
        self.s.bump();
        if self.s.at(b"\r\n") {
            self.s.bump_n(2);
        } else {
            self.s.bump();
        }
    }

    fn string(&mut self, formatted: bool) -> Result<(), SyntaxDiagnostic> {
        let open = self.s.mark();
        let Some(quote) = self.s.peek() else {
            return Ok(());
        };
        let delimiter = [quote; 3];
        let triple = self.s.at(&delimiter);
        self.s.bump_n(if triple { 3 } else { 1 });

        if formatted {
            self.fstring_depth += 1;
            if self.fstring_depth > MAX_FSTRING_NESTING {
                return Err(self.s.error_at(open, "f-string: expressions nested too deeply"));
            }
        }
        let outer_spec_depth = std::mem::take(&mut self.spec_depth);

        loop {
            match self.s.peek() {
                None => return Err(self.unterminated(open, triple)),
                Some(b'\n') if !triple => return Err(self.unterminated(open, triple)),
                Some(b'\\') => self.skip_escape(),
                Some(b) if b == quote => {
                    if !triple {
                        self.s.bump();
                        break;
                    }
                    if self.s.at(&delimiter) {
                        self.s.bump_n(3);
                        break;
                    }
                    self.s.bump();
                }
                Some(b'{') if formatted => {
                    if self.s.peek_nth(1) == Some(b'{') {
                        self.s.bump_n(2);
                    } else {
                        self.s.bump();
                        self.replacement_field(triple)?;
                    }
                }
                Some(_) => {
                    self.s.bump();
                }
            }
        }

        if formatted {
            self.fstring_depth -= 1;
        }
        self.spec_depth = outer_spec_depth;
        Ok(())
    }

    /// The expression part of `{...}` inside an f-string, up to and including
    /// the closing brace. Brackets here are not checked.
    fn replacement_field(&mut self, triple: bool) -> Result<(), SyntaxDiagnostic> {
        let mut depth = 0usize;

        loop {
            match self.s.peek() {
                None => return Ok(()),
                Some(b'(' | b'[' | b'{') => {
                    depth += 1;
                    self.s.bump();
                }
                Some(b')' | b']') => {
                    depth = depth.saturating_sub(1);
                    self.s.bump();
                }
                Some(b'}') => {
                    self.s.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Some(b':') if depth == 0 => {
                    self.s.bump();
                    return self.format_spec(triple);
                }
                Some(b'\'' | b'"') => self.string(false)?,
                // Only multi-line fields can hold a comment.
                Some(b'#') if triple => self.s.skip_line(),
                Some(b'\\') => self.skip_escape(),
                Some(b) if is_ident_byte(b) => self.word()?,
                Some(_) => {
                    self.s.bump();
                }
            }
        }
    }

    /// Format spec after `:`. Quotes are literal text here; only nested
    /// fields matter.
    fn format_spec(&mut self, triple: bool) -> Result<(), SyntaxDiagnostic> {
        self.spec_depth += 1;
        let result = self.format_spec_body(triple);
        self.spec_depth -= 1;
        result
    }

    fn format_spec_body(&mut self, triple: bool) -> Result<(), SyntaxDiagnostic> {
        loop {
            match self.s.peek() {
                None => return Ok(()),
                // Let the enclosing literal report it.
                Some(b'\n') if !triple => return Ok(()),
                Some(b'{') => {
                    if self.spec_depth >= MAX_FORMAT_SPEC_NESTING {
                        let mark = self.s.mark();
                        return Err(self.s.error_at(mark, "f-string: expressions nested too deeply"));
                    }
                    self.s.bump();
                    self.replacement_field(triple)?;
                }
                Some(b'}') => {
                    self.s.bump();
                    return Ok(());
                }
                Some(b'\\') => self.skip_escape(),
                Some(_) => {
                    self.s.bump();
                }
            }
        }
    }

    fn unterminated(&self, open: Mark, triple: bool) -> SyntaxDiagnostic {
        if triple {
            self.s.error_at(
                open,
                format!(
                    "unterminated triple-quoted string literal (detected at line {})",
                    self.s.line()
                ),
            )
        } else {
            self.s.error_at(
                open,
                format!("unterminated string literal (detected at line {})", open.line),
            )
        }
    }
}

/// Returns `Some(is_formatted)` when `word` is a legal string prefix.
fn string_prefix(word: &[u8]) -> Option<bool> {
    let lower: Vec<u8> = word.iter().map(u8::to_ascii_lowercase).collect();
    match lower.as_slice() {
        b"r" | b"u" | b"b" | b"br" | b"rb" => Some(false),
        b"f" | b"t" | b"fr" | b"rf" | b"tr" | b"rt" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(src: &str) -> Result<(), SyntaxDiagnostic> {
        PythonSyntax.check(src)
    }

    fn message(src: &str) -> String {
        check(src).unwrap_err().to_string()
    }

    #[test]
    fn accepts_valid_programs() {
        let programs = [
            "print(\"Hello World\")",
            "print(\"!@#$%^&*()_+-=[]{}|;:',./<>?`~\")",
            "def f(a,\n      b):\n    return {'k': [a, b]}\n",
            "s = '''it's \"quoted\" (\n'''\n",
            "x = r'\\d+(' + b\"\\x00\"\n",
            "# unbalanced in a comment ( [ {\nprint(1)\n",
            "total = 1 + \\\n    2\n",
            "s = 'line one \\\r\nline two'\r\n",
            "print(\"こんにちは、世界\")",
            "name = 'x'; print(f\"hi {name!r:>10} {{literal}}\")",
            "print(f\"{d[\"key\"]}\")",
            "print(f\"{x:'^10}\")",
            "print(f'{\"(\"}')",
            "print(f\"{ {'a': 1}['a'] }\")",
            "print(Rb'raw' + F'{1}' + rf\"{2}\")",
            "print(f\"{3.14159:{width}.{precision}}\")",
            "print(f\"{x:{y:>10}}\")",
            "x = 1\ns = f\"\"\"{x # it's fine\n}\"\"\"\nprint(s)\n",
            "",
        ];

        for program in programs {
            assert_eq!(check(program), Ok(()), "rejected: {program:?}");
        }
    }

    #[test]
    fn accepts_semantically_wrong_but_well_formed_code() {
        assert_eq!(check("undefined_function(1, 2)\nraise ValueError"), Ok(()));
    }

    #[test]
    fn reports_unclosed_paren_with_position() {
        assert_eq!(
            message("print(\"Hello World\""),
            "SyntaxError: '(' was never closed (line 1, column 6)"
        );
    }

    #[test]
    fn reports_innermost_unclosed_bracket() {
        assert_eq!(
            message("x = [1,\n     (2, 3\n"),
            "SyntaxError: '(' was never closed (line 2, column 6)"
        );
    }

    #[test]
    fn reports_unmatched_closer() {
        assert_eq!(message("x = 1)"), "SyntaxError: unmatched ')' (line 1, column 6)");
    }

    #[test]
    fn reports_mismatched_closer() {
        assert_eq!(
            message("foo(]"),
            "SyntaxError: closing parenthesis ']' does not match opening parenthesis '(' (line 1, column 5)"
        );
        assert_eq!(
            message("foo([\n)"),
            "SyntaxError: closing parenthesis ')' does not match opening parenthesis '[' on line 1 (line 2, column 1)"
        );
    }

    #[test]
    fn reports_unterminated_strings() {
        assert_eq!(
            message("x = 1\ny = 'abc\nz = 2"),
            "SyntaxError: unterminated string literal (detected at line 2) (line 2, column 5)"
        );
        assert_eq!(
            message("doc = \"\"\"never\nclosed\n"),
            "SyntaxError: unterminated triple-quoted string literal (detected at line 3) (line 1, column 7)"
        );
    }

    #[test]
    fn reports_format_specs_nested_too_deeply() {
        assert_eq!(
            message("f\"{a:{a:{a:}}}\""),
            "SyntaxError: f-string: expressions nested too deeply (line 1, column 9)"
        );
    }

    #[test]
    fn deep_format_spec_nesting_stays_off_the_stack() {
        let src = format!("f\"{}{}\"", "{a:".repeat(200_000), "}".repeat(200_000));
        let result = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || check(&src))
            .unwrap()
            .join()
            .unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.message, "f-string: expressions nested too deeply");
        assert_eq!((err.line, err.column), (1, 9));
    }

    #[test]
    fn bracket_nesting_is_capped_like_cpython() {
        let deepest = format!("x = {}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(check(&deepest), Ok(()));

        let too_deep = format!("x = {}1{}", "(".repeat(201), ")".repeat(201));
        assert_eq!(
            message(&too_deep),
            "SyntaxError: too many nested parentheses (line 1, column 205)"
        );

        let flood = "(".repeat(1_000_000);
        assert_eq!(check(&flood).unwrap_err().message, "too many nested parentheses");
    }

    #[test]
    fn large_input_is_scanned() {
        let script = "a".repeat(10_000_000);
        assert_eq!(check(&script), Ok(()));
    }

    #[test]
    fn prefixes() {
        assert_eq!(string_prefix(b"Rb"), Some(false));
        assert_eq!(string_prefix(b"fR"), Some(true));
        assert_eq!(string_prefix(b"print"), None);
        assert_eq!(string_prefix(b"bf"), None);
    }
}
