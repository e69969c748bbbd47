// src/syntax/c_family.rs

//! Precheck for languages with C-style lexing.
//!
//! Covers `//` and `/* */` comments, double-quoted strings and the dialect
//! extras (char literals, Java text blocks, Go raw strings). Languages whose
//! lexing cannot be tracked without a real parser (JavaScript regex literals,
//! Rust lifetimes, PHP heredocs) deliberately have no dialect here.

use super::{is_ident_byte, Brackets, Scanner, SyntaxCheck, SyntaxDiagnostic};

/// Lexical features that vary between C-family languages.
#[derive(Debug, Clone, Copy)]
pub struct CFamilySyntax {
    name: &'static str,
    char_literals: bool,
    text_blocks: bool,
    backtick_raw_strings: bool,
}

pub(super) static JAVA: CFamilySyntax = CFamilySyntax {
    name: "java",
    char_literals: true,
    text_blocks: true,
    backtick_raw_strings: false,
};

pub(super) static GO: CFamilySyntax = CFamilySyntax {
    name: "go",
    char_literals: true,
    text_blocks: false,
    backtick_raw_strings: true,
};

pub(super) static C: CFamilySyntax = CFamilySyntax {
    name: "c",
    char_literals: true,
    text_blocks: false,
    backtick_raw_strings: false,
};

impl SyntaxCheck for CFamilySyntax {
    fn name(&self) -> &'static str {
        self.name
    }

    fn check(&self, script: &str) -> Result<(), SyntaxDiagnostic> {
        let mut s = Scanner::new(script);
        let mut brackets = Brackets::default();

        while let Some(b) = s.peek() {
            match b {
                b'/' if s.peek_nth(1) == Some(b'/') => s.skip_line(),
                b'/' if s.peek_nth(1) == Some(b'*') => block_comment(&mut s)?,
                b'(' | b'[' | b'{' => brackets.open(&mut s)?,
                b')' | b']' | b'}' => brackets.close(&mut s)?,
                b'"' if self.text_blocks && s.at(b"\"\"\"") => text_block(&mut s)?,
                b'"' => quoted(&mut s, b'"', "unterminated string literal")?,
                b'\'' if self.char_literals => {
                    quoted(&mut s, b'\'', "unterminated character literal")?
                }
                b'`' if self.backtick_raw_strings => raw_string(&mut s)?,
                b'0'..=b'9' => number(&mut s),
                _ if is_ident_byte(b) => {
                    s.eat_while(is_ident_byte);
                }
                _ => {
                    s.bump();
                }
            }
        }

        brackets.finish(&s)
    }
}

fn block_comment(s: &mut Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
    let open = s.mark();
    s.bump_n(2);
    loop {
        if s.at(b"*/") {
            s.bump_n(2);
            return Ok(());
        }
        if s.bump().is_none() {
            return Err(s.error_at(open, "unterminated comment"));
        }
    }
}

/// A single-line literal closed by `quote`, with backslash escapes.
fn quoted(s: &mut Scanner<'_>, quote: u8, unterminated: &str) -> Result<(), SyntaxDiagnostic> {
    let open = s.mark();
    s.bump();
    loop {
        match s.peek() {
            None | Some(b'\n') => return Err(s.error_at(open, unterminated)),
            // Includes C line splices (backslash-newline).
            Some(b'\\') => {
                s.bump();
                if s.at(b"\r\n") {
                    s.bump_n(2);
                } else {
                    s.bump();
                }
            }
            Some(b) if b == quote => {
                s.bump();
                return Ok(());
            }
            Some(_) => {
                s.bump();
            }
        }
    }
}

fn text_block(s: &mut Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
    let open = s.mark();
    s.bump_n(3);
    loop {
        if s.at(b"\"\"\"") {
            s.bump_n(3);
            return Ok(());
        }
        match s.peek() {
            None => return Err(s.error_at(open, "unterminated text block")),
            Some(b'\\') => s.bump_n(2),
            Some(_) => {
                s.bump();
            }
        }
    }
}

fn raw_string(s: &mut Scanner<'_>) -> Result<(), SyntaxDiagnostic> {
    let open = s.mark();
    s.bump();
    loop {
        match s.bump() {
            None => return Err(s.error_at(open, "unterminated raw string literal")),
            Some(b'`') => return Ok(()),
            Some(_) => {}
        }
    }
}

/// Numeric literal, including `'` digit separators (C23).
fn number(s: &mut Scanner<'_>) {
    loop {
        s.eat_while(|b| is_ident_byte(b) || b == b'.');
        let separator = s.peek() == Some(b'\'')
            && s.peek_nth(1).is_some_and(|b| b.is_ascii_hexdigit());
        if !separator {
            return;
        }
        s.bump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn java_accepts_valid_sources() {
        let sources = [
            "public class Main { public static void main(String[] args) { System.out.println(\"Hello World\"); } }",
            "public class Main { public static void main(String[] args) { System.out.println(\"こんにちは、世界\"); } }",
            "class A {\n  // closing } in a comment\n  /* and ( here */\n  char c = '}';\n  char q = '\\'';\n  String t = \"\"\"\n    text \"block\" (\n    \"\"\";\n}\n",
            "int x = 1_000_000;",
        ];

        for src in sources {
            assert_eq!(JAVA.check(src), Ok(()), "rejected: {src:?}");
        }
    }

    #[test]
    fn java_reports_unclosed_brace() {
        let err = JAVA.check("class A {\n  void f() {\n}\n").unwrap_err();
        assert_eq!(err.to_string(), "SyntaxError: '{' was never closed (line 1, column 9)");
    }

    #[test]
    fn java_reports_unterminated_string() {
        let err = JAVA.check("String s = \"abc;\nint x;").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!((err.line, err.column), (1, 12));
    }

    #[test]
    fn reports_unterminated_block_comment() {
        let err = C.check("int main() { /* never closed }").unwrap_err();
        assert_eq!(err.message, "unterminated comment");
    }

    #[test]
    fn go_raw_strings_may_span_lines() {
        let src = "package main\n\nimport \"fmt\"\n\nvar s = `line (\nline }`\n\nfunc main() { fmt.Println(s, '(') }\n";
        assert_eq!(GO.check(src), Ok(()));
    }

    #[test]
    fn go_reports_unterminated_raw_string() {
        let err = GO.check("var s = `never").unwrap_err();
        assert_eq!(err.message, "unterminated raw string literal");
    }

    #[test]
    fn c_accepts_digit_separators() {
        assert_eq!(C.check("int x = 1'000'000; char c = ')';"), Ok(()));
    }

    #[test]
    fn deep_nesting_is_tracked_by_offset() {
        let depth = 100_000;
        let balanced = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(C.check(&balanced), Ok(()));

        let unclosed = format!("int x;\nint y = {}1;", "(".repeat(depth));
        let err = C.check(&unclosed).unwrap_err();
        assert_eq!(err.message, "'(' was never closed");
        assert_eq!((err.line, err.column), (2, 8 + depth));
    }

    #[test]
    fn mismatch_names_the_line_of_the_opener() {
        let err = JAVA.check("void f() {\n  g(1];\n}").unwrap_err();
        assert_eq!(
            err.message,
            "closing parenthesis ']' does not match opening parenthesis '('"
        );
        let err = JAVA.check("int[] a = {\n  1,\n);").unwrap_err();
        assert_eq!(
            err.message,
            "closing parenthesis ')' does not match opening parenthesis '{' on line 1"
        );
        assert_eq!((err.line, err.column), (3, 1));
    }

    #[test]
    fn c_reports_mismatched_closer() {
        let err = C.check("int f(int a] { }").unwrap_err();
        assert_eq!(
            err.message,
            "closing parenthesis ']' does not match opening parenthesis '('"
        );
    }
}
