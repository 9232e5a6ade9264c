// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::error::{Error, Position, RawError, RawResult};

/// SMT2 tokens. Symbols and literals are kept verbatim so that printing
/// reproduces the input spelling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    LeftParen,
    RightParen,
    /// A simple symbol or a `|quoted|` symbol (bars included).
    Symbol(String),
    /// A keyword such as `:named` (colon included).
    Keyword(String),
    /// A numeral, decimal, hexadecimal, binary or string literal.
    Literal(String),
}

impl Token {
    /// Source text of the token.
    pub fn text(&self) -> &str {
        match self {
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Symbol(s) | Token::Keyword(s) | Token::Literal(s) => s,
        }
    }
}

pub struct Lexer<R> {
    reader: R,
    path_name: Option<String>,
    current_offset: usize,
    current_line: usize,
    current_column: usize,
}

impl<R> Lexer<R>
where
    R: std::io::BufRead,
{
    pub fn new(path_name: Option<String>, reader: R) -> Self {
        Self {
            reader,
            path_name,
            current_offset: 0,
            current_line: 0,
            current_column: 0,
        }
    }

    pub fn current_position(&self) -> Position {
        Position {
            path_name: self.path_name.clone(),
            line: self.current_line,
            column: self.current_column,
        }
    }

    /// Number of bytes consumed so far.
    pub fn current_offset(&self) -> usize {
        self.current_offset
    }

    pub fn make_error(&self, error: RawError) -> Error {
        Error {
            position: self.current_position(),
            error,
        }
    }

    fn peek_byte(&mut self) -> RawResult<Option<u8>> {
        let bytes = self
            .reader
            .fill_buf()
            .map_err(|e| RawError::InputError(e.to_string()))?;
        Ok(bytes.first().cloned())
    }

    fn consume_byte(&mut self, c: u8) {
        if c == b'\n' {
            self.current_line += 1;
            self.current_column = 0;
        } else {
            self.current_column += 1;
        }
        self.current_offset += 1;
        self.reader.consume(1)
    }

    fn skip_spaces_and_comments(&mut self) -> RawResult<()> {
        while let Some(c) = self.peek_byte()? {
            if c == b';' {
                while let Some(c) = self.peek_byte()? {
                    self.consume_byte(c);
                    if c == b'\n' {
                        break;
                    }
                }
            } else if c.is_ascii_whitespace() {
                self.consume_byte(c);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Read a word up to the next space, parenthesis, comment or quote.
    fn read_word(&mut self) -> RawResult<String> {
        let mut bytes = Vec::new();
        while let Some(c) = self.peek_byte()? {
            if c.is_ascii_whitespace() || matches!(c, b'(' | b')' | b';' | b'|' | b'"') {
                break;
            }
            bytes.push(c);
            self.consume_byte(c);
        }
        String::from_utf8(bytes).map_err(RawError::InvalidUtf8String)
    }

    /// Read a `|quoted symbol|` or a `"string"`, delimiters included. Inside
    /// strings, `""` stands for an escaped double quote.
    fn read_delimited(&mut self, delimiter: u8) -> RawResult<String> {
        let mut bytes = vec![delimiter];
        self.consume_byte(delimiter);
        loop {
            let c = match self.peek_byte()? {
                Some(c) => c,
                None => {
                    return Err(RawError::UnexpectedChar(None, vec![delimiter as char]));
                }
            };
            bytes.push(c);
            self.consume_byte(c);
            if c == delimiter {
                if delimiter == b'"' && self.peek_byte()? == Some(b'"') {
                    bytes.push(b'"');
                    self.consume_byte(b'"');
                    continue;
                }
                break;
            }
        }
        String::from_utf8(bytes).map_err(RawError::InvalidUtf8String)
    }

    /// Return the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> RawResult<Option<Token>> {
        self.skip_spaces_and_comments()?;
        let c = match self.peek_byte()? {
            Some(c) => c,
            None => return Ok(None),
        };
        let token = match c {
            b'(' => {
                self.consume_byte(c);
                Token::LeftParen
            }
            b')' => {
                self.consume_byte(c);
                Token::RightParen
            }
            b'|' => Token::Symbol(self.read_delimited(b'|')?),
            b'"' => Token::Literal(self.read_delimited(b'"')?),
            b':' => Token::Keyword(self.read_word()?),
            b'0'..=b'9' | b'#' => Token::Literal(self.read_word()?),
            _ => Token::Symbol(self.read_word()?),
        };
        Ok(Some(token))
    }
}

#[cfg(test)]
fn tokens(input: &str) -> RawResult<Vec<Token>> {
    let mut lexer = Lexer::new(None, input.as_bytes());
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[test]
fn test_simple_tokens() {
    use Token::*;
    assert_eq!(
        tokens("(assert (! (> x #b01) :named a1)) ; done\n(check-sat)").unwrap(),
        vec![
            LeftParen,
            Symbol("assert".into()),
            LeftParen,
            Symbol("!".into()),
            LeftParen,
            Symbol(">".into()),
            Symbol("x".into()),
            Literal("#b01".into()),
            RightParen,
            Keyword(":named".into()),
            Symbol("a1".into()),
            RightParen,
            RightParen,
            LeftParen,
            Symbol("check-sat".into()),
            RightParen,
        ]
    );
}

#[test]
fn test_quoted_tokens() {
    use Token::*;
    assert_eq!(
        tokens("(echo \"say \"\"hi\"\"\") |a b;c|\n1.5").unwrap(),
        vec![
            LeftParen,
            Symbol("echo".into()),
            Literal("\"say \"\"hi\"\"\"".into()),
            RightParen,
            Symbol("|a b;c|".into()),
            Literal("1.5".into()),
        ]
    );
}

#[test]
fn test_unterminated_symbol() {
    assert_eq!(
        tokens("(declare-fun |oops () Int)"),
        Err(RawError::UnexpectedChar(None, vec!['|']))
    );
}

#[test]
fn test_positions() {
    let mut lexer = Lexer::new(Some("t.smt2".into()), &b"(a\n  b)"[..]);
    for _ in 0..3 {
        lexer.next_token().unwrap();
    }
    let position = lexer.current_position();
    assert_eq!((position.line, position.column), (1, 3));
    assert_eq!(position.to_string(), "t.smt2:2:4");
    assert_eq!(lexer.current_offset(), 6);
}
