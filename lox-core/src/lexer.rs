//! Scanner for Lox source text.

use std::fmt;

use crate::diagnostic::Diagnostic;

/// Kind of a token produced by the lexer.
///
/// Keywords that only matter to statement grammars are still recognized
/// here; the parser uses them as synchronization points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Single-character punctuation
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Dot,        // .
    Minus,      // -
    Plus,       // +
    Semicolon,  // ;
    Slash,      // /
    Star,       // *

    // One or two character operators
    Bang,         // !
    BangEqual,    // !=
    Equal,        // =
    EqualEqual,   // ==
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

/// Typed payload carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

/// A single scanned token. Never mutated after the scanner creates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token.
    pub lexeme: String,
    pub literal: Option<Literal>,
    /// 0-based source line.
    pub line: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        literal: Option<Literal>,
        line: usize,
    ) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", None, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.kind, self.lexeme)?;
        match &self.literal {
            Some(Literal::Number(value)) => write!(f, " {value}"),
            Some(Literal::String(value)) => write!(f, " {value:?}"),
            None => Ok(()),
        }
    }
}

/// Result of lexing a source string.
///
/// `tokens` always ends with exactly one `Eof` token, even when
/// `diagnostics` is non-empty.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex a source string into tokens in a single pass.
///
/// Bad input never aborts the scan: the offending text is skipped, a
/// diagnostic is recorded, and scanning resumes after it.
pub fn lex(source: &str) -> LexResult {
    let mut lexer = Lexer {
        source,
        chars: source.as_bytes(),
        len: source.len(),
        index: 0,
        line: 0,
        diagnostics: Vec::new(),
    };
    lexer.run()
}

struct Lexer<'src> {
    source: &'src str,
    chars: &'src [u8],
    len: usize,
    index: usize,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> LexResult {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            let start = self.index;
            let token = match ch {
                b' ' | b'\t' | b'\r' => {
                    self.consume_char();
                    None
                }
                b'\n' => {
                    self.consume_char();
                    self.line += 1;
                    None
                }
                b'(' => self.single(TokenKind::LeftParen, start),
                b')' => self.single(TokenKind::RightParen, start),
                b'{' => self.single(TokenKind::LeftBrace, start),
                b'}' => self.single(TokenKind::RightBrace, start),
                b',' => self.single(TokenKind::Comma, start),
                b'.' => self.single(TokenKind::Dot, start),
                b'-' => self.single(TokenKind::Minus, start),
                b'+' => self.single(TokenKind::Plus, start),
                b';' => self.single(TokenKind::Semicolon, start),
                b'*' => self.single(TokenKind::Star, start),
                b'!' => self.one_or_two(TokenKind::Bang, TokenKind::BangEqual, start),
                b'=' => self.one_or_two(TokenKind::Equal, TokenKind::EqualEqual, start),
                b'<' => self.one_or_two(TokenKind::Less, TokenKind::LessEqual, start),
                b'>' => self.one_or_two(TokenKind::Greater, TokenKind::GreaterEqual, start),
                b'/' => self.lex_slash(start),
                b'"' => self.lex_string(start),
                b'0'..=b'9' => self.lex_number(start),
                _ => {
                    if is_ident_start(ch) {
                        self.lex_ident_or_keyword(start)
                    } else {
                        self.unexpected_char(start)
                    }
                }
            };

            if let Some(tok) = token {
                tokens.push(tok);
            }
        }

        tokens.push(Token::eof(self.line));

        LexResult {
            tokens,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    fn simple_token(&self, kind: TokenKind, start: usize) -> Option<Token> {
        Some(Token::new(
            kind,
            &self.source[start..self.index],
            None,
            self.line,
        ))
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Option<Token> {
        self.consume_char();
        self.simple_token(kind, start)
    }

    /// `!`, `=`, `<` and `>` take a trailing `=` when one follows.
    fn one_or_two(&mut self, one: TokenKind, two: TokenKind, start: usize) -> Option<Token> {
        self.consume_char();
        if self.peek_char() == Some(b'=') {
            self.consume_char();
            self.simple_token(two, start)
        } else {
            self.simple_token(one, start)
        }
    }

    fn unexpected_char(&mut self, start: usize) -> Option<Token> {
        // Skip a whole UTF-8 scalar so the next token starts on a boundary.
        let ch = self.source.get(start..).and_then(|rest| rest.chars().next());
        let width = ch.map_or(1, char::len_utf8);
        for _ in 0..width {
            self.consume_char();
        }

        let shown = ch.unwrap_or(char::REPLACEMENT_CHARACTER);
        self.diagnostics.push(Diagnostic::error(
            self.line,
            format!("unexpected character: {shown}"),
        ));
        None
    }

    fn lex_slash(&mut self, start: usize) -> Option<Token> {
        self.consume_char();
        match self.peek_char() {
            Some(b'/') => {
                // Line comment runs up to, not including, the newline.
                while let Some(ch) = self.peek_char() {
                    if ch == b'\n' {
                        break;
                    }
                    self.consume_char();
                }
                None
            }
            Some(b'*') => {
                self.consume_char();
                self.skip_block_comment();
                None
            }
            _ => self.simple_token(TokenKind::Slash, start),
        }
    }

    /// Block comments end at the first `*/`; they do not nest.
    fn skip_block_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                b'*' if self.peek_next() == Some(b'/') => {
                    self.consume_char();
                    self.consume_char();
                    return;
                }
                b'\n' => {
                    self.line += 1;
                    self.consume_char();
                }
                _ => self.consume_char(),
            }
        }
    }

    fn lex_string(&mut self, start: usize) -> Option<Token> {
        // Consume the opening quote
        self.consume_char();

        let content_start = self.index;
        while let Some(ch) = self.peek_char() {
            match ch {
                b'"' => {
                    let content_end = self.index;
                    self.consume_char(); // closing quote
                    let value = self.source[content_start..content_end].to_string();
                    return Some(Token::new(
                        TokenKind::String,
                        &self.source[start..self.index],
                        Some(Literal::String(value)),
                        self.line,
                    ));
                }
                b'\n' => {
                    self.line += 1;
                    self.consume_char();
                }
                _ => self.consume_char(),
            }
        }

        self.diagnostics
            .push(Diagnostic::error(self.line, "unterminated string"));
        None
    }

    fn lex_number(&mut self, start: usize) -> Option<Token> {
        // digits [ '.' digits ]?
        self.consume_digits();

        if self.peek_char() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_char(); // '.'
            self.consume_digits();
        }

        let text = &self.source[start..self.index];
        match text.parse::<f64>() {
            Ok(value) => Some(Token::new(
                TokenKind::Number,
                text,
                Some(Literal::Number(value)),
                self.line,
            )),
            Err(err) => {
                self.diagnostics.push(Diagnostic::error(
                    self.line,
                    format!("malformed number literal '{text}': {err}"),
                ));
                None
            }
        }
    }

    fn consume_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.consume_char();
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Option<Token> {
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.index];
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.simple_token(kind, start)
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.chars.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.len {
            self.index += 1;
        }
    }
}

/// Case-sensitive keyword table.
pub fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "and" => TokenKind::And,
        "class" => TokenKind::Class,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "fun" => TokenKind::Fun,
        "if" => TokenKind::If,
        "nil" => TokenKind::Nil,
        "or" => TokenKind::Or,
        "print" => TokenKind::Print,
        "return" => TokenKind::Return,
        "super" => TokenKind::Super,
        "this" => TokenKind::This,
        "true" => TokenKind::True,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
