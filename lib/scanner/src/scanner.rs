use cursor::{Cursor, SourceRange};
use errors::{SiltError, SiltErrors};

pub mod token;
pub use token::{Token, TokenData};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedBlockComment,
}

/// Turns source text into tokens. Scanning as a whole never fails: lexical
/// faults are collected and the offending input is skipped, so the caller
/// always gets the tokens for everything that did scan, terminated by a
/// single `Eof` token.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: SiltErrors,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new(), errors: SiltErrors::default() }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token<'a>>, SiltErrors) {
        use TokenData::*;

        loop {
            let start = self.cursor.clone();
            let Some(c) = self.cursor.next() else { break };
            match c {
                '(' => self.add_token(start, LeftParen),
                ')' => self.add_token(start, RightParen),
                '{' => self.add_token(start, LeftBrace),
                '}' => self.add_token(start, RightBrace),
                ',' => self.add_token(start, Comma),
                '.' => self.add_token(start, Dot),
                '-' => self.add_token(start, Minus),
                '+' => self.add_token(start, Plus),
                ';' => self.add_token(start, Semicolon),
                '*' => self.add_token(start, Star),
                '?' => self.add_token(start, Question),
                ':' => self.add_token(start, Colon),

                '!' => {
                    let data = if self.advance_if('=') { BangEqual } else { Bang };
                    self.add_token(start, data);
                }
                '=' => {
                    let data = if self.advance_if('=') { EqualEqual } else { Equal };
                    self.add_token(start, data);
                }
                '<' => {
                    let data = if self.advance_if('=') { LessEqual } else { Less };
                    self.add_token(start, data);
                }
                '>' => {
                    let data = if self.advance_if('=') { GreaterEqual } else { Greater };
                    self.add_token(start, data);
                }

                '/' => {
                    if self.advance_if('/') {
                        self.line_comment();
                    } else if self.advance_if('*') {
                        self.block_comment(&start);
                    } else {
                        self.add_token(start, Slash);
                    }
                }

                '"' => self.string(start),

                d if d.is_ascii_digit() => self.number(start),

                a if a.is_ascii_alphabetic() || a == '_' => self.identifier(start),

                // The cursor already counted the newline.
                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(&start, ScanError::UnexpectedCharacter(c)),
            }
        }

        let end = self.cursor.clone();
        self.tokens.push(Token::new(TokenData::Eof, (end.clone(), end)));

        (self.tokens, self.errors)
    }

    fn add_token(&mut self, start: Cursor<'a>, data: TokenData<'a>) {
        self.tokens.push(Token::new(data, SourceRange::new(start, self.cursor.clone())));
    }

    fn error(&mut self, at: &Cursor<'a>, error: ScanError) {
        log::debug!("scan error at {:?}: {error}", at);
        self.errors.push(SiltError::new(at.line(), at.col(), error.to_string()));
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.cursor.peek() == Some(expected) {
            self.cursor.next();
            true
        } else {
            false
        }
    }

    fn line_comment(&mut self) {
        while !matches!(self.cursor.peek(), Some('\n') | None) {
            self.cursor.next();
        }
    }

    /// Skips a `/* ... */` comment. Not nesting-aware: the first `*/`
    /// terminates the comment.
    fn block_comment(&mut self, start: &Cursor<'a>) {
        loop {
            match (self.cursor.peek(), self.cursor.peek_next()) {
                (Some('*'), Some('/')) => {
                    self.cursor.next();
                    self.cursor.next();
                    return;
                }
                (None, _) => {
                    self.error(start, ScanError::UnterminatedBlockComment);
                    return;
                }
                _ => {
                    self.cursor.next();
                }
            }
        }
    }

    /// Scans a string literal. The opening quote has already been consumed;
    /// strings may span newlines.
    fn string(&mut self, start: Cursor<'a>) {
        let content_start = self.cursor.clone();
        loop {
            match self.cursor.peek() {
                Some('"') => break,
                None => {
                    self.error(&start, ScanError::UnterminatedString);
                    return;
                }
                _ => {
                    self.cursor.next();
                }
            }
        }
        let content_end = self.cursor.clone();
        self.cursor.next(); // closing quote

        let data = TokenData::Str(content_start.slice_until(&content_end));
        self.add_token(start, data);
    }

    /// Scans a number literal: digits with an optional single `.` followed
    /// by at least one digit. No exponents, no leading dot.
    fn number(&mut self, start: Cursor<'a>) {
        while self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.next();
        }

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            while self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.next();
            }
        }

        let lexeme = start.slice_until(&self.cursor);
        // Only digits and at most one interior dot can reach this parse.
        let n = lexeme.parse().expect("scanned number literal must parse");
        self.add_token(start, TokenData::Number(n));
    }

    fn identifier(&mut self, start: Cursor<'a>) {
        while self.cursor.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.cursor.next();
        }

        let data = TokenData::classify(start.slice_until(&self.cursor));
        self.add_token(start, data);
    }
}
