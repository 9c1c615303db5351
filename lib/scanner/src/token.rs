use std::{fmt::Display, str::FromStr};

use cursor::{Col, Line, SourceRange};

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub range: SourceRange<'a>,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, range: impl Into<SourceRange<'a>>) -> Token<'a> {
        Self { data, range: range.into() }
    }

    pub fn lexeme(&self) -> &'a str {
        self.range.lexeme()
    }

    pub fn line(&self) -> Line {
        self.range.line()
    }

    pub fn col(&self) -> Col {
        self.range.col()
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
    Question,
    Colon,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    Str(&'a str),
    Number(f64),

    // Keywords.
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

/// Reserved words, spelled exactly as they appear in source.
#[derive(Debug, Clone, Copy, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Keyword {
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
}

impl From<Keyword> for TokenData<'_> {
    fn from(keyword: Keyword) -> Self {
        match keyword {
            Keyword::And => TokenData::And,
            Keyword::Class => TokenData::Class,
            Keyword::Else => TokenData::Else,
            Keyword::False => TokenData::False,
            Keyword::Fun => TokenData::Fun,
            Keyword::For => TokenData::For,
            Keyword::If => TokenData::If,
            Keyword::Nil => TokenData::Nil,
            Keyword::Or => TokenData::Or,
            Keyword::Print => TokenData::Print,
            Keyword::Return => TokenData::Return,
            Keyword::Super => TokenData::Super,
            Keyword::This => TokenData::This,
            Keyword::True => TokenData::True,
            Keyword::Var => TokenData::Var,
            Keyword::While => TokenData::While,
        }
    }
}

impl TokenData<'_> {
    /// Classifies an identifier lexeme against the keyword table.
    pub(crate) fn classify(ident: &str) -> TokenData<'static> {
        Keyword::from_str(ident).map(TokenData::from).unwrap_or(TokenData::Identifier)
    }
}
