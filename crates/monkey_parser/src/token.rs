use std::fmt;

use crate::span::Span;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Special
    Illegal,
    Eof,

    // Identifiers & Literals
    Identifier,
    Integer,

    // Operators
    Assign,
    Plus,
    PlusEqual,
    Minus,
    MinusEqual,
    Bang,
    Star,
    StarEqual,
    Slash,
    SlashEqual,

    // Comparison
    EqualEqual,
    BangEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Delimiters
    Comma,
    Semicolon,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
}

impl TokenKind {
    /// Get the TokenKind for the given word, `Identifier` if it is not a keyword.
    pub fn lookup_identifier(s: &str) -> TokenKind {
        use TokenKind::*;

        match s {
            "fn" => Function,
            "let" => Let,
            "true" => True,
            "false" => False,
            "if" => If,
            "else" => Else,
            "return" => Return,
            _ => Identifier,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;

        let s = match self {
            Illegal => "Illegal",
            Eof => "EOF",

            Identifier => "Identifier",
            Integer => "Integer",

            Assign => "=",
            Plus => "+",
            PlusEqual => "+=",
            Minus => "-",
            MinusEqual => "-=",
            Bang => "!",
            Star => "*",
            StarEqual => "*=",
            Slash => "/",
            SlashEqual => "/=",

            EqualEqual => "==",
            BangEqual => "!=",
            LessThan => "<",
            LessEqual => "<=",
            GreaterThan => ">",
            GreaterEqual => ">=",

            Comma => ",",
            Semicolon => ";",

            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",

            Function => "fn",
            Let => "let",
            True => "true",
            False => "false",
            If => "if",
            Else => "else",
            Return => "return",
        };

        write!(f, "{}", s)
    }
}

/// A lexeme together with its kind and where it was found.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Token {
        Token {
            kind,
            literal: literal.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
