use std::iter::Peekable;
use std::str::Chars;

use crate::span::{BytePos, Span};
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    input_iter: Peekable<Chars<'a>>,
    current_position: BytePos,
    /// Set once the EOF token has been yielded through `Iterator::next`
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input_iter: input.chars().peekable(),
            current_position: BytePos::new(0),
            exhausted: false,
        }
    }

    /// Consume the next character from the list.
    fn read_char(&mut self) -> Option<char> {
        let next = self.input_iter.next();
        if let Some(c) = next {
            self.current_position = self.current_position.shift(c);
        }
        next
    }

    /// Get the next character from the list without consuming it.
    fn peek_char(&mut self) -> Option<&char> {
        self.input_iter.peek()
    }

    /// Consume whitespace until a non-whitespace character is found.
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek_char() {
            if is_whitespace(c) {
                self.read_char();
            } else {
                break;
            }
        }
    }

    /// Consume the following character if it is `=`, picking the compound kind.
    /// A missing follow character falls back to the single kind.
    fn read_with_equal(&mut self, single: TokenKind, compound: TokenKind) -> TokenKind {
        match self.peek_char() {
            Some('=') => {
                self.read_char();
                compound
            }
            _ => single,
        }
    }

    /// Read the current and following digits as an integer lexeme.
    /// No sign, radix prefix or decimal point is recognized here.
    fn read_number(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);

        while let Some(&ch) = self.peek_char() {
            if is_digit(ch) {
                s.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        s
    }

    /// Read the current and following characters as an identifier or a keyword (if it exists).
    fn read_identifier_or_keyword(&mut self, first: char) -> (TokenKind, String) {
        let mut identifier = String::new();
        identifier.push(first);

        // Loop through all characters until no longer identifier character
        while let Some(&ch) = self.peek_char() {
            if is_identifier_char(ch) || is_digit(ch) {
                identifier.push(ch);
                self.read_char();
            } else {
                break;
            }
        }

        (TokenKind::lookup_identifier(&identifier), identifier)
    }

    /// Read a new token from the characters list.
    ///
    /// Once the input is exhausted every call returns an EOF token with an empty literal.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let initial_position = self.current_position;

        let (kind, literal) = match self.read_char() {
            Some(c) => {
                let kind = match c {
                    '=' => self.read_with_equal(TokenKind::Assign, TokenKind::EqualEqual),
                    '+' => self.read_with_equal(TokenKind::Plus, TokenKind::PlusEqual),
                    '-' => self.read_with_equal(TokenKind::Minus, TokenKind::MinusEqual),
                    '!' => self.read_with_equal(TokenKind::Bang, TokenKind::BangEqual),
                    '*' => self.read_with_equal(TokenKind::Star, TokenKind::StarEqual),
                    '/' => self.read_with_equal(TokenKind::Slash, TokenKind::SlashEqual),
                    '<' => self.read_with_equal(TokenKind::LessThan, TokenKind::LessEqual),
                    '>' => self.read_with_equal(TokenKind::GreaterThan, TokenKind::GreaterEqual),

                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,

                    '(' => TokenKind::LeftParen,
                    ')' => TokenKind::RightParen,
                    '{' => TokenKind::LeftBrace,
                    '}' => TokenKind::RightBrace,

                    c if is_digit(c) => {
                        let digits = self.read_number(c);
                        return self.finish(TokenKind::Integer, digits, initial_position);
                    }
                    c if is_identifier_char(c) => {
                        let (kind, word) = self.read_identifier_or_keyword(c);
                        return self.finish(kind, word, initial_position);
                    }

                    _ => TokenKind::Illegal,
                };

                match kind {
                    TokenKind::Illegal => (kind, c.to_string()),
                    _ => (kind, kind.to_string()),
                }
            }
            None => (TokenKind::Eof, String::new()),
        };

        self.finish(kind, literal, initial_position)
    }

    fn finish(&self, kind: TokenKind, literal: String, start: BytePos) -> Token {
        Token::new(kind, literal, Span::new(start, self.current_position))
    }
}

/// Yields every token up to and including the EOF token, then stops.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }

        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            self.exhausted = true;
        }
        Some(token)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Whether or not the given character is a digit
fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Whether or not the given character may start an identifier
fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
