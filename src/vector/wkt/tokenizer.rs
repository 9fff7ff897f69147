use std::fmt::{self, Display, Formatter};
use std::iter::Peekable;
use std::str::CharIndices;

use crate::errors::{GeokitError, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Word(String),
    LeftParen,
    RightParen,
    Comma,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Word(w) => f.write_str(w),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

/// Lazy lexer over WKT text.
///
/// Yields tokens until the input is exhausted, then `None` forever. Word text
/// keeps its original case.
pub struct Tokenizer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let mut end = self.text.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if !pred(c) {
                end = i;
                break;
            }
            self.chars.next();
        }
        &self.text[start..end]
    }

    fn number(&mut self, start: usize) -> Result<Token> {
        let literal = self.take_while(start, |c| {
            c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
        });
        literal
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| GeokitError::parse("number", literal))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let &(start, c) = self.chars.peek()?;
        let token = match c {
            '(' => Ok(Token::LeftParen),
            ')' => Ok(Token::RightParen),
            ',' => Ok(Token::Comma),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                return Some(self.number(start));
            }
            c if c.is_alphabetic() => {
                let word = self.take_while(start, |c| c.is_alphanumeric() || c == '_');
                return Some(Ok(Token::Word(word.to_string())));
            }
            other => Err(GeokitError::parse("a WKT token", other.to_string())),
        };
        self.chars.next();
        Some(token)
    }
}
