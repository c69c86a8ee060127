use crate::{CompileResult, ErrorKind, ErrorReporting};
#[cfg(test)]
use serde::Serialize;

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    LeftParen,
    Minus,
    Plus,
    RightParen,
    Slash,
    Star,
}

impl Punct {
    fn from_byte(c: u8) -> Option<Self> {
        match c {
            b'(' => Some(Self::LeftParen),
            b'-' => Some(Self::Minus),
            b'+' => Some(Self::Plus),
            b')' => Some(Self::RightParen),
            b'/' => Some(Self::Slash),
            b'*' => Some(Self::Star),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::LeftParen => '(',
            Self::Minus => '-',
            Self::Plus => '+',
            Self::RightParen => ')',
            Self::Slash => '/',
            Self::Star => '*',
        }
    }

    /// Name used when the parser reports a missing punctuator.
    pub fn describe(self) -> String {
        match self {
            Self::LeftParen => "opening parenthesis".to_string(),
            Self::RightParen => "closing parenthesis".to_string(),
            punct => format!("'{}'", punct.symbol()),
        }
    }
}

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Punct(Punct),
    Number(i64),
    Eof,
}

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[cfg_attr(test, derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub loc: SourceLocation,
    pub length: usize,
}

impl Token {
    /// The lexeme this token was read from.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.loc.offset..self.loc.offset + self.length]
    }
}

impl ErrorReporting for Tokenizer<'_> {
    fn src(&self) -> &str {
        self.source
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tokenizer<'a> {
    pub source: &'a str,
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

pub fn tokenize(source: &str) -> CompileResult<Vec<Token>> {
    Tokenizer::new(source).tokenize()
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            index: 0,
            line: 1,
            column: 1,
        }
    }

    /// Split the whole source into tokens, always ending with one `Eof`.
    pub fn tokenize(&mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = vec![];
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => tokens.push(self.number()?),
                b'\n' => self.newline(),
                c if c.is_ascii_whitespace() => self.advance(),
                c => match Punct::from_byte(c) {
                    Some(punct) => tokens.push(self.punct(punct)),
                    None => return Err(self.error_at(self.index, ErrorKind::InvalidToken)),
                },
            }
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            loc: self.location(),
            length: 0,
        });

        Ok(tokens)
    }

    fn punct(&mut self, punct: Punct) -> Token {
        let loc = self.location();
        self.advance();
        Token {
            kind: TokenKind::Punct(punct),
            loc,
            length: 1,
        }
    }

    fn number(&mut self) -> CompileResult<Token> {
        let loc = self.location();
        let mut num: i64 = 0;

        while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
            num = num
                .checked_mul(10)
                .and_then(|num| num.checked_add(i64::from(c - b'0')))
                .ok_or_else(|| self.error_at(loc.offset, ErrorKind::NumberTooLarge))?;
            self.advance();
        }

        Ok(Token {
            kind: TokenKind::Number(num),
            loc,
            length: self.index - loc.offset,
        })
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            offset: self.index,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
        self.column += 1;
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.index).copied()
    }

    fn newline(&mut self) {
        self.advance();
        self.line += 1;
        self.column = 1;
    }
}
