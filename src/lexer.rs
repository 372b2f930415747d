use std::fmt;

use thiserror::Error;
use tracing::trace;

/// Tag keywords. `FOR` and `END` are matched case-insensitively; `=` opens an echo tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    For,
    End,
    Echo,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::For => "FOR",
            Keyword::End => "END",
            Keyword::Echo => "=",
        }
    }

    fn from_identifier(ident: &str) -> Option<Keyword> {
        if ident.eq_ignore_ascii_case("for") {
            Some(Keyword::For)
        } else if ident.eq_ignore_ascii_case("end") {
            Some(Keyword::End)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Eof,
    Text(String),
    TagOpen,  // {$
    TagClose, // $}
    Keyword(Keyword),

    // Elements
    Variable(String),
    ConstantInteger(i32),
    ConstantDouble(f64),
    String(String),
    Function(String), // name without the `@`
    Operator(char),
}

/// Payload-free discriminant of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Text,
    TagOpen,
    TagClose,
    TagKeyword,
    Variable,
    ConstantInteger,
    ConstantDouble,
    ElementString,
    Function,
    Operator,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Eof => TokenKind::Eof,
            Token::Text(_) => TokenKind::Text,
            Token::TagOpen => TokenKind::TagOpen,
            Token::TagClose => TokenKind::TagClose,
            Token::Keyword(_) => TokenKind::TagKeyword,
            Token::Variable(_) => TokenKind::Variable,
            Token::ConstantInteger(_) => TokenKind::ConstantInteger,
            Token::ConstantDouble(_) => TokenKind::ConstantDouble,
            Token::String(_) => TokenKind::ElementString,
            Token::Function(_) => TokenKind::Function,
            Token::Operator(_) => TokenKind::Operator,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("end of input"),
            Token::Text(_) => f.write_str("text"),
            Token::TagOpen => f.write_str("`{$`"),
            Token::TagClose => f.write_str("`$}`"),
            Token::Keyword(keyword) => write!(f, "keyword `{}`", keyword.as_str()),
            Token::Variable(name) => write!(f, "variable `{name}`"),
            Token::ConstantInteger(value) => write!(f, "integer `{value}`"),
            Token::ConstantDouble(value) => write!(f, "double `{value}`"),
            Token::String(value) => write!(f, "string {value:?}"),
            Token::Function(name) => write!(f, "function `@{name}`"),
            Token::Operator(op) => write!(f, "operator `{op}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexerMode {
    #[default]
    Text,
    Tag,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("invalid escape sequence `\\{found}` at offset {offset}")]
    InvalidEscape { offset: usize, found: String },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("malformed number `{text}` at offset {offset}")]
    MalformedNumber { offset: usize, text: String },
    #[error("invalid identifier at offset {offset}")]
    InvalidIdentifier { offset: usize },
    #[error("unrecognized character `{found}` at offset {offset}")]
    UnrecognizedCharacter { offset: usize, found: char },
    #[error("end of input was already reached")]
    PastEof,
}

/// Single-pass, two-mode tokenizer.
///
/// In [`LexerMode::Text`] it produces literal runs up to the next unescaped
/// `{$`; in [`LexerMode::Tag`] it produces the elements of one tag. The mode
/// flips on `{$` and `$}` without any help from the parser.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    data: Vec<char>,
    cursor: usize,
    mode: LexerMode,
    finished: bool,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            data: input.chars().collect(),
            cursor: 0,
            mode: LexerMode::Text,
            finished: false,
        }
    }

    pub fn mode(&self) -> LexerMode {
        self.mode
    }

    /// Character offset of the next unread character.
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.data.get(self.cursor + n).copied()
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Produces the next token. Once [`Token::Eof`] has been returned every
    /// further call fails with [`LexError::PastEof`].
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.finished {
            return Err(LexError::PastEof);
        }

        let token = match self.mode {
            LexerMode::Text => self.lex_text()?,
            LexerMode::Tag => self.lex_tag()?,
        };
        if token == Token::Eof {
            self.finished = true;
        }

        trace!(%token, offset = self.cursor, "lexed token");
        Ok(token)
    }

    fn lex_text(&mut self) -> Result<Token, LexError> {
        let Some(first) = self.peek_at(0) else {
            return Ok(Token::Eof);
        };

        if first == '{' && self.peek_at(1) == Some('$') {
            self.advance(2);
            self.mode = LexerMode::Tag;
            return Ok(Token::TagOpen);
        }

        let mut text = String::new();
        while let Some(c) = self.peek_at(0) {
            match c {
                '{' if self.peek_at(1) == Some('$') => break,
                '\\' => match self.peek_at(1) {
                    Some(escaped @ ('\\' | '{')) => {
                        text.push(escaped);
                        self.advance(2);
                    }
                    other => {
                        return Err(LexError::InvalidEscape {
                            offset: self.cursor,
                            found: other.map(String::from).unwrap_or_default(),
                        })
                    }
                },
                _ => {
                    text.push(c);
                    self.advance(1);
                }
            }
        }

        Ok(Token::Text(text))
    }

    fn lex_tag(&mut self) -> Result<Token, LexError> {
        while self.peek_at(0).is_some_and(char::is_whitespace) {
            self.advance(1);
        }

        let start = self.cursor;
        let Some(first) = self.peek_at(0) else {
            return Ok(Token::Eof);
        };

        match first {
            '$' if self.peek_at(1) == Some('}') => {
                self.advance(2);
                self.mode = LexerMode::Text;
                Ok(Token::TagClose)
            }
            '=' => {
                self.advance(1);
                Ok(Token::Keyword(Keyword::Echo))
            }
            '"' => self.lex_string(),
            '@' => {
                self.advance(1);
                let name = self
                    .lex_identifier()
                    .ok_or(LexError::InvalidIdentifier { offset: start })?;
                Ok(Token::Function(name))
            }
            // A minus glued to a digit belongs to the numeral.
            '-' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            '+' | '-' | '*' | '/' | '^' => {
                self.advance(1);
                Ok(Token::Operator(first))
            }
            c if c.is_ascii_alphabetic() => {
                let ident = self
                    .lex_identifier()
                    .ok_or(LexError::InvalidIdentifier { offset: start })?;
                Ok(match Keyword::from_identifier(&ident) {
                    Some(keyword) => Token::Keyword(keyword),
                    None => Token::Variable(ident),
                })
            }
            other => Err(LexError::UnrecognizedCharacter {
                offset: start,
                found: other,
            }),
        }
    }

    /// `[A-Za-z][A-Za-z0-9_]*`, or `None` if the cursor is not on a letter.
    fn lex_identifier(&mut self) -> Option<String> {
        if !self.peek_at(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut ident = String::new();
        while let Some(c) = self
            .peek_at(0)
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            ident.push(c);
            self.advance(1);
        }
        Some(ident)
    }

    fn take_digits(&mut self, into: &mut String) -> bool {
        let before = into.len();
        while let Some(c) = self.peek_at(0).filter(char::is_ascii_digit) {
            into.push(c);
            self.advance(1);
        }
        into.len() > before
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        let start = self.cursor;
        let mut text = String::new();
        if self.peek_at(0) == Some('-') {
            text.push('-');
            self.advance(1);
        }
        self.take_digits(&mut text);

        let mut is_double = false;
        if self.peek_at(0) == Some('.') {
            text.push('.');
            self.advance(1);
            if !self.take_digits(&mut text) {
                return Err(LexError::MalformedNumber {
                    offset: start,
                    text,
                });
            }
            is_double = true;
        }

        // `1.2.3`, `12abc`, `3_0`
        if let Some(c) = self
            .peek_at(0)
            .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '_')
        {
            text.push(c);
            return Err(LexError::MalformedNumber {
                offset: start,
                text,
            });
        }

        let malformed = |text: String| LexError::MalformedNumber {
            offset: start,
            text,
        };
        if is_double {
            match text.parse::<f64>() {
                // Too large for f64; would print back as `inf`.
                Ok(value) if value.is_finite() => Ok(Token::ConstantDouble(value)),
                _ => Err(malformed(text)),
            }
        } else {
            text.parse::<i32>()
                .map(Token::ConstantInteger)
                .map_err(|_| malformed(text))
        }
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let start = self.cursor;
        self.advance(1); // opening quote

        let mut value = String::new();
        loop {
            match self.peek_at(0) {
                None => return Err(LexError::UnterminatedString { offset: start }),
                Some('"') => {
                    self.advance(1);
                    return Ok(Token::String(value));
                }
                Some('\\') => {
                    let resolved = match self.peek_at(1) {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        None => return Err(LexError::UnterminatedString { offset: start }),
                        Some(other) => {
                            return Err(LexError::InvalidEscape {
                                offset: self.cursor,
                                found: other.to_string(),
                            })
                        }
                    };
                    value.push(resolved);
                    self.advance(2);
                }
                Some(c) => {
                    value.push(c);
                    self.advance(1);
                }
            }
        }
    }
}

/// Lexes the whole input, including the trailing [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
