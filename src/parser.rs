use thiserror::Error;
use tracing::debug;

use crate::ast::*;
use crate::element::Element;
use crate::lexer::{Keyword, LexError, Token, Tokenizer};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unknown tag starting with {0}")]
    UnknownTag(String),
    #[error("unexpected {found} inside {tag} tag")]
    UnexpectedToken { tag: &'static str, found: String },
    #[error("{kind} `{text}` is not allowed in a {tag} tag")]
    InvalidElement {
        tag: &'static str,
        kind: &'static str,
        text: String,
    },
    #[error("FOR tag expects 3 or 4 elements, found {0}")]
    ForArity(usize),
    #[error("FOR loop variable must be a variable name, found {0}")]
    ForVariable(String),
    #[error("END tag must be closed right away, found {0}")]
    EndNotClosed(String),
    #[error("END tag has nothing to end")]
    NothingToEnd,
    #[error("{0} unclosed tag(s) at end of document")]
    Unclosed(usize),
    #[error("document ended inside a tag")]
    UnterminatedTag,
}

/// Recursive-descent parser over a [`Tokenizer`].
///
/// Open FOR blocks live on an explicit stack above the document root; a block
/// is attached to its parent's children when its `END` is seen.
pub struct Parser {
    lexer: Tokenizer,
    root: DocumentNode,
    open: Vec<ForLoopNode>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Tokenizer::new(input),
            root: DocumentNode::default(),
            open: Vec::new(),
        }
    }

    /// Children list of the innermost open block.
    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(for_loop) => &mut for_loop.children,
            None => &mut self.root.children,
        }
    }

    pub fn parse(mut self) -> Result<DocumentNode, ParseError> {
        loop {
            match self.lexer.next_token()? {
                Token::Eof => break,
                Token::Text(text) => self.current_children().push(Node::Text(TextNode { text })),
                Token::TagOpen => self.parse_tag()?,
                // Text mode yields nothing else.
                other => return Err(ParseError::UnknownTag(other.to_string())),
            }
        }

        if !self.open.is_empty() {
            return Err(ParseError::Unclosed(self.open.len()));
        }

        debug!(nodes = self.root.children.len(), "parsed document");
        Ok(self.root)
    }

    fn parse_tag(&mut self) -> Result<(), ParseError> {
        match self.lexer.next_token()? {
            Token::Keyword(Keyword::For) => self.parse_for(),
            Token::Keyword(Keyword::End) => self.parse_end(),
            Token::Keyword(Keyword::Echo) => self.parse_echo(),
            Token::Eof => Err(ParseError::UnterminatedTag),
            other => Err(ParseError::UnknownTag(other.to_string())),
        }
    }

    /// Reads elements up to and including the closing `$}`.
    fn read_elements(&mut self, tag: &'static str) -> Result<Vec<Element>, ParseError> {
        let mut elements = Vec::new();
        loop {
            match self.lexer.next_token()? {
                Token::TagClose => return Ok(elements),
                Token::Eof => return Err(ParseError::UnterminatedTag),
                token => {
                    let element = Element::from_token(token).map_err(|found| {
                        ParseError::UnexpectedToken {
                            tag,
                            found: found.to_string(),
                        }
                    })?;
                    elements.push(element);
                }
            }
        }
    }

    fn parse_for(&mut self) -> Result<(), ParseError> {
        let elements = self.read_elements("FOR")?;
        if let Some(bad) = elements
            .iter()
            .find(|e| matches!(e, Element::Function(_) | Element::Operator(_)))
        {
            return Err(ParseError::InvalidElement {
                tag: "FOR",
                kind: bad.kind_name(),
                text: bad.as_text(),
            });
        }

        let count = elements.len();
        if !(3..=4).contains(&count) {
            return Err(ParseError::ForArity(count));
        }

        let mut args = elements.into_iter();
        let (Some(variable), Some(start), Some(third)) = (args.next(), args.next(), args.next())
        else {
            return Err(ParseError::ForArity(count));
        };
        // Four-element form is `variable start step end`.
        let (step, end) = match args.next() {
            Some(end) => (Some(third), end),
            None => (None, third),
        };
        let variable = match variable {
            Element::Variable(name) => name,
            other => return Err(ParseError::ForVariable(other.as_text())),
        };

        self.open.push(ForLoopNode {
            variable,
            start,
            end,
            step,
            children: Vec::new(),
        });
        Ok(())
    }

    fn parse_end(&mut self) -> Result<(), ParseError> {
        match self.lexer.next_token()? {
            Token::TagClose => {}
            Token::Eof => return Err(ParseError::UnterminatedTag),
            other => return Err(ParseError::EndNotClosed(other.to_string())),
        }

        let closed = self.open.pop().ok_or(ParseError::NothingToEnd)?;
        self.current_children().push(Node::ForLoop(closed));
        Ok(())
    }

    fn parse_echo(&mut self) -> Result<(), ParseError> {
        let elements = self.read_elements("=")?;
        self.current_children().push(Node::Echo(EchoNode { elements }));
        Ok(())
    }
}

/// Parses a whole template document.
pub fn parse(document: &str) -> Result<DocumentNode, ParseError> {
    Parser::new(document).parse()
}
