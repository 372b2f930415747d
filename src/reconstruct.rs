//! Source reconstruction.
//!
//! A four-element FOR is written back as `start step end`, the order the
//! parser reads it in; writing `end` before `step` would swap them on reparse.

use std::convert::Infallible;

use crate::ast::*;
use crate::element::Element;

/// Visitor that turns a tree back into template source.
///
/// Output is normalized (keywords upper-cased, single spaces between
/// elements), so reparsing it yields an equal tree.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push_elements<'a>(&mut self, elements: impl IntoIterator<Item = &'a Element>) {
        for element in elements {
            self.out.push(' ');
            self.out.push_str(&element.as_text());
        }
    }
}

impl Visitor for SourceWriter {
    type Error = Infallible;

    fn visit_document(&mut self, node: &DocumentNode) -> Result<(), Infallible> {
        walk_children(&node.children, self)
    }

    fn visit_text(&mut self, node: &TextNode) -> Result<(), Infallible> {
        self.out.push_str(&escape_text(&node.text));
        Ok(())
    }

    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), Infallible> {
        self.out.push_str("{$=");
        self.push_elements(&node.elements);
        self.out.push_str(" $}");
        Ok(())
    }

    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), Infallible> {
        self.out.push_str("{$ FOR ");
        self.out.push_str(&node.variable);
        // Same positional order the parser accepts: start, step, end.
        self.push_elements(
            std::iter::once(&node.start)
                .chain(node.step.as_ref())
                .chain(std::iter::once(&node.end)),
        );
        self.out.push_str(" $}");
        walk_children(&node.children, self)?;
        self.out.push_str("{$END$}");
        Ok(())
    }
}

/// Rebuilds the source of `document`.
pub fn reconstruct(document: &DocumentNode) -> String {
    let mut writer = SourceWriter::new();
    match document.accept(&mut writer) {
        Ok(()) => writer.finish(),
        Err(never) => match never {},
    }
}

/// Escapes literal text so that it lexes back to itself.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '{' if chars.peek() == Some(&'$') => escaped.push_str("\\{"),
            _ => escaped.push(c),
        }
    }
    escaped
}
