use crate::element::Element;

/// Root of a parsed template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentNode {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(TextNode),
    Echo(EchoNode),
    ForLoop(ForLoopNode),
}

/// Literal output text, escapes already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub text: String,
}

/// `{$= ... $}`
#[derive(Debug, Clone, PartialEq)]
pub struct EchoNode {
    pub elements: Vec<Element>,
}

/// `{$ FOR variable start [step] end $} ... {$END$}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoopNode {
    pub variable: String,
    pub start: Element,
    pub end: Element,
    pub step: Option<Element>, // defaults to 1
    pub children: Vec<Node>,
}

/// Operations over the closed set of node kinds.
///
/// Children are not walked automatically: each `visit_*` decides whether and
/// how often to descend (the interpreter repeats a loop body, for instance).
pub trait Visitor {
    type Error;

    fn visit_document(&mut self, node: &DocumentNode) -> Result<(), Self::Error>;
    fn visit_text(&mut self, node: &TextNode) -> Result<(), Self::Error>;
    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), Self::Error>;
    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), Self::Error>;
}

impl DocumentNode {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.visit_document(self)
    }
}

impl Node {
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Node::Text(node) => visitor.visit_text(node),
            Node::Echo(node) => visitor.visit_echo(node),
            Node::ForLoop(node) => visitor.visit_for_loop(node),
        }
    }
}

/// Visits `children` in order, stopping at the first error.
pub fn walk_children<V: Visitor>(children: &[Node], visitor: &mut V) -> Result<(), V::Error> {
    children.iter().try_for_each(|child| child.accept(visitor))
}
