//! tagscript: a small embeddable template language.
//!
//! A template is literal text interleaved with tags delimited by `{$` and `$}`:
//!
//! - `{$= a b + "text" @fn $}` evaluates its elements left to right on a
//!   stack (constants and variables are pushed, operators and `@functions`
//!   act on the stack) and writes every value left on it.
//! - `{$ FOR i 1 10 $} ... {$END$}` repeats its body while `i <= 10`;
//!   `{$ FOR i 0 2 10 $}` steps by 2 (the step precedes the end bound).
//!
//! In text, `\\` stands for a backslash and `\{$` for a literal `{$`. In
//! strings, `\\`, `\"`, `\n`, `\r` and `\t` are recognized.
//!
//! Pipeline: [`lexer::Tokenizer`] → [`parser::Parser`] → [`ast::DocumentNode`]
//! → a [`ast::Visitor`]: either [`reconstruct::SourceWriter`] (back to source)
//! or [`eval::Interpreter`] (program output).
//!
//! Each render owns its variable stacks and output; nothing is global, so
//! independent renders can run on different threads.

pub mod ast;
pub mod context;
pub mod element;
pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod multistack;
pub mod parser;
pub mod reconstruct;
pub mod value;

pub use ast::{DocumentNode, EchoNode, ForLoopNode, Node, TextNode, Visitor};
pub use context::RenderContext;
pub use element::Element;
pub use error::{Error, RuntimeError};
pub use eval::{execute, Interpreter};
pub use lexer::{LexError, Token, Tokenizer};
pub use multistack::MultiStack;
pub use parser::{parse, ParseError, Parser};
pub use reconstruct::reconstruct;
pub use value::{Value, ValueWrapper};

/// Parses and runs `template` with an empty [`RenderContext`].
pub fn render(template: &str) -> Result<String, Error> {
    render_with_context(template, &mut RenderContext::new())
}

/// Parses and runs `template` against `context`.
///
/// Functions such as `@pparamSet` and `@setMimeType` update `context`, so the
/// host can read it back afterwards.
pub fn render_with_context(template: &str, context: &mut RenderContext) -> Result<String, Error> {
    let document = parse(template)?;
    let mut output = String::new();
    execute(&document, &mut output, context)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_reports_parse_errors() {
        assert!(matches!(
            render("{$ FOR x 1 10 $}"),
            Err(Error::Parse(ParseError::Unclosed(1)))
        ));
    }

    #[test]
    fn render_reports_runtime_errors() {
        assert!(matches!(
            render("{$= 10 0 / $}"),
            Err(Error::Runtime(RuntimeError::DivisionByZero))
        ));
    }

    #[test]
    fn context_survives_render() {
        let mut context = RenderContext::new();
        context.set_persistent_parameter("visits", "1");
        let out = render_with_context(
            r#"{$= "visits" "0" @pparamGet 1 + "visits" @pparamSet $}done"#,
            &mut context,
        )
        .unwrap();
        assert_eq!(out, "done");
        assert_eq!(context.persistent_parameter("visits"), Some("2"));
    }
}
