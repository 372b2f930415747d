use std::cmp::Ordering;
use std::fmt::Write;

use tracing::{debug, trace};

use crate::ast::*;
use crate::context::RenderContext;
use crate::element::Element;
use crate::error::RuntimeError;
use crate::functions;
use crate::multistack::MultiStack;
use crate::value::{Value, ValueWrapper};

/// Visitor that executes a document, writing output to `out`.
///
/// Loop variables live in a [`MultiStack`] owned by the interpreter, so a
/// nested loop over the same name shadows the outer one until its `END`.
pub struct Interpreter<'a, W: Write> {
    out: &'a mut W,
    context: &'a mut RenderContext,
    variables: MultiStack,
    iterations: u64,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: &'a mut W, context: &'a mut RenderContext) -> Self {
        Self {
            out,
            context,
            variables: MultiStack::new(),
            iterations: 0,
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        self.variables
            .peek(name)
            .map(|wrapper| wrapper.value().clone())
            .map_err(|_| RuntimeError::UnboundVariable(name.to_string()))
    }

    /// Value of a FOR bound or step. Only data elements reach here.
    fn bound_value(&self, element: &Element) -> Result<Value, RuntimeError> {
        let value = match element {
            Element::ConstantInteger(v) => Value::Integer(*v),
            Element::ConstantDouble(v) => Value::Double(*v),
            Element::String(s) => Value::Text(s.clone()),
            Element::Variable(name) => self.lookup(name)?,
            Element::Function(name) => return Err(RuntimeError::UnknownFunction(name.clone())),
            Element::Operator(op) => return Err(RuntimeError::UnknownOperator(*op)),
        };
        value.to_numeric()
    }

    fn apply_operator(&self, op: char, stack: &mut Vec<Value>) -> Result<(), RuntimeError> {
        let available = stack.len();
        let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
            return Err(RuntimeError::OperatorUnderflow { op, available });
        };

        let mut acc = ValueWrapper::new(lhs);
        match op {
            '+' => acc.add(rhs)?,
            '-' => acc.subtract(rhs)?,
            '*' => acc.multiply(rhs)?,
            '/' => acc.divide(rhs)?,
            '^' => acc.power(rhs)?,
            other => return Err(RuntimeError::UnknownOperator(other)),
        }
        stack.push(acc.into_value());
        Ok(())
    }

    fn count_iteration(&mut self) -> Result<(), RuntimeError> {
        self.iterations += 1;
        match self.context.max_loop_iterations() {
            Some(limit) if self.iterations > limit => Err(RuntimeError::IterationLimit(limit)),
            _ => Ok(()),
        }
    }

    fn run_loop(
        &mut self,
        node: &ForLoopNode,
        end: &Value,
        step: &Value,
        descending: bool,
    ) -> Result<(), RuntimeError> {
        loop {
            let current = self.variables.peek(&node.variable)?;
            let ordering = current.compare(end.clone())?;
            let keep_going = if descending {
                ordering != Ordering::Less
            } else {
                ordering != Ordering::Greater
            };
            if !keep_going {
                return Ok(());
            }
            trace!(variable = %node.variable, value = %current, "for iteration");

            self.count_iteration()?;
            walk_children(&node.children, self)?;

            let counter = self.variables.peek_mut(&node.variable)?;
            let mut next = counter.clone();
            match next.add(step.clone()) {
                Ok(()) => *counter = next,
                // An integer bound lies inside i32, so an overflowing advance
                // has already passed it.
                Err(RuntimeError::Overflow(_)) if matches!(end, Value::Integer(_)) => {
                    return Ok(())
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<W: Write> Visitor for Interpreter<'_, W> {
    type Error = RuntimeError;

    fn visit_document(&mut self, node: &DocumentNode) -> Result<(), RuntimeError> {
        walk_children(&node.children, self)
    }

    fn visit_text(&mut self, node: &TextNode) -> Result<(), RuntimeError> {
        self.out.write_str(&node.text)?;
        Ok(())
    }

    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), RuntimeError> {
        let mut stack: Vec<Value> = Vec::new();
        for element in &node.elements {
            match element {
                Element::ConstantInteger(v) => stack.push(Value::Integer(*v)),
                Element::ConstantDouble(v) => stack.push(Value::Double(*v)),
                Element::String(s) => stack.push(Value::Text(s.clone())),
                Element::Variable(name) => stack.push(self.lookup(name)?),
                Element::Operator(op) => self.apply_operator(*op, &mut stack)?,
                Element::Function(name) => functions::call(name, &mut stack, self.context)?,
            }
        }

        // Whatever survives is written bottom to top.
        for value in &stack {
            write!(self.out, "{value}")?;
        }
        Ok(())
    }

    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), RuntimeError> {
        let start = self.bound_value(&node.start)?;
        let end = self.bound_value(&node.end)?;
        let step = match &node.step {
            Some(step) => self.bound_value(step)?,
            None => Value::Integer(1),
        };

        let descending = match ValueWrapper::new(step.clone()).compare(0)? {
            Ordering::Equal => return Err(RuntimeError::ZeroStep(node.variable.clone())),
            Ordering::Less => true,
            Ordering::Greater => false,
        };

        self.variables
            .push(node.variable.clone(), ValueWrapper::new(start));
        let result = self.run_loop(node, &end, &step, descending);
        self.variables.pop(&node.variable)?;
        result
    }
}

/// Runs `document`, writing its output to `out`.
pub fn execute<W: Write>(
    document: &DocumentNode,
    out: &mut W,
    context: &mut RenderContext,
) -> Result<(), RuntimeError> {
    debug!(nodes = document.children.len(), "executing document");
    let mut interpreter = Interpreter::new(out, context);
    document.accept(&mut interpreter)
}
