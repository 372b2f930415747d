use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::value::ValueWrapper;

/// Independent LIFO stacks of values keyed by name.
///
/// A stack exists only while it holds at least one value.
#[derive(Debug, Clone, Default)]
pub struct MultiStack {
    stacks: HashMap<String, Vec<ValueWrapper>>,
}

impl MultiStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: ValueWrapper) {
        self.stacks.entry(name.into()).or_default().push(value);
    }

    pub fn pop(&mut self, name: &str) -> Result<ValueWrapper, RuntimeError> {
        let stack = self
            .stacks
            .get_mut(name)
            .ok_or_else(|| RuntimeError::EmptyStack(name.to_string()))?;
        let value = stack
            .pop()
            .ok_or_else(|| RuntimeError::EmptyStack(name.to_string()))?;
        if stack.is_empty() {
            self.stacks.remove(name);
        }
        Ok(value)
    }

    pub fn peek(&self, name: &str) -> Result<&ValueWrapper, RuntimeError> {
        self.stacks
            .get(name)
            .and_then(|stack| stack.last())
            .ok_or_else(|| RuntimeError::EmptyStack(name.to_string()))
    }

    pub fn peek_mut(&mut self, name: &str) -> Result<&mut ValueWrapper, RuntimeError> {
        self.stacks
            .get_mut(name)
            .and_then(|stack| stack.last_mut())
            .ok_or_else(|| RuntimeError::EmptyStack(name.to_string()))
    }

    /// True also for names that were never pushed.
    pub fn is_empty(&self, name: &str) -> bool {
        self.stacks.get(name).map_or(true, Vec::is_empty)
    }
}
