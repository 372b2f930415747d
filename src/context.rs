use std::collections::HashMap;

pub const DEFAULT_MIME_TYPE: &str = "text/html";

/// Host-supplied state for one render: parameter maps, the output MIME type
/// and execution limits.
///
/// `parameters` are read-only from templates. `persistent_parameters` are
/// meant to outlive a single render (the host keeps the context around);
/// `temporary_parameters` are scratch space for the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    parameters: HashMap<String, String>,
    persistent_parameters: HashMap<String, String>,
    temporary_parameters: HashMap<String, String>,
    mime_type: String,
    max_loop_iterations: Option<u64>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            parameters: HashMap::new(),
            persistent_parameters: HashMap::new(),
            temporary_parameters: HashMap::new(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            max_loop_iterations: None,
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total number of FOR body executions per render.
    pub fn with_max_loop_iterations(mut self, limit: u64) -> Self {
        self.max_loop_iterations = Some(limit);
        self
    }

    pub fn max_loop_iterations(&self) -> Option<u64> {
        self.max_loop_iterations
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn set_persistent_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.persistent_parameters.insert(name.into(), value.into());
    }

    pub fn persistent_parameter(&self, name: &str) -> Option<&str> {
        self.persistent_parameters.get(name).map(String::as_str)
    }

    pub fn remove_persistent_parameter(&mut self, name: &str) -> Option<String> {
        self.persistent_parameters.remove(name)
    }

    pub fn set_temporary_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.temporary_parameters.insert(name.into(), value.into());
    }

    pub fn temporary_parameter(&self, name: &str) -> Option<&str> {
        self.temporary_parameters.get(name).map(String::as_str)
    }

    pub fn remove_temporary_parameter(&mut self, name: &str) -> Option<String> {
        self.temporary_parameters.remove(name)
    }
}
