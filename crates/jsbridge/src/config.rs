//! Configuration types for a bridge [`Context`](crate::Context).

use jsbridge_core::{DEFAULT_FILENAME, QjsContext};

use crate::context::Context;
use crate::error::Result;

/// Engine limits and evaluation options applied when a context is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Maximum bytes the runtime may allocate.
    /// Default: None (unlimited)
    pub memory_limit: Option<usize>,

    /// Maximum native stack the interpreter may use, in bytes.
    /// Default: None (QuickJS default)
    pub max_stack_size: Option<usize>,

    /// Allocation volume that triggers automatic cycle collection.
    /// Default: None (QuickJS default)
    pub gc_threshold: Option<usize>,

    /// Evaluate every script in strict mode.
    /// Default: false
    pub strict: bool,

    /// Source name reported in stack traces.
    /// Default: `<input>`
    pub filename: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            memory_limit: None,
            max_stack_size: None,
            gc_threshold: None,
            strict: false,
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl ContextConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the memory limit in bytes.
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Set the maximum stack size in bytes.
    pub fn max_stack_size(mut self, bytes: usize) -> Self {
        self.max_stack_size = Some(bytes);
        self
    }

    /// Set the GC threshold in bytes.
    pub fn gc_threshold(mut self, bytes: usize) -> Self {
        self.gc_threshold = Some(bytes);
        self
    }

    /// Enable or disable strict mode evaluation.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Set the source name used for evaluated scripts.
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = name.into();
        self
    }

    /// Push the runtime limits into a freshly created engine context.
    pub(crate) fn apply(&self, ctx: &QjsContext) {
        if let Some(bytes) = self.memory_limit {
            ctx.set_memory_limit(bytes);
        }
        if let Some(bytes) = self.max_stack_size {
            ctx.set_max_stack_size(bytes);
        }
        if let Some(bytes) = self.gc_threshold {
            ctx.set_gc_threshold(bytes);
        }
    }
}

/// Builder for creating a [`Context`] with custom configuration
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    config: ContextConfig,
}

impl ContextBuilder {
    /// Replace the whole configuration
    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// Limit the bytes the runtime may allocate
    ///
    /// Allocations past the limit raise `InternalError: out of memory` in
    /// script code.
    pub fn memory_limit(mut self, bytes: usize) -> Self {
        self.config = self.config.memory_limit(bytes);
        self
    }

    /// Limit the native stack used by nested calls
    pub fn max_stack_size(mut self, bytes: usize) -> Self {
        self.config = self.config.max_stack_size(bytes);
        self
    }

    /// Set the GC threshold in bytes
    pub fn gc_threshold(mut self, bytes: usize) -> Self {
        self.config = self.config.gc_threshold(bytes);
        self
    }

    /// Evaluate scripts in strict mode
    pub fn strict(mut self, enabled: bool) -> Self {
        self.config = self.config.strict(enabled);
        self
    }

    /// Source name reported in stack traces
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.filename(name);
        self
    }

    /// Create the context
    pub fn build(self) -> Result<Context> {
        Context::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContextConfig::default();
        assert_eq!(config.memory_limit, None);
        assert_eq!(config.max_stack_size, None);
        assert!(!config.strict);
        assert_eq!(config.filename, "<input>");
    }

    #[test]
    fn test_chained_setters() {
        let config = ContextConfig::new()
            .memory_limit(1 << 20)
            .max_stack_size(256 * 1024)
            .gc_threshold(1 << 16)
            .strict(true)
            .filename("main.js");

        assert_eq!(config.memory_limit, Some(1 << 20));
        assert_eq!(config.max_stack_size, Some(256 * 1024));
        assert_eq!(config.gc_threshold, Some(1 << 16));
        assert!(config.strict);
        assert_eq!(config.filename, "main.js");
    }

    #[test]
    fn test_builder_applies_memory_limit() {
        let ctx = ContextBuilder::default()
            .memory_limit(8 << 20)
            .build()
            .unwrap();
        assert_eq!(ctx.memory_usage().malloc_limit, 8 << 20);
        assert_eq!(ctx.config().memory_limit, Some(8 << 20));
    }

    #[test]
    fn test_builder_strict_mode() {
        let ctx = ContextBuilder::default().strict(true).build().unwrap();
        let err = ctx.eval("undeclared = 1").unwrap_err();
        assert_eq!(err.error_type(), "ReferenceError");
    }
}
