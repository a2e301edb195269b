//! Execution context: one QuickJS runtime with a persistent global scope
//!
//! Wraps jsbridge-core's `QjsContext` and converts everything that crosses
//! its surface into host [`Value`]s.

use jsbridge_core::{MemoryUsage, QjsContext};
use tracing::{debug, trace};

use crate::config::{ContextBuilder, ContextConfig};
use crate::error::{Error, Result};
use crate::marshal;
use crate::value::{IntoValue, Value};

/// A JavaScript execution context
///
/// Declarations made by one [`eval`](Context::eval) are visible to the next.
/// Dropping the context does not invalidate handles obtained from it: the
/// engine is released once the last of them is gone.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync`. Hosts that need access from several
/// threads must confine the context to one thread and send work to it.
pub struct Context {
    raw: QjsContext,
    config: ContextConfig,
}

impl Context {
    /// Create a new context with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ContextConfig::default())
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Create a context with the given configuration
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let raw = QjsContext::new()?;
        config.apply(&raw);
        debug!(
            memory_limit = ?config.memory_limit,
            max_stack_size = ?config.max_stack_size,
            strict = config.strict,
            "Context ready"
        );
        Ok(Self { raw, config })
    }

    /// Evaluate a script in the global scope
    ///
    /// The source must be valid UTF-8; anything else fails with a
    /// `TypeError` before the engine sees it.
    pub fn eval(&self, source: impl AsRef<[u8]>) -> Result<Value> {
        let source = std::str::from_utf8(source.as_ref())
            .map_err(|_| Error::type_error("UTF-8 string", "non-UTF-8 bytes"))?;

        trace!(len = source.len(), "eval");
        let result = self
            .raw
            .eval_with_source(source, &self.config.filename, self.config.strict)
            .inspect_err(|e| debug!(error = %e, "Script raised an exception"))?;

        marshal::to_host(result)
    }

    /// Read a global variable
    pub fn get(&self, name: &str) -> Result<Value> {
        marshal::to_host(self.raw.get_global(name)?)
    }

    /// Define or overwrite a global variable
    pub fn set(&self, name: &str, value: impl IntoValue) -> Result<()> {
        let value = marshal::to_interpreter(&self.raw, &value.into_value()?)?;
        self.raw.set_global(name, &value)?;
        Ok(())
    }

    /// Parse JSON text into engine values
    ///
    /// The engine's JSON parser stores every number as a double, so
    /// `parse_json("7")` yields `Value::Float(7.0)`.
    pub fn parse_json(&self, json: &str) -> Result<Value> {
        marshal::to_host(self.raw.parse_json(json)?)
    }

    /// Run queued promise jobs until none are left
    ///
    /// Returns the number of jobs that ran. A callback that throws inside a
    /// reaction job only rejects its derived promise, which script observes
    /// through `.catch`; the job itself completes. Only failures of the job
    /// machinery (out of memory) surface as an error, and later jobs then
    /// stay queued.
    pub fn run_pending_jobs(&self) -> Result<usize> {
        let mut executed = 0;
        while self.raw.execute_pending_job()? {
            executed += 1;
        }
        if executed > 0 {
            trace!(executed, "Ran pending jobs");
        }
        Ok(executed)
    }

    /// Run the engine's cycle collector
    pub fn gc(&self) {
        self.raw.run_gc();
    }

    /// Snapshot of the engine's allocation counters
    pub fn memory_usage(&self) -> MemoryUsage {
        self.raw.memory_usage()
    }

    /// Configuration this context was created with
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Underlying engine context
    pub fn raw(&self) -> &QjsContext {
        &self.raw
    }
}
