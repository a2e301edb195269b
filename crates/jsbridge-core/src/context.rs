//! Core QuickJS context wrapper with safe evaluation and global access

use rquickjs_sys::*;
use std::ffi::{CString, c_int};
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::error::{QjsError, QjsResult};
use crate::exception::take_exception;
use crate::memory::MemoryUsage;
use crate::value::QjsValue;

/// Source name used when the caller does not supply one
pub const DEFAULT_FILENAME: &str = "<input>";

/// Owner of the native runtime/context pair
///
/// Lives behind an `Rc` shared by the context handle and every value created
/// from it, so it is dropped only after the last value has been freed.
struct ContextInner {
    rt: *mut JSRuntime,
    ctx: *mut JSContext,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        debug!("Releasing QuickJS context and runtime");
        // SAFETY: both pointers were created in QjsContext::new and are freed
        // exactly once here. Every QjsValue holds an Rc to this struct, so no
        // value of this context is still alive. The context must go first.
        unsafe {
            JS_FreeContext(self.ctx);
            JS_FreeRuntime(self.rt);
        }
    }
}

/// A QuickJS runtime with a single execution context
///
/// Cloning is cheap and yields another owner of the same context.
///
/// # Thread Safety
///
/// This type is `!Send` and `!Sync` because QuickJS runtimes are not
/// thread-safe. The shared `Rc` enforces that at compile time.
#[derive(Clone)]
pub struct QjsContext {
    inner: Rc<ContextInner>,
}

impl fmt::Debug for QjsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QjsContext")
            .field("ctx", &self.inner.ctx)
            .field("owners", &Rc::strong_count(&self.inner))
            .finish()
    }
}

impl QjsContext {
    /// Create a new runtime and context with QuickJS defaults
    pub fn new() -> QjsResult<Self> {
        // SAFETY: JS_NewRuntime/JS_NewContext have no preconditions. A runtime
        // whose context failed to allocate is released before returning.
        unsafe {
            let rt = JS_NewRuntime();
            if rt.is_null() {
                return Err(QjsError::context_creation("JS_NewRuntime returned null"));
            }

            let ctx = JS_NewContext(rt);
            if ctx.is_null() {
                JS_FreeRuntime(rt);
                return Err(QjsError::context_creation("JS_NewContext returned null"));
            }

            debug!("Created QuickJS context");
            Ok(Self {
                inner: Rc::new(ContextInner { rt, ctx }),
            })
        }
    }

    /// Get the raw context pointer
    pub fn raw(&self) -> *mut JSContext {
        self.inner.ctx
    }

    /// Get the raw runtime pointer
    pub fn raw_runtime(&self) -> *mut JSRuntime {
        self.inner.rt
    }

    /// Check whether two handles refer to the same native context
    pub fn same_context(&self, other: &QjsContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Evaluate a global script and return its completion value
    pub fn eval(&self, source: &str) -> QjsResult<QjsValue> {
        self.eval_with_source(source, DEFAULT_FILENAME, false)
    }

    /// Evaluate a global script with a source name (for stack traces)
    pub fn eval_with_source(
        &self,
        source: &str,
        filename: &str,
        strict: bool,
    ) -> QjsResult<QjsValue> {
        let input = nul_terminated(source);
        let filename_cstr =
            CString::new(filename).map_err(|_| QjsError::InvalidName(filename.to_string()))?;

        let mut flags = JS_EVAL_TYPE_GLOBAL;
        if strict {
            flags |= JS_EVAL_FLAG_STRICT;
        }

        trace!(filename, len = source.len(), strict, "Evaluating script");

        // SAFETY: input is NUL-terminated at input[source.len()] as JS_Eval
        // requires, filename is a valid C string, ctx is valid
        unsafe {
            let result = JS_Eval(
                self.raw(),
                input.as_ptr().cast(),
                source.len() as _,
                filename_cstr.as_ptr(),
                flags as c_int,
            );
            QjsValue::from_result(self, result)
        }
    }

    /// Get the global object
    pub fn global_object(&self) -> QjsValue {
        // SAFETY: JS_GetGlobalObject returns a new reference that we adopt
        unsafe { QjsValue::from_owned(self, JS_GetGlobalObject(self.raw())) }
    }

    /// Get a property from the global object
    pub fn get_global(&self, name: &str) -> QjsResult<QjsValue> {
        self.global_object().get(name)
    }

    /// Set a property on the global object
    pub fn set_global(&self, name: &str, value: &QjsValue) -> QjsResult<()> {
        self.global_object().set(name, value)
    }

    /// Parse JSON text with the engine's JSON parser
    pub fn parse_json(&self, json: &str) -> QjsResult<QjsValue> {
        let input = nul_terminated(json);
        let filename = CString::new(DEFAULT_FILENAME)
            .map_err(|_| QjsError::InvalidName(DEFAULT_FILENAME.to_string()))?;

        // SAFETY: input is NUL-terminated as JS_ParseJSON requires
        unsafe {
            let result = JS_ParseJSON(
                self.raw(),
                input.as_ptr().cast(),
                json.len() as _,
                filename.as_ptr(),
            );
            QjsValue::from_result(self, result)
        }
    }

    /// Create an undefined value
    pub fn undefined(&self) -> QjsValue {
        // SAFETY: undefined is not reference counted
        unsafe { QjsValue::from_owned(self, JS_UNDEFINED) }
    }

    /// Create a null value
    pub fn null(&self) -> QjsValue {
        // SAFETY: null is not reference counted
        unsafe { QjsValue::from_owned(self, JS_NULL) }
    }

    /// Create a boolean value
    pub fn boolean(&self, b: bool) -> QjsValue {
        // SAFETY: booleans are not reference counted
        unsafe { QjsValue::from_owned(self, JS_MKVAL(JS_TAG_BOOL, b as i32)) }
    }

    /// Create an int-tagged number
    pub fn int(&self, n: i32) -> QjsValue {
        // SAFETY: ints are not reference counted
        unsafe { QjsValue::from_owned(self, JS_MKVAL(JS_TAG_INT, n)) }
    }

    /// Create a float64-tagged number
    ///
    /// Unlike `JS_NewFloat64`, integral values are not narrowed to the int tag.
    pub fn float(&self, n: f64) -> QjsValue {
        // SAFETY: floats are not reference counted
        unsafe { QjsValue::from_owned(self, __JS_NewFloat64(n)) }
    }

    /// Create a string value (interior NUL bytes are preserved)
    pub fn string(&self, s: &str) -> QjsResult<QjsValue> {
        // SAFETY: the pointer/length pair describes valid UTF-8
        unsafe {
            let value = JS_NewStringLen(self.raw(), s.as_ptr().cast(), s.len() as _);
            QjsValue::from_result(self, value)
        }
    }

    /// Limit the bytes the runtime may allocate
    pub fn set_memory_limit(&self, bytes: usize) {
        debug!(bytes, "Setting memory limit");
        // SAFETY: rt is valid
        unsafe { JS_SetMemoryLimit(self.raw_runtime(), bytes as _) }
    }

    /// Limit the native stack the interpreter may use
    pub fn set_max_stack_size(&self, bytes: usize) {
        debug!(bytes, "Setting max stack size");
        // SAFETY: rt is valid
        unsafe { JS_SetMaxStackSize(self.raw_runtime(), bytes as _) }
    }

    /// Set the allocation threshold that triggers automatic collection
    pub fn set_gc_threshold(&self, bytes: usize) {
        debug!(bytes, "Setting GC threshold");
        // SAFETY: rt is valid
        unsafe { JS_SetGCThreshold(self.raw_runtime(), bytes as _) }
    }

    /// Run the cycle collector
    pub fn run_gc(&self) {
        trace!("Running garbage collector");
        // SAFETY: rt is valid
        unsafe { JS_RunGC(self.raw_runtime()) }
    }

    /// Snapshot the runtime's allocation counters
    pub fn memory_usage(&self) -> MemoryUsage {
        let mut usage = MaybeUninit::<JSMemoryUsage>::zeroed();
        // SAFETY: rt is valid and JS_ComputeMemoryUsage fills every field;
        // the zeroed struct is already a valid JSMemoryUsage regardless
        unsafe {
            JS_ComputeMemoryUsage(self.raw_runtime(), usage.as_mut_ptr());
            MemoryUsage::from(usage.assume_init())
        }
    }

    /// Check whether promise jobs are queued
    pub fn is_job_pending(&self) -> bool {
        // SAFETY: rt is valid
        unsafe { JS_IsJobPending(self.raw_runtime()) }
    }

    /// Run one queued job
    ///
    /// Returns `Ok(false)` when the queue was empty.
    pub fn execute_pending_job(&self) -> QjsResult<bool> {
        let mut job_ctx: *mut JSContext = ptr::null_mut();
        // SAFETY: rt is valid; this runtime owns a single context, so any
        // exception raised by the job is pending on self
        let status = unsafe { JS_ExecutePendingJob(self.raw_runtime(), &mut job_ctx) };
        match status {
            0 => Ok(false),
            s if s > 0 => Ok(true),
            _ => Err(take_exception(self)),
        }
    }
}

/// Copy `text` into a buffer with the trailing NUL QuickJS parsers expect
fn nul_terminated(text: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(text.len() + 1);
    buf.extend_from_slice(text.as_bytes());
    buf.push(0);
    buf
}
