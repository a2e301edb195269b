//! Safe wrappers for QuickJS.
//!
//! This crate provides memory-safe, RAII-based wrappers around
//! the raw QuickJS FFI bindings in `rquickjs-sys`.
//!
//! # Example
//!
//! ```
//! use jsbridge_core::QjsContext;
//!
//! let ctx = QjsContext::new().unwrap();
//! let result = ctx.eval("1 + 1").unwrap();
//! assert_eq!(result.to_number().unwrap(), 2.0);
//! ```
//!
//! # Ownership
//!
//! A [`QjsValue`] owns exactly one reference count of the engine value it
//! wraps and keeps its [`QjsContext`] alive. The native runtime is freed
//! only after the context handle and every value created from it have been
//! dropped, so values may safely outlive the handle they came from.
//!
//! # Thread Safety
//!
//! All types in this crate are `!Send` and `!Sync` because QuickJS runtimes
//! and values are not thread-safe.
//!
//! ## Example: Wrong (won't compile)
//!
//! ```compile_fail
//! use jsbridge_core::QjsContext;
//! use std::thread;
//!
//! let ctx = QjsContext::new().unwrap();
//! thread::spawn(move || {
//!     ctx.eval("1 + 1"); // Error: QjsContext is !Send
//! });
//! ```
//!
//! Sharing a context through an `Arc` fails too:
//!
//! ```compile_fail
//! use jsbridge_core::QjsContext;
//! use std::sync::Arc;
//!
//! let ctx = Arc::new(QjsContext::new().unwrap());
//! std::thread::spawn(move || {
//!     let _ = &ctx; // Error: QjsContext is !Sync
//! });
//! ```
//!
//! Values keep their context alive, so they are pinned to its thread as well:
//!
//! ```compile_fail
//! use jsbridge_core::QjsContext;
//!
//! let value = QjsContext::new().unwrap().eval("42").unwrap();
//! std::thread::spawn(move || {
//!     value.to_number(); // Error: QjsValue is !Send
//! });
//! ```

mod context;
mod error;
pub mod exception;
mod memory;
pub mod string;
mod value;

pub use context::{DEFAULT_FILENAME, QjsContext};
pub use error::{QjsError, QjsResult};
pub use exception::take_exception;
pub use memory::MemoryUsage;
pub use string::{QjsCString, js_string_to_rust};
pub use value::{QjsValue, ValueKind};

// Re-export rquickjs-sys for direct FFI access when needed
pub use rquickjs_sys;
